use std::sync::Arc;

use chrono::Utc;

use crate::core::error::{AppError, Result};
use crate::features::users::dtos::{CreateUserDto, UpdateUserDto};
use crate::features::users::models::{NewUser, User, UserChanges, UserStatus};
use crate::features::users::repositories::UserRepository;
use crate::shared::validation::{parse_label, sanitize_change, sanitize_optional, sanitize_text};

pub struct UserService {
    repo: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    pub async fn list(&self) -> Result<Vec<User>> {
        self.repo.list().await
    }

    /// Active fixers, for the assignee picker
    pub async fn list_assignees(&self) -> Result<Vec<User>> {
        let users = self.repo.list().await?;
        Ok(users.into_iter().filter(User::is_assignable).collect())
    }

    pub async fn get(&self, user_id: i64) -> Result<User> {
        self.repo
            .find(user_id)
            .await?
            .ok_or_else(|| not_found(user_id))
    }

    pub async fn create(&self, dto: CreateUserDto) -> Result<User> {
        let name = sanitize_text(&dto.name);
        if name.is_empty() {
            return Err(AppError::Validation("name: must not be empty".to_string()));
        }

        let new_user = NewUser {
            role: parse_label(Some(dto.role), "role")?
                .ok_or_else(|| AppError::Validation("role: must not be empty".to_string()))?,
            name,
            department: sanitize_optional(dto.department),
            email: sanitize_optional(dto.email),
            status: parse_label(dto.status, "status")?.unwrap_or(UserStatus::Active),
            created_at: Utc::now(),
        };

        let user = self.repo.insert(new_user).await?;
        tracing::info!("User {} ({}) created", user.user_id, user.role);
        Ok(user)
    }

    pub async fn update(&self, user_id: i64, dto: UpdateUserDto) -> Result<User> {
        let changes = UserChanges {
            role: parse_label(dto.role, "role")?,
            name: sanitize_optional(dto.name),
            department: sanitize_change(dto.department),
            email: sanitize_change(dto.email),
            status: parse_label(dto.status, "status")?,
        };

        let mut user = self.get(user_id).await?;
        changes.apply_to(&mut user, Utc::now());

        let updated = self
            .repo
            .update(user)
            .await?
            .ok_or_else(|| not_found(user_id))?;
        tracing::info!("User {} updated", user_id);
        Ok(updated)
    }

    pub async fn delete(&self, user_id: i64) -> Result<()> {
        if !self.repo.delete(user_id).await? {
            return Err(not_found(user_id));
        }
        tracing::info!("User {} deleted", user_id);
        Ok(())
    }
}

fn not_found(user_id: i64) -> AppError {
    AppError::NotFound(format!("User {} not found", user_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::users::models::UserRole;
    use crate::features::users::repositories::InMemoryUserRepository;
    use crate::shared::test_helpers::user;

    fn service() -> UserService {
        UserService::new(Arc::new(InMemoryUserRepository::with_users(vec![
            user(1, "Son Heungmin", UserRole::Fixer, UserStatus::Active),
            user(2, "Hong Gildong", UserRole::Tester, UserStatus::Active),
            user(3, "Park Jisung", UserRole::Fixer, UserStatus::Suspended),
            user(4, "Kim Minjae", UserRole::Fixer, UserStatus::Active),
        ])))
    }

    #[tokio::test]
    async fn test_assignees_are_active_fixers_by_name() {
        let assignees = service().list_assignees().await.unwrap();
        let ids: Vec<i64> = assignees.iter().map(|u| u.user_id).collect();
        assert_eq!(ids, vec![4, 1]);
    }

    #[tokio::test]
    async fn test_create_defaults_to_active() {
        let service = service();
        let created = service
            .create(CreateUserDto {
                role: "조치자".to_string(),
                name: " Lee Kangin ".to_string(),
                department: Some("QA Team".to_string()),
                email: None,
                status: None,
            })
            .await
            .unwrap();

        assert_eq!(created.user_id, 5);
        assert_eq!(created.name, "Lee Kangin");
        assert_eq!(created.role, UserRole::Fixer);
        assert_eq!(created.status, UserStatus::Active);
        assert!(created.is_assignable());
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_role() {
        let err = service()
            .create(CreateUserDto {
                role: "Manager".to_string(),
                name: "Lee".to_string(),
                department: None,
                email: None,
                status: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_suspends_user() {
        let service = service();
        let updated = service
            .update(
                1,
                UpdateUserDto {
                    status: Some("중지".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.status, UserStatus::Suspended);
        assert_eq!(updated.name, "Son Heungmin");
        assert!(updated.updated_at.is_some());

        let ids: Vec<i64> = service
            .list_assignees()
            .await
            .unwrap()
            .iter()
            .map(|u| u.user_id)
            .collect();
        assert_eq!(ids, vec![4]);
    }

    #[tokio::test]
    async fn test_blank_fields_clear_on_update() {
        let service = service();
        let filled = service
            .update(
                2,
                UpdateUserDto {
                    department: Some("Platform QA".to_string()),
                    email: Some("hong@example.com".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(filled.department.as_deref(), Some("Platform QA"));

        let cleared = service
            .update(
                2,
                UpdateUserDto {
                    department: Some(" ".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(cleared.department, None);
        assert_eq!(cleared.email.as_deref(), Some("hong@example.com"));

        let cleared = service
            .update(
                2,
                UpdateUserDto {
                    email: Some("".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(cleared.email, None);
    }

    #[tokio::test]
    async fn test_missing_user() {
        let service = service();
        assert!(matches!(service.get(99).await, Err(AppError::NotFound(_))));
        assert!(matches!(
            service.update(99, UpdateUserDto::default()).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(service.delete(99).await, Err(AppError::NotFound(_))));
    }
}
