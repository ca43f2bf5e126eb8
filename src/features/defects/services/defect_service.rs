use std::sync::Arc;

use chrono::Utc;

use crate::core::config::DefectPolicyConfig;
use crate::core::error::{AppError, Result};
use crate::features::defects::dtos::{CreateDefectDto, DefectActionDto, UpdateDefectDto};
use crate::features::defects::models::{
    Defect, DefectChanges, DefectStatus, NewDefect, Priority, Severity,
};
use crate::features::defects::repositories::DefectRepository;
use crate::features::defects::services::filter_engine::{filter_defects, DefectFilter};
use crate::features::users::models::UserRole;
use crate::shared::pagination::{paginate, Page};
use crate::shared::validation::{parse_label, sanitize_change, sanitize_optional, sanitize_text};

const MIN_TITLE_CHARS: usize = 5;

/// Defect reads and writes on top of the repository port
pub struct DefectService {
    repo: Arc<dyn DefectRepository>,
    policy: Arc<DefectPolicyConfig>,
}

impl DefectService {
    pub fn new(repo: Arc<dyn DefectRepository>, policy: Arc<DefectPolicyConfig>) -> Self {
        Self { repo, policy }
    }

    /// Filtered, newest-first page of defects
    pub async fn list(
        &self,
        filter: &DefectFilter,
        page: Option<i64>,
        page_size: Option<i64>,
    ) -> Result<Page<Defect>> {
        let defects = self.repo.list().await?;
        let matched = filter_defects(&defects, filter, &self.policy);
        let page_size = self.policy.resolve_page_size(page_size);

        Ok(paginate(&matched, page.unwrap_or(1), page_size))
    }

    pub async fn get(&self, defect_id: i64) -> Result<Defect> {
        self.repo
            .find(defect_id)
            .await?
            .ok_or_else(|| not_found(defect_id))
    }

    pub async fn create(&self, dto: CreateDefectDto, actor: &UserRole) -> Result<Defect> {
        let (severity, priority) = if actor.can_edit_locked_fields() {
            (
                parse_label(dto.severity, "severity")?.unwrap_or(Severity::Minor),
                parse_label(dto.priority, "priority")?.unwrap_or(Priority::P3),
            )
        } else {
            if dto.severity.is_some() || dto.priority.is_some() {
                tracing::debug!("Ignoring severity/priority from non-admin role {}", actor);
            }
            (Severity::Minor, Priority::P3)
        };

        let new_defect = NewDefect {
            test_type: sanitize_optional(dto.test_type)
                .unwrap_or_else(|| self.policy.default_test_type.clone()),
            title: sanitized_title(&dto.title)?,
            severity,
            priority,
            status: parse_label(dto.status, "status")?.unwrap_or(DefectStatus::New),
            creator: sanitize_text(&dto.creator),
            assignee: sanitize_optional(dto.assignee),
            menu_name: sanitize_optional(dto.menu_name),
            screen_name: sanitize_optional(dto.screen_name),
            screen_url: sanitize_optional(dto.screen_url),
            screenshot: sanitize_optional(dto.screenshot),
            env_info: sanitize_optional(dto.env_info),
            steps_to_repro: sanitize_optional(dto.steps_to_repro),
            action_comment: sanitize_optional(dto.action_comment),
            action_start: dto.action_start,
            action_end: dto.action_end,
            created_at: Utc::now(),
        };
        check_action_window(&new_defect.action_start, &new_defect.action_end)?;

        let defect = self.repo.insert(new_defect).await?;
        tracing::info!(
            "Defect {} created by {} ({})",
            defect.defect_id,
            defect.creator,
            actor
        );
        Ok(defect)
    }

    pub async fn update(
        &self,
        defect_id: i64,
        dto: UpdateDefectDto,
        actor: &UserRole,
    ) -> Result<Defect> {
        let (severity, priority) = if actor.can_edit_locked_fields() {
            (
                parse_label(dto.severity, "severity")?,
                parse_label(dto.priority, "priority")?,
            )
        } else {
            if dto.severity.is_some() || dto.priority.is_some() {
                tracing::debug!("Ignoring severity/priority from non-admin role {}", actor);
            }
            (None, None)
        };

        let changes = DefectChanges {
            test_type: sanitize_change(dto.test_type),
            title: dto.title.as_deref().map(sanitized_title).transpose()?,
            severity,
            priority,
            status: parse_label(dto.status, "status")?,
            creator: sanitize_optional(dto.creator),
            assignee: sanitize_change(dto.assignee),
            menu_name: sanitize_change(dto.menu_name),
            screen_name: sanitize_change(dto.screen_name),
            screen_url: sanitize_change(dto.screen_url),
            screenshot: sanitize_change(dto.screenshot),
            env_info: sanitize_change(dto.env_info),
            steps_to_repro: sanitize_change(dto.steps_to_repro),
            action_comment: sanitize_change(dto.action_comment),
            action_start: dto.action_start,
            action_end: dto.action_end,
        };

        self.apply_changes(defect_id, changes).await
    }

    /// Record remediation progress: status, comment and work dates
    pub async fn record_action(&self, defect_id: i64, dto: DefectActionDto) -> Result<Defect> {
        let changes = DefectChanges {
            status: parse_label(dto.status, "status")?,
            action_comment: sanitize_change(dto.action_comment),
            action_start: dto.action_start,
            action_end: dto.action_end,
            ..Default::default()
        };

        self.apply_changes(defect_id, changes).await
    }

    pub async fn delete(&self, defect_id: i64) -> Result<()> {
        if !self.repo.delete(defect_id).await? {
            return Err(not_found(defect_id));
        }
        tracing::info!("Defect {} deleted", defect_id);
        Ok(())
    }

    async fn apply_changes(&self, defect_id: i64, changes: DefectChanges) -> Result<Defect> {
        let mut defect = self.get(defect_id).await?;
        changes.apply_to(&mut defect, Utc::now());
        check_action_window(&defect.action_start, &defect.action_end)?;

        let updated = self
            .repo
            .update(defect)
            .await?
            .ok_or_else(|| not_found(defect_id))?;
        tracing::info!("Defect {} updated (status {})", defect_id, updated.status);
        Ok(updated)
    }
}

fn not_found(defect_id: i64) -> AppError {
    AppError::NotFound(format!("Defect {} not found", defect_id))
}

/// Titles are checked again after stripping script blocks
fn sanitized_title(raw: &str) -> Result<String> {
    let title = sanitize_text(raw);
    if title.chars().count() < MIN_TITLE_CHARS {
        return Err(AppError::Validation(format!(
            "title: must be at least {} characters",
            MIN_TITLE_CHARS
        )));
    }
    Ok(title)
}

fn check_action_window(
    start: &Option<chrono::NaiveDate>,
    end: &Option<chrono::NaiveDate>,
) -> Result<()> {
    match (start, end) {
        (Some(start), Some(end)) if end < start => Err(AppError::Validation(
            "action_end must not be before action_start".to_string(),
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::defects::repositories::InMemoryDefectRepository;
    use crate::shared::test_helpers::defect;
    use chrono::NaiveDate;

    fn service_with(defects: Vec<Defect>) -> DefectService {
        DefectService::new(
            Arc::new(InMemoryDefectRepository::with_defects(defects)),
            Arc::new(DefectPolicyConfig::default()),
        )
    }

    fn create_dto() -> CreateDefectDto {
        CreateDefectDto {
            test_type: None,
            title: "  Login button misaligned<script>alert(1)</script>".to_string(),
            severity: Some("Critical".to_string()),
            priority: Some("P1".to_string()),
            status: None,
            creator: " Younghee Lee ".to_string(),
            assignee: Some("   ".to_string()),
            menu_name: Some("Login".to_string()),
            screen_name: None,
            screen_url: None,
            screenshot: None,
            env_info: None,
            steps_to_repro: None,
            action_comment: None,
            action_start: None,
            action_end: None,
        }
    }

    #[tokio::test]
    async fn test_create_applies_defaults_and_sanitizes() {
        let service = service_with(vec![]);
        let created = service.create(create_dto(), &UserRole::Tester).await.unwrap();

        assert_eq!(created.defect_id, 1);
        assert_eq!(created.title, "Login button misaligned");
        assert_eq!(created.creator, "Younghee Lee");
        assert_eq!(created.assignee, None);
        assert_eq!(created.status, DefectStatus::New);
        assert_eq!(created.test_type.as_deref(), Some("unit"));
        assert!(created.created_at.is_some());
        assert!(created.updated_at.is_none());
    }

    #[tokio::test]
    async fn test_non_admin_cannot_set_locked_fields_on_create() {
        let service = service_with(vec![]);

        for role in [UserRole::Tester, UserRole::Qa, UserRole::Fixer] {
            let created = service.create(create_dto(), &role).await.unwrap();
            assert_eq!(created.severity, Severity::Minor);
            assert_eq!(created.priority, Priority::P3);
        }

        let created = service.create(create_dto(), &UserRole::Admin).await.unwrap();
        assert_eq!(created.severity, Severity::Critical);
        assert_eq!(created.priority, Priority::P1);
    }

    #[tokio::test]
    async fn test_non_admin_update_keeps_locked_fields() {
        let mut stored = defect(1, "2026-02-01T00:00:00Z");
        stored.severity = Severity::Major;
        stored.priority = Priority::P2;
        let service = service_with(vec![stored]);

        let dto = UpdateDefectDto {
            severity: Some("Critical".to_string()),
            priority: Some("P1".to_string()),
            status: Some("Open".to_string()),
            ..Default::default()
        };
        let updated = service.update(1, dto.clone(), &UserRole::Tester).await.unwrap();
        assert_eq!(updated.severity, Severity::Major);
        assert_eq!(updated.priority, Priority::P2);
        assert_eq!(updated.status, DefectStatus::Open);
        assert!(updated.updated_at.is_some());

        let updated = service.update(1, dto, &UserRole::Admin).await.unwrap();
        assert_eq!(updated.severity, Severity::Critical);
        assert_eq!(updated.priority, Priority::P1);
    }

    #[tokio::test]
    async fn test_blank_assignee_unassigns() {
        let mut stored = defect(1, "2026-02-01T00:00:00Z");
        stored.assignee = Some("Minsu Park".to_string());
        stored.action_comment = Some("Waiting on backend".to_string());
        let service = service_with(vec![stored]);

        // Absent fields keep their stored value
        let untouched = service
            .update(1, UpdateDefectDto::default(), &UserRole::Admin)
            .await
            .unwrap();
        assert_eq!(untouched.assignee.as_deref(), Some("Minsu Park"));

        let dto = UpdateDefectDto {
            assignee: Some("".to_string()),
            ..Default::default()
        };
        let updated = service.update(1, dto, &UserRole::Admin).await.unwrap();
        assert_eq!(updated.assignee, None);
        assert_eq!(updated.action_comment.as_deref(), Some("Waiting on backend"));
        assert_eq!(service.get(1).await.unwrap().assignee, None);

        let cleared = service
            .record_action(
                1,
                DefectActionDto {
                    action_comment: Some("  ".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(cleared.action_comment, None);
    }

    #[tokio::test]
    async fn test_unknown_labels_are_rejected_on_write() {
        let service = service_with(vec![defect(1, "2026-02-01T00:00:00Z")]);
        let dto = UpdateDefectDto {
            status: Some("Parked".to_string()),
            ..Default::default()
        };
        let err = service.update(1, dto, &UserRole::Admin).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_title_too_short_after_sanitizing() {
        let service = service_with(vec![]);
        let dto = CreateDefectDto {
            title: "Bug<script>x()</script>   ".to_string(),
            ..create_dto()
        };
        let err = service.create(dto, &UserRole::Admin).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_record_action() {
        let service = service_with(vec![defect(4, "2026-02-01T00:00:00Z")]);
        let dto = DefectActionDto {
            status: Some("Resolved".to_string()),
            action_comment: Some("Fixed null check".to_string()),
            action_start: NaiveDate::from_ymd_opt(2026, 2, 10),
            action_end: NaiveDate::from_ymd_opt(2026, 2, 11),
        };

        let updated = service.record_action(4, dto).await.unwrap();
        assert_eq!(updated.status, DefectStatus::Resolved);
        assert_eq!(updated.action_comment.as_deref(), Some("Fixed null check"));
        assert_eq!(updated.title, "Defect number 4");

        let backwards = DefectActionDto {
            action_start: NaiveDate::from_ymd_opt(2026, 2, 12),
            action_end: NaiveDate::from_ymd_opt(2026, 2, 11),
            ..Default::default()
        };
        assert!(service.record_action(4, backwards).await.is_err());
    }

    #[tokio::test]
    async fn test_missing_defect_is_not_found() {
        let service = service_with(vec![]);
        assert!(matches!(service.get(9).await, Err(AppError::NotFound(_))));
        assert!(matches!(service.delete(9).await, Err(AppError::NotFound(_))));
        assert!(matches!(
            service
                .record_action(9, DefectActionDto::default())
                .await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_list_pages_filtered_results() {
        let defects: Vec<Defect> = (1..=25)
            .map(|id| {
                let mut d = defect(id, &format!("2026-02-{:02}T00:00:00Z", (id % 28) + 1));
                d.status = DefectStatus::Open;
                d
            })
            .collect();
        let service = service_with(defects);
        let open = DefectFilter {
            status: Some("Open".to_string()),
            ..Default::default()
        };

        let first = service.list(&open, None, Some(20)).await.unwrap();
        assert_eq!(first.items.len(), 20);
        assert_eq!(first.meta.total_pages, 2);
        assert_eq!(first.items[0].defect_id, 25);

        let second = service.list(&open, Some(2), Some(20)).await.unwrap();
        assert_eq!(second.items.len(), 5);

        // 33 is not an offered size, so the default (20) applies
        let odd = service.list(&open, Some(1), Some(33)).await.unwrap();
        assert_eq!(odd.meta.page_size, 20);

        let none = service
            .list(
                &DefectFilter {
                    status: Some("Closed".to_string()),
                    ..Default::default()
                },
                None,
                None,
            )
            .await
            .unwrap();
        assert!(none.items.is_empty());
        assert_eq!(none.meta.total_pages, 1);
    }
}
