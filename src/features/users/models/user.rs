use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::shared::text_enum::text_enum;
use crate::shared::time::lenient_timestamp;

text_enum! {
    /// What a person does in the defect workflow
    pub enum UserRole {
        Tester => "Tester" | "테스터"; "tester",
        /// Legacy QA label; behaves as a tester
        Qa => "QA" | "테스트"; "qa",
        Fixer => "Fixer" | "조치자"; "fixer",
        Admin => "Admin" | "관리자"; "admin",
    }
}

impl UserRole {
    /// Only admins may set severity and priority
    pub fn can_edit_locked_fields(&self) -> bool {
        matches!(self, UserRole::Admin)
    }

    pub fn is_fixer(&self) -> bool {
        matches!(self, UserRole::Fixer)
    }
}

text_enum! {
    pub enum UserStatus {
        Active => "Active" | "사용"; "active",
        Suspended => "Suspended" | "사용중지"; "suspended" | "중지",
    }
}

/// A tester, fixer or administrator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub user_id: i64,
    #[serde(default)]
    #[schema(value_type = String, example = "Fixer")]
    pub role: UserRole,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    #[schema(value_type = String, example = "Active")]
    pub status: UserStatus,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    /// Active fixers are the people a defect can be assigned to
    pub fn is_assignable(&self) -> bool {
        self.role.is_fixer() && self.status == UserStatus::Active
    }
}

/// Data for creating a new user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub role: UserRole,
    pub name: String,
    pub department: Option<String>,
    pub email: Option<String>,
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
}

impl NewUser {
    pub fn into_user(self, user_id: i64) -> User {
        User {
            user_id,
            role: self.role,
            name: self.name,
            department: self.department,
            email: self.email,
            status: self.status,
            created_at: Some(self.created_at),
            updated_at: None,
        }
    }
}

/// Partial update of a user; `None` leaves the stored value untouched
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub role: Option<UserRole>,
    pub name: Option<String>,
    pub department: Option<Option<String>>,
    pub email: Option<Option<String>>,
    pub status: Option<UserStatus>,
}

impl UserChanges {
    pub fn apply_to(self, user: &mut User, now: DateTime<Utc>) {
        if let Some(role) = self.role {
            user.role = role;
        }
        if let Some(name) = self.name {
            user.name = name;
        }
        if let Some(department) = self.department {
            user.department = department;
        }
        if let Some(email) = self.email {
            user.email = email;
        }
        if let Some(status) = self.status {
            user.status = status;
        }
        user.updated_at = Some(match user.created_at {
            Some(created_at) if created_at > now => created_at,
            _ => now,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_korean_legacy_labels_parse() {
        assert_eq!(UserRole::parse("관리자"), UserRole::Admin);
        assert_eq!(UserRole::parse("조치자"), UserRole::Fixer);
        assert_eq!(UserRole::parse("테스트"), UserRole::Qa);
        assert_eq!(UserStatus::parse("사용"), UserStatus::Active);
        assert_eq!(UserStatus::parse("사용중지"), UserStatus::Suspended);
        assert_eq!("사용중지".parse::<UserStatus>(), Ok(UserStatus::Suspended));
        assert_eq!("중지".parse::<UserStatus>(), Ok(UserStatus::Suspended));
    }

    #[test]
    fn test_only_admin_edits_locked_fields() {
        assert!(UserRole::Admin.can_edit_locked_fields());
        assert!(!UserRole::Tester.can_edit_locked_fields());
        assert!(!UserRole::Qa.can_edit_locked_fields());
        assert!(!UserRole::Fixer.can_edit_locked_fields());
        assert!(!UserRole::parse("guest").can_edit_locked_fields());
    }

    #[test]
    fn test_assignable_requires_active_fixer() {
        let user: User = serde_json::from_str(
            r#"{"user_id": 3, "role": "조치자", "name": "Park Jisung", "status": "사용"}"#,
        )
        .unwrap();
        assert!(user.is_assignable());

        let suspended = User {
            status: UserStatus::Suspended,
            ..user.clone()
        };
        assert!(!suspended.is_assignable());

        let tester = User {
            role: UserRole::Tester,
            ..user
        };
        assert!(!tester.is_assignable());
    }
}
