//! Fixture builders shared by unit tests across features.

#[cfg(test)]
use chrono::{DateTime, Utc};

#[cfg(test)]
use crate::features::defects::models::{
    Defect, DefectStatus, NewDefect, Priority, Severity,
};
#[cfg(test)]
use crate::features::users::models::{NewUser, User, UserRole, UserStatus};
#[cfg(test)]
use crate::shared::time::parse_timestamp;

/// Minimal defect created at `created_at` (RFC 3339); an unparseable value leaves it unset
#[cfg(test)]
pub fn defect(defect_id: i64, created_at: &str) -> Defect {
    Defect {
        defect_id,
        test_type: Some("unit".to_string()),
        title: format!("Defect number {}", defect_id),
        severity: Severity::Minor,
        priority: Priority::P3,
        status: DefectStatus::New,
        creator: "Hong Gildong".to_string(),
        assignee: None,
        menu_name: None,
        screen_name: None,
        screen_url: None,
        screenshot: None,
        env_info: None,
        steps_to_repro: None,
        action_comment: None,
        created_at: parse_timestamp(created_at),
        updated_at: None,
        action_start: None,
        action_end: None,
    }
}

#[cfg(test)]
pub fn new_defect(title: &str) -> NewDefect {
    NewDefect {
        test_type: "unit".to_string(),
        title: title.to_string(),
        severity: Severity::Minor,
        priority: Priority::P3,
        status: DefectStatus::New,
        creator: "Hong Gildong".to_string(),
        assignee: None,
        menu_name: None,
        screen_name: None,
        screen_url: None,
        screenshot: None,
        env_info: None,
        steps_to_repro: None,
        action_comment: None,
        action_start: None,
        action_end: None,
        created_at: fixed_now(),
    }
}

#[cfg(test)]
pub fn user(user_id: i64, name: &str, role: UserRole, status: UserStatus) -> User {
    NewUser {
        role,
        name: name.to_string(),
        department: None,
        email: None,
        status,
        created_at: fixed_now(),
    }
    .into_user(user_id)
}

/// Stable "now" for tests that stamp records
#[cfg(test)]
pub fn fixed_now() -> DateTime<Utc> {
    parse_timestamp("2026-02-10T03:00:00Z").unwrap_or_default()
}
