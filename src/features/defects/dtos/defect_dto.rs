use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::features::defects::models::Defect;
use crate::features::defects::services::filter_engine::DefectFilter;
use crate::shared::pagination::{Page, PaginationMeta};

/// Request DTO for registering a defect
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateDefectDto {
    /// Test phase category; the configured default when omitted
    pub test_type: Option<String>,

    #[validate(length(min = 5, max = 500, message = "Title must be 5-500 characters"))]
    pub title: String,

    /// Only honoured for admins; others always get `Minor`
    #[schema(example = "Major")]
    pub severity: Option<String>,

    /// Only honoured for admins; others always get `P3`
    #[schema(example = "P2")]
    pub priority: Option<String>,

    /// Defaults to `New`
    pub status: Option<String>,

    #[validate(length(min = 1, max = 100, message = "Creator must be 1-100 characters"))]
    pub creator: String,

    pub assignee: Option<String>,
    pub menu_name: Option<String>,
    pub screen_name: Option<String>,
    #[validate(length(max = 2000, message = "Screen URL must not exceed 2000 characters"))]
    pub screen_url: Option<String>,
    pub screenshot: Option<String>,
    pub env_info: Option<String>,
    pub steps_to_repro: Option<String>,
    pub action_comment: Option<String>,
    pub action_start: Option<NaiveDate>,
    pub action_end: Option<NaiveDate>,
}

/// Request DTO for editing a defect; omitted fields keep their stored value,
/// a blank optional text field (assignee, comment, ...) clears it
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateDefectDto {
    pub test_type: Option<String>,

    #[validate(length(min = 5, max = 500, message = "Title must be 5-500 characters"))]
    pub title: Option<String>,

    /// Ignored unless the actor is an admin
    pub severity: Option<String>,

    /// Ignored unless the actor is an admin
    pub priority: Option<String>,

    pub status: Option<String>,

    #[validate(length(min = 1, max = 100, message = "Creator must be 1-100 characters"))]
    pub creator: Option<String>,

    pub assignee: Option<String>,
    pub menu_name: Option<String>,
    pub screen_name: Option<String>,
    #[validate(length(max = 2000, message = "Screen URL must not exceed 2000 characters"))]
    pub screen_url: Option<String>,
    pub screenshot: Option<String>,
    pub env_info: Option<String>,
    pub steps_to_repro: Option<String>,
    pub action_comment: Option<String>,
    pub action_start: Option<NaiveDate>,
    pub action_end: Option<NaiveDate>,
}

/// Remediation recorded by the fixer
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct DefectActionDto {
    #[schema(example = "Resolved")]
    pub status: Option<String>,

    #[validate(length(max = 5000, message = "Action comment must not exceed 5000 characters"))]
    pub action_comment: Option<String>,

    pub action_start: Option<NaiveDate>,
    pub action_end: Option<NaiveDate>,
}

/// Query parameters for the defect list
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DefectListQuery {
    /// Exact severity label
    pub severity: Option<String>,
    /// Exact status label
    pub status: Option<String>,
    /// Substring of the creator name (case-sensitive)
    pub creator: Option<String>,
    /// Substring of the assignee name (case-sensitive)
    pub assignee: Option<String>,
    pub test_type: Option<String>,
    /// First day included, YYYY-MM-DD
    pub date_start: Option<String>,
    /// Last day included, YYYY-MM-DD
    pub date_end: Option<String>,
    /// Page number (1-indexed)
    #[param(minimum = 1)]
    pub page: Option<i64>,
    /// One of the configured page sizes; anything else uses the default
    pub page_size: Option<i64>,
}

impl DefectListQuery {
    pub fn filter(&self) -> DefectFilter {
        DefectFilter {
            severity: self.severity.clone(),
            status: self.status.clone(),
            creator: self.creator.clone(),
            assignee: self.assignee.clone(),
            test_type: self.test_type.clone(),
            date_start: self.date_start.clone(),
            date_end: self.date_end.clone(),
        }
    }
}

/// One page of the filtered defect list
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DefectPageDto {
    pub items: Vec<Defect>,
    pub pagination: PaginationMeta,
}

impl From<Page<Defect>> for DefectPageDto {
    fn from(page: Page<Defect>) -> Self {
        Self {
            items: page.items,
            pagination: page.meta,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_dto(title: &str) -> CreateDefectDto {
        serde_json::from_value(serde_json::json!({
            "title": title,
            "creator": "Hong Gildong",
        }))
        .unwrap()
    }

    #[test]
    fn test_title_needs_five_characters() {
        assert!(create_dto("Crash").validate().is_ok());
        assert!(create_dto("Bug").validate().is_err());
        // Length counts characters, not bytes
        assert!(create_dto("로그인오류").validate().is_ok());
    }

    #[test]
    fn test_update_title_is_optional() {
        assert!(UpdateDefectDto::default().validate().is_ok());
        let dto = UpdateDefectDto {
            title: Some("abc".to_string()),
            ..Default::default()
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_list_query_to_filter() {
        let query = DefectListQuery {
            creator: Some("Lee".to_string()),
            page: Some(2),
            ..Default::default()
        };
        let filter = query.filter();
        assert_eq!(filter.creator.as_deref(), Some("Lee"));
        assert!(filter.status.is_none());
    }
}
