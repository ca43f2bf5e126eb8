use utoipa::{Modify, OpenApi};

use crate::features::dashboard::{
    dtos as dashboard_dtos, handlers as dashboard_handlers, services as dashboard_services,
};
use crate::features::defects::{
    dtos as defects_dtos, handlers as defects_handlers, models as defects_models,
};
use crate::features::users::{dtos as users_dtos, handlers::user_handler, models as users_models};
use crate::shared::pagination::PaginationMeta;
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Defects
        defects_handlers::list_defects,
        defects_handlers::get_defect,
        defects_handlers::create_defect,
        defects_handlers::update_defect,
        defects_handlers::record_action,
        defects_handlers::delete_defect,
        // Users
        user_handler::list_users,
        user_handler::list_assignees,
        user_handler::get_user,
        user_handler::create_user,
        user_handler::update_user,
        user_handler::delete_user,
        // Dashboard
        dashboard_handlers::dashboard_handler::get_summary,
        dashboard_handlers::dashboard_handler::get_recent,
        dashboard_handlers::dashboard_handler::get_categories,
    ),
    components(
        schemas(
            // Shared
            Meta,
            PaginationMeta,
            // Defects
            defects_models::Defect,
            defects_dtos::CreateDefectDto,
            defects_dtos::UpdateDefectDto,
            defects_dtos::DefectActionDto,
            defects_dtos::DefectPageDto,
            ApiResponse<defects_models::Defect>,
            ApiResponse<defects_dtos::DefectPageDto>,
            // Users
            users_models::User,
            users_dtos::CreateUserDto,
            users_dtos::UpdateUserDto,
            ApiResponse<users_models::User>,
            ApiResponse<Vec<users_models::User>>,
            // Dashboard
            dashboard_services::DefectStats,
            dashboard_services::HistogramBucket,
            dashboard_dtos::DashboardRecentDto,
            dashboard_dtos::CategoryStatusDto,
            ApiResponse<dashboard_services::DefectStats>,
            ApiResponse<dashboard_dtos::DashboardRecentDto>,
            ApiResponse<Vec<dashboard_dtos::CategoryStatusDto>>,
        )
    ),
    tags(
        (name = "defects", description = "Defect registration, search and remediation"),
        (name = "users", description = "Testers, fixers and administrators"),
        (name = "Dashboard", description = "Defect statistics and recent activity"),
    ),
    info(
        title = "DefectFlow API",
        version = "0.1.0",
        description = "API documentation for DefectFlow",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_route_is_documented() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/defects",
            "/api/defects/{id}",
            "/api/defects/{id}/action",
            "/api/users",
            "/api/users/assignees",
            "/api/users/{id}",
            "/api/dashboard/summary",
            "/api/dashboard/recent",
            "/api/dashboard/categories",
        ] {
            assert!(doc.paths.paths.contains_key(path), "{} missing", path);
        }
    }

    #[test]
    fn test_info_modifier() {
        let mut doc = ApiDoc::openapi();
        SwaggerInfoModifier {
            title: "Internal QA".to_string(),
            version: "2.0.0".to_string(),
            description: "Staging".to_string(),
        }
        .modify(&mut doc);
        assert_eq!(doc.info.title, "Internal QA");
        assert_eq!(doc.info.description.as_deref(), Some("Staging"));
    }
}
