use axum::{
    routing::{get, patch},
    Router,
};
use std::sync::Arc;

use crate::features::defects::handlers;
use crate::features::defects::services::DefectService;

pub fn routes(defect_service: Arc<DefectService>) -> Router {
    Router::new()
        .route(
            "/api/defects",
            get(handlers::list_defects).post(handlers::create_defect),
        )
        .route(
            "/api/defects/{id}",
            get(handlers::get_defect)
                .put(handlers::update_defect)
                .delete(handlers::delete_defect),
        )
        .route("/api/defects/{id}/action", patch(handlers::record_action))
        .with_state(defect_service)
}
