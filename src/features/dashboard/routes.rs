use axum::{routing::get, Router};
use std::sync::Arc;

use crate::features::dashboard::handlers;
use crate::features::dashboard::services::DashboardService;

/// Create dashboard routes
pub fn routes(dashboard_service: Arc<DashboardService>) -> Router {
    Router::new()
        .route("/api/dashboard/summary", get(handlers::get_summary))
        .route("/api/dashboard/recent", get(handlers::get_recent))
        .route("/api/dashboard/categories", get(handlers::get_categories))
        .with_state(dashboard_service)
}
