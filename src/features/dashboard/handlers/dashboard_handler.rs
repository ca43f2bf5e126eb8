use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::core::error::AppError;
use crate::features::dashboard::dtos::*;
use crate::features::dashboard::services::{DashboardService, DefectStats};
use crate::shared::types::ApiResponse;

// ============================================================================
// Summary
// ============================================================================

/// Counters and status/severity histograms over the enabled categories
#[utoipa::path(
    get,
    path = "/api/dashboard/summary",
    tag = "Dashboard",
    params(CategoryToggleParams),
    responses(
        (status = 200, description = "Dashboard summary", body = ApiResponse<DefectStats>),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_summary(
    State(service): State<Arc<DashboardService>>,
    Query(params): Query<CategoryToggleParams>,
) -> Result<Json<ApiResponse<DefectStats>>, AppError> {
    let stats = service.get_summary(&params.toggled_categories()).await?;
    Ok(Json(ApiResponse::success(Some(stats), None, None)))
}

// ============================================================================
// Recent
// ============================================================================

/// Newest defects first
#[utoipa::path(
    get,
    path = "/api/dashboard/recent",
    tag = "Dashboard",
    params(RecentParams),
    responses(
        (status = 200, description = "Recent defects", body = ApiResponse<DashboardRecentDto>),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_recent(
    State(service): State<Arc<DashboardService>>,
    Query(params): Query<RecentParams>,
) -> Result<Json<ApiResponse<DashboardRecentDto>>, AppError> {
    let recent = service.get_recent(params.limit).await?;
    Ok(Json(ApiResponse::success(Some(recent), None, None)))
}

// ============================================================================
// Categories
// ============================================================================

/// Test-type categories with their enabled flag
#[utoipa::path(
    get,
    path = "/api/dashboard/categories",
    tag = "Dashboard",
    params(CategoryToggleParams),
    responses(
        (status = 200, description = "Categories", body = ApiResponse<Vec<CategoryStatusDto>>),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_categories(
    State(service): State<Arc<DashboardService>>,
    Query(params): Query<CategoryToggleParams>,
) -> Result<Json<ApiResponse<Vec<CategoryStatusDto>>>, AppError> {
    let categories = service
        .get_categories(&params.toggled_categories())
        .await?;
    Ok(Json(ApiResponse::listing(categories)))
}
