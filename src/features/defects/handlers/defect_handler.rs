use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{ActorRole, AppJson};
use crate::features::defects::dtos::{
    CreateDefectDto, DefectActionDto, DefectListQuery, DefectPageDto, UpdateDefectDto,
};
use crate::features::defects::models::Defect;
use crate::features::defects::services::DefectService;
use crate::shared::types::{ApiResponse, Meta};

/// List defects matching the filter, newest first, one page at a time
#[utoipa::path(
    get,
    path = "/api/defects",
    params(DefectListQuery),
    responses(
        (status = 200, description = "Page of defects", body = ApiResponse<DefectPageDto>),
        (status = 500, description = "Internal server error")
    ),
    tag = "defects"
)]
pub async fn list_defects(
    State(service): State<Arc<DefectService>>,
    Query(query): Query<DefectListQuery>,
) -> Result<Json<ApiResponse<DefectPageDto>>> {
    let page = service
        .list(&query.filter(), query.page, query.page_size)
        .await?;
    let total = page.meta.total_items;

    Ok(Json(ApiResponse::success(
        Some(page.into()),
        None,
        Some(Meta { total }),
    )))
}

#[utoipa::path(
    get,
    path = "/api/defects/{id}",
    params(("id" = i64, Path, description = "Defect ID")),
    responses(
        (status = 200, description = "Defect", body = ApiResponse<Defect>),
        (status = 404, description = "Defect not found")
    ),
    tag = "defects"
)]
pub async fn get_defect(
    State(service): State<Arc<DefectService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Defect>>> {
    let defect = service.get(id).await?;
    Ok(Json(ApiResponse::success(Some(defect), None, None)))
}

/// Register a defect
///
/// Severity and priority are only taken from admins (`X-Actor-Role: admin`);
/// other roles get Minor / P3.
#[utoipa::path(
    post,
    path = "/api/defects",
    request_body = CreateDefectDto,
    params(("X-Actor-Role" = Option<String>, Header, description = "tester, qa, fixer or admin")),
    responses(
        (status = 201, description = "Defect created", body = ApiResponse<Defect>),
        (status = 400, description = "Validation error")
    ),
    tag = "defects"
)]
pub async fn create_defect(
    State(service): State<Arc<DefectService>>,
    ActorRole(role): ActorRole,
    AppJson(dto): AppJson<CreateDefectDto>,
) -> Result<(StatusCode, Json<ApiResponse<Defect>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let defect = service.create(dto, &role).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(defect),
            Some("Defect registered".to_string()),
            None,
        )),
    ))
}

/// Edit a defect; omitted fields keep their values
#[utoipa::path(
    put,
    path = "/api/defects/{id}",
    request_body = UpdateDefectDto,
    params(
        ("id" = i64, Path, description = "Defect ID"),
        ("X-Actor-Role" = Option<String>, Header, description = "tester, qa, fixer or admin")
    ),
    responses(
        (status = 200, description = "Defect updated", body = ApiResponse<Defect>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Defect not found")
    ),
    tag = "defects"
)]
pub async fn update_defect(
    State(service): State<Arc<DefectService>>,
    Path(id): Path<i64>,
    ActorRole(role): ActorRole,
    AppJson(dto): AppJson<UpdateDefectDto>,
) -> Result<Json<ApiResponse<Defect>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let defect = service.update(id, dto, &role).await?;
    Ok(Json(ApiResponse::success(
        Some(defect),
        Some("Defect updated".to_string()),
        None,
    )))
}

/// Record remediation: status, comment and work dates
#[utoipa::path(
    patch,
    path = "/api/defects/{id}/action",
    request_body = DefectActionDto,
    params(("id" = i64, Path, description = "Defect ID")),
    responses(
        (status = 200, description = "Action recorded", body = ApiResponse<Defect>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Defect not found")
    ),
    tag = "defects"
)]
pub async fn record_action(
    State(service): State<Arc<DefectService>>,
    Path(id): Path<i64>,
    AppJson(dto): AppJson<DefectActionDto>,
) -> Result<Json<ApiResponse<Defect>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let defect = service.record_action(id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(defect),
        Some("Action recorded".to_string()),
        None,
    )))
}

#[utoipa::path(
    delete,
    path = "/api/defects/{id}",
    params(("id" = i64, Path, description = "Defect ID")),
    responses(
        (status = 200, description = "Defect deleted"),
        (status = 404, description = "Defect not found")
    ),
    tag = "defects"
)]
pub async fn delete_defect(
    State(service): State<Arc<DefectService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Defect deleted".to_string()),
        None,
    )))
}
