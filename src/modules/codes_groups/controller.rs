use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use edugate_core::{AppError, PaginationParams};
use edugate_models::CodesGroupId;
use tracing::instrument;

use crate::middleware::auth::RequireAdmin;
use crate::modules::codes_groups::model::{
    CodesGroup, GenerateCodesDto, GenerateCodesResponse, PaginatedCodesGroupsResponse,
    PaginatedCodesResponse,
};
use crate::modules::codes_groups::service::CodesGroupService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/admin/codes-groups",
    request_body = GenerateCodesDto,
    responses(
        (status = 201, description = "Codes group created with its codes", body = GenerateCodesResponse),
        (status = 400, description = "Past expiration, missing target, no grant, or unknown composite target"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires admin role"),
        (status = 404, description = "Section or material not found"),
        (status = 422, description = "Validation error")
    ),
    tag = "Codes Groups",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn generate_codes(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ValidatedJson(dto): ValidatedJson<GenerateCodesDto>,
) -> Result<(StatusCode, Json<GenerateCodesResponse>), AppError> {
    let response = CodesGroupService::generate_codes(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/admin/codes-groups",
    params(PaginationParams),
    responses(
        (status = 200, description = "Codes groups, newest first", body = PaginatedCodesGroupsResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires admin role")
    ),
    tag = "Codes Groups",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_codes_groups(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<PaginatedCodesGroupsResponse>, AppError> {
    let groups = CodesGroupService::get_codes_groups(&state.db, pagination).await?;
    Ok(Json(groups))
}

#[utoipa::path(
    get,
    path = "/api/admin/codes-groups/{id}",
    params(
        ("id" = Uuid, Path, description = "Codes group ID")
    ),
    responses(
        (status = 200, description = "Codes group details", body = CodesGroup),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires admin role"),
        (status = 404, description = "Codes group not found")
    ),
    tag = "Codes Groups",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_codes_group(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<CodesGroupId>,
) -> Result<Json<CodesGroup>, AppError> {
    let group = CodesGroupService::get_codes_group(&state.db, id).await?;
    Ok(Json(group))
}

#[utoipa::path(
    get,
    path = "/api/admin/codes-groups/{id}/codes",
    params(
        ("id" = Uuid, Path, description = "Codes group ID"),
        PaginationParams
    ),
    responses(
        (status = 200, description = "Codes of the group", body = PaginatedCodesResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires admin role"),
        (status = 404, description = "Codes group not found")
    ),
    tag = "Codes Groups",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_codes(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<CodesGroupId>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<PaginatedCodesResponse>, AppError> {
    let codes = CodesGroupService::get_codes(&state.db, id, pagination).await?;
    Ok(Json(codes))
}

#[utoipa::path(
    delete,
    path = "/api/admin/codes-groups/{id}",
    params(
        ("id" = Uuid, Path, description = "Codes group ID")
    ),
    responses(
        (status = 204, description = "Codes group deleted with its codes and redemptions"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires admin role"),
        (status = 404, description = "Codes group not found")
    ),
    tag = "Codes Groups",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_codes_group(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<CodesGroupId>,
) -> Result<StatusCode, AppError> {
    CodesGroupService::delete_codes_group(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
