use axum::{Json, extract::State};
use edugate_core::AppError;
use tracing::instrument;

use crate::middleware::auth::RequireAdmin;
use crate::modules::free_questions::model::{RebuildFreePoolDto, RebuildFreePoolResponse};
use crate::modules::free_questions::service::FreeQuestionService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/admin/free-questions/rebuild",
    request_body = RebuildFreePoolDto,
    responses(
        (status = 200, description = "Pool rebuilt; per-section outcomes", body = RebuildFreePoolResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires admin role"),
        (status = 422, description = "Validation error")
    ),
    tag = "Free Questions",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn rebuild_free_pool(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ValidatedJson(dto): ValidatedJson<RebuildFreePoolDto>,
) -> Result<Json<RebuildFreePoolResponse>, AppError> {
    let cap = dto
        .per_section_cap
        .unwrap_or(state.entitlement_config.free_pool_section_cap)
        .max(1) as usize;

    let report =
        FreeQuestionService::rebuild_free_pool(&state.db, cap, state.sampler.as_ref()).await?;

    Ok(Json(report))
}
