use axum::{Json, extract::State};
use edugate_core::AppError;
use tracing::instrument;

use crate::middleware::auth::RequireStudent;
use crate::modules::access::model::{AccessibleMaterialsResponse, EffectiveAccess};
use crate::modules::access::service::AccessService;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/student/access",
    responses(
        (status = 200, description = "Content the student may access in full", body = EffectiveAccess),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires student role"),
        (status = 404, description = "Student not found")
    ),
    tag = "Access",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_my_access(
    State(state): State<AppState>,
    RequireStudent(auth_user): RequireStudent,
) -> Result<Json<EffectiveAccess>, AppError> {
    let student_id = auth_user.student_id()?;

    let access =
        AccessService::resolve_for_student(&state.db, student_id, state.resolution_policy())
            .await?;

    Ok(Json(access))
}

#[utoipa::path(
    get,
    path = "/api/student/materials/accessible",
    responses(
        (status = 200, description = "Materials with question or file access", body = AccessibleMaterialsResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires student role"),
        (status = 404, description = "Student not found")
    ),
    tag = "Access",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_accessible_materials(
    State(state): State<AppState>,
    RequireStudent(auth_user): RequireStudent,
) -> Result<Json<AccessibleMaterialsResponse>, AppError> {
    let student_id = auth_user.student_id()?;

    let access =
        AccessService::resolve_for_student(&state.db, student_id, state.resolution_policy())
            .await?;
    let materials = AccessService::accessible_materials(&state.db, &access).await?;

    Ok(Json(materials))
}
