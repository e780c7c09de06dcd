use axum::{Json, extract::State, http::StatusCode};
use edugate_core::AppError;
use tracing::instrument;

use crate::metrics::{track_code_redeemed, track_rate_limited};
use crate::middleware::auth::RequireStudent;
use crate::modules::redemptions::model::{
    RedeemCodeDto, RedemptionHistoryResponse, RedemptionResult, normalize_code,
};
use crate::modules::redemptions::service::RedemptionService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/student/redemptions",
    request_body = RedeemCodeDto,
    responses(
        (status = 201, description = "Code redeemed", body = RedemptionResult),
        (status = 400, description = "Blank or overlong code"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires student role, or student blocked"),
        (status = 404, description = "Unknown code or student"),
        (status = 409, description = "Code already used, or group already redeemed"),
        (status = 410, description = "Codes group has expired"),
        (status = 422, description = "Validation error"),
        (status = 429, description = "Too many redemption attempts")
    ),
    tag = "Redemptions",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn redeem_code(
    State(state): State<AppState>,
    RequireStudent(auth_user): RequireStudent,
    ValidatedJson(dto): ValidatedJson<RedeemCodeDto>,
) -> Result<(StatusCode, Json<RedemptionResult>), AppError> {
    let student_id = auth_user.student_id()?;
    let code = normalize_code(&dto.code)?;

    if state.redeem_limiter.check_key(&student_id).is_err() {
        track_rate_limited("redeem");
        track_code_redeemed("rate_limited");
        return Err(AppError::too_many_requests(
            "Too many redemption attempts. Please try again later".to_string(),
        ));
    }

    let result = RedemptionService::redeem(&state.db, student_id, &code).await?;

    Ok((StatusCode::CREATED, Json(result)))
}

#[utoipa::path(
    get,
    path = "/api/student/redemptions",
    responses(
        (status = 200, description = "The student's redemptions, newest first", body = RedemptionHistoryResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires student role"),
        (status = 404, description = "Student not found")
    ),
    tag = "Redemptions",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_my_redemptions(
    State(state): State<AppState>,
    RequireStudent(auth_user): RequireStudent,
) -> Result<Json<RedemptionHistoryResponse>, AppError> {
    let student_id = auth_user.student_id()?;
    let history = RedemptionService::get_history(&state.db, student_id).await?;
    Ok(Json(history))
}
