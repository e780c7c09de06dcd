use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use edugate_core::{AppError, PaginationParams};
use edugate_entitlements::EffectiveAccess;
use edugate_models::StudentId;
use tracing::instrument;

use crate::middleware::auth::RequireAdmin;
use crate::modules::access::service::AccessService;
use crate::modules::students::model::{
    CreateStudentDto, PaginatedStudentsResponse, SetStudentBlockedDto, Student,
};
use crate::modules::students::service::StudentService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/admin/students",
    request_body = CreateStudentDto,
    responses(
        (status = 201, description = "Student created successfully", body = Student),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires admin role"),
        (status = 409, description = "Phone number already registered"),
        (status = 422, description = "Validation error")
    ),
    tag = "Students",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_student(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ValidatedJson(dto): ValidatedJson<CreateStudentDto>,
) -> Result<(StatusCode, Json<Student>), AppError> {
    let student = StudentService::create_student(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(student)))
}

#[utoipa::path(
    get,
    path = "/api/admin/students",
    params(PaginationParams),
    responses(
        (status = 200, description = "List of students", body = PaginatedStudentsResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires admin role")
    ),
    tag = "Students",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_students(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<PaginatedStudentsResponse>, AppError> {
    let students = StudentService::get_students(&state.db, pagination).await?;
    Ok(Json(students))
}

#[utoipa::path(
    get,
    path = "/api/admin/students/{id}",
    params(
        ("id" = Uuid, Path, description = "Student ID")
    ),
    responses(
        (status = 200, description = "Student details", body = Student),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires admin role"),
        (status = 404, description = "Student not found")
    ),
    tag = "Students",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_student(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<StudentId>,
) -> Result<Json<Student>, AppError> {
    let student = StudentService::get_student(&state.db, id).await?;
    Ok(Json(student))
}

#[utoipa::path(
    get,
    path = "/api/admin/students/{id}/access",
    params(
        ("id" = Uuid, Path, description = "Student ID")
    ),
    responses(
        (status = 200, description = "Student's effective access", body = EffectiveAccess),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires admin role"),
        (status = 404, description = "Student not found")
    ),
    tag = "Students",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_student_access(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<StudentId>,
) -> Result<Json<EffectiveAccess>, AppError> {
    let access =
        AccessService::resolve_for_student(&state.db, id, state.resolution_policy()).await?;
    Ok(Json(access))
}

#[utoipa::path(
    patch,
    path = "/api/admin/students/{id}/block",
    params(
        ("id" = Uuid, Path, description = "Student ID")
    ),
    request_body = SetStudentBlockedDto,
    responses(
        (status = 200, description = "Student block status updated", body = Student),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires admin role"),
        (status = 404, description = "Student not found")
    ),
    tag = "Students",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn set_student_blocked(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<StudentId>,
    Json(dto): Json<SetStudentBlockedDto>,
) -> Result<Json<Student>, AppError> {
    let student = StudentService::set_blocked(&state.db, id, dto.is_blocked).await?;
    Ok(Json(student))
}
