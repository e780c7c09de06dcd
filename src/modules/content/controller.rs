use axum::{
    Json,
    extract::{Path, Query, State},
};
use edugate_core::AppError;
use edugate_entitlements::EffectiveAccess;
use edugate_models::MaterialId;
use tracing::instrument;

use crate::middleware::auth::{AuthUser, RequireStudent};
use crate::modules::access::service::AccessService;
use crate::modules::catalog::model::{Material, MaterialFilterParams, Section};
use crate::modules::catalog::service::CatalogService;
use crate::modules::content::model::{
    ContentScopeParams, ExamResponse, FileListParams, FilesResponse, FreeContentParams,
    FreeQuestionsResponse, FreeVideosResponse, QuestionGroupView, QuestionLookupParams,
    QuestionsResponse, SectionListParams, VideoListParams, VideosResponse,
};
use crate::modules::content::service::ContentService;
use crate::state::AppState;

async fn resolve_access(state: &AppState, auth_user: &AuthUser) -> Result<EffectiveAccess, AppError> {
    let student_id = auth_user.student_id()?;
    AccessService::resolve_for_student(&state.db, student_id, state.resolution_policy()).await
}

#[utoipa::path(
    get,
    path = "/api/student/materials",
    responses(
        (status = 200, description = "Every material of the catalog", body = Vec<Material>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires student role")
    ),
    tag = "Content",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn list_materials(
    State(state): State<AppState>,
    RequireStudent(_student): RequireStudent,
) -> Result<Json<Vec<Material>>, AppError> {
    let materials = CatalogService::get_materials(&state.db).await?;
    Ok(Json(materials))
}

#[utoipa::path(
    get,
    path = "/api/student/sections",
    params(SectionListParams),
    responses(
        (status = 200, description = "Sections of the material", body = Vec<Section>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires student role"),
        (status = 404, description = "Material not found")
    ),
    tag = "Content",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn list_sections(
    State(state): State<AppState>,
    RequireStudent(_student): RequireStudent,
    Query(params): Query<SectionListParams>,
) -> Result<Json<Vec<Section>>, AppError> {
    CatalogService::ensure_material_exists(&state.db, params.material_id).await?;
    let sections = CatalogService::get_sections(
        &state.db,
        MaterialFilterParams {
            material_id: Some(params.material_id),
        },
    )
    .await?;
    Ok(Json(sections))
}

#[utoipa::path(
    get,
    path = "/api/student/questions",
    params(ContentScopeParams),
    responses(
        (status = 200, description = "Question groups, full or previewed", body = QuestionsResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires student role"),
        (status = 404, description = "Student, material or section not found")
    ),
    tag = "Content",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_questions(
    State(state): State<AppState>,
    RequireStudent(auth_user): RequireStudent,
    Query(params): Query<ContentScopeParams>,
) -> Result<Json<QuestionsResponse>, AppError> {
    let access = resolve_access(&state, &auth_user).await?;

    let response = ContentService::get_questions(
        &state.db,
        &access,
        params.material_id,
        params.section_id,
        state.entitlement_config.sample_cap(None),
        state.sampler.as_ref(),
    )
    .await?;

    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/student/question",
    params(QuestionLookupParams),
    responses(
        (status = 200, description = "The group with only the requested question", body = QuestionGroupView),
        (status = 400, description = "Question index out of range"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "No question grant covers the group"),
        (status = 404, description = "Student or question group not found")
    ),
    tag = "Content",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_question(
    State(state): State<AppState>,
    RequireStudent(auth_user): RequireStudent,
    Query(params): Query<QuestionLookupParams>,
) -> Result<Json<QuestionGroupView>, AppError> {
    let access = resolve_access(&state, &auth_user).await?;
    let view = ContentService::get_question(
        &state.db,
        &access,
        params.question_group_id,
        params.question_index,
    )
    .await?;
    Ok(Json(view))
}

#[utoipa::path(
    get,
    path = "/api/student/videos",
    params(VideoListParams),
    responses(
        (status = 200, description = "Videos, full page or free preview", body = VideosResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires student role"),
        (status = 404, description = "Student, material or section not found")
    ),
    tag = "Content",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_videos(
    State(state): State<AppState>,
    RequireStudent(auth_user): RequireStudent,
    Query(params): Query<VideoListParams>,
) -> Result<Json<VideosResponse>, AppError> {
    let access = resolve_access(&state, &auth_user).await?;

    let response = ContentService::get_videos(
        &state.db,
        &access,
        params.material_id,
        params.section_id,
        params.pagination,
        state.entitlement_config.sample_cap(None),
    )
    .await?;

    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/student/materials/{id}/files",
    params(
        ("id" = Uuid, Path, description = "Material ID"),
        FileListParams
    ),
    responses(
        (status = 200, description = "Files of the material; locked entries carry no URL", body = FilesResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires student role"),
        (status = 404, description = "Student or material not found")
    ),
    tag = "Content",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_files(
    State(state): State<AppState>,
    RequireStudent(auth_user): RequireStudent,
    Path(id): Path<MaterialId>,
    Query(params): Query<FileListParams>,
) -> Result<Json<FilesResponse>, AppError> {
    let access = resolve_access(&state, &auth_user).await?;
    let response = ContentService::get_files(&state.db, &access, id, params.kind).await?;
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/student/materials/{id}/exam",
    params(
        ("id" = Uuid, Path, description = "Material ID")
    ),
    responses(
        (status = 200, description = "Sampled exam questions", body = ExamResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires student role"),
        (status = 404, description = "Student or material not found, or the material has no questions")
    ),
    tag = "Content",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_exam(
    State(state): State<AppState>,
    RequireStudent(auth_user): RequireStudent,
    Path(id): Path<MaterialId>,
) -> Result<Json<ExamResponse>, AppError> {
    let access = resolve_access(&state, &auth_user).await?;

    let response = ContentService::get_exam(
        &state.db,
        &access,
        id,
        state.entitlement_config.exam_cap(),
        state.entitlement_config.sample_cap(None),
        state.sampler.as_ref(),
    )
    .await?;

    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/student/free-questions",
    params(FreeContentParams),
    responses(
        (status = 200, description = "Free question preview", body = FreeQuestionsResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires student role"),
        (status = 404, description = "Material or section not found")
    ),
    tag = "Content",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_free_questions(
    State(state): State<AppState>,
    RequireStudent(_student): RequireStudent,
    Query(params): Query<FreeContentParams>,
) -> Result<Json<FreeQuestionsResponse>, AppError> {
    let response = ContentService::get_free_questions(
        &state.db,
        params.material_id,
        params.section_id,
        state.entitlement_config.sample_cap(params.limit),
        state.sampler.as_ref(),
    )
    .await?;

    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/student/free-videos",
    params(FreeContentParams),
    responses(
        (status = 200, description = "Free videos", body = FreeVideosResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires student role"),
        (status = 404, description = "Material or section not found")
    ),
    tag = "Content",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_free_videos(
    State(state): State<AppState>,
    RequireStudent(_student): RequireStudent,
    Query(params): Query<FreeContentParams>,
) -> Result<Json<FreeVideosResponse>, AppError> {
    let response = ContentService::get_free_videos(
        &state.db,
        params.material_id,
        params.section_id,
        state.entitlement_config.sample_cap(params.limit),
    )
    .await?;

    Ok(Json(response))
}
