use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use edugate_core::AppError;
use edugate_models::{FileId, MaterialId, QuestionGroupId, SectionId, VideoId};
use tracing::instrument;

use crate::middleware::auth::RequireAdmin;
use crate::modules::catalog::model::{
    CatalogFilterParams, CreateFileDto, CreateMaterialDto, CreateQuestionGroupDto,
    CreateSectionDto, CreateVideoDto, Material, MaterialFile, MaterialFilterParams,
    PaginatedQuestionGroupsResponse, PaginatedVideosResponse, Question, QuestionGroup,
    ReorderVideosDto, Section, SetVideoFreeDto, UpdateFileDto, UpdateMaterialDto,
    UpdateQuestionGroupDto, UpdateSectionDto, UpdateVideoDto, Video,
};
use crate::modules::catalog::service::CatalogService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/admin/materials",
    request_body = CreateMaterialDto,
    responses(
        (status = 201, description = "Material created", body = Material),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires admin role"),
        (status = 422, description = "Validation error")
    ),
    tag = "Catalog",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn create_material(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ValidatedJson(dto): ValidatedJson<CreateMaterialDto>,
) -> Result<(StatusCode, Json<Material>), AppError> {
    let material = CatalogService::create_material(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(material)))
}

#[utoipa::path(
    get,
    path = "/api/admin/materials",
    responses(
        (status = 200, description = "All materials", body = Vec<Material>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires admin role")
    ),
    tag = "Catalog",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_materials(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<Material>>, AppError> {
    let materials = CatalogService::get_materials(&state.db).await?;
    Ok(Json(materials))
}

#[utoipa::path(
    get,
    path = "/api/admin/materials/{id}",
    params(
        ("id" = Uuid, Path, description = "Material ID")
    ),
    responses(
        (status = 200, description = "Material details", body = Material),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires admin role"),
        (status = 404, description = "Material not found")
    ),
    tag = "Catalog",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_material(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<MaterialId>,
) -> Result<Json<Material>, AppError> {
    let material = CatalogService::get_material(&state.db, id).await?;
    Ok(Json(material))
}

#[utoipa::path(
    put,
    path = "/api/admin/materials/{id}",
    params(
        ("id" = Uuid, Path, description = "Material ID")
    ),
    request_body = UpdateMaterialDto,
    responses(
        (status = 200, description = "Material updated", body = Material),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires admin role"),
        (status = 404, description = "Material not found"),
        (status = 422, description = "Validation error")
    ),
    tag = "Catalog",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_material(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<MaterialId>,
    ValidatedJson(dto): ValidatedJson<UpdateMaterialDto>,
) -> Result<Json<Material>, AppError> {
    let updated = CatalogService::update_material(&state.db, id, dto).await?;
    Ok(Json(updated))
}

#[utoipa::path(
    delete,
    path = "/api/admin/materials/{id}",
    params(
        ("id" = Uuid, Path, description = "Material ID")
    ),
    responses(
        (status = 204, description = "Material deleted with its sections and content"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires admin role"),
        (status = 404, description = "Material not found")
    ),
    tag = "Catalog",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_material(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<MaterialId>,
) -> Result<StatusCode, AppError> {
    CatalogService::delete_material(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/admin/sections",
    request_body = CreateSectionDto,
    responses(
        (status = 201, description = "Section created", body = Section),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires admin role"),
        (status = 404, description = "Material not found"),
        (status = 422, description = "Validation error")
    ),
    tag = "Catalog",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn create_section(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ValidatedJson(dto): ValidatedJson<CreateSectionDto>,
) -> Result<(StatusCode, Json<Section>), AppError> {
    let section = CatalogService::create_section(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(section)))
}

#[utoipa::path(
    get,
    path = "/api/admin/sections",
    params(MaterialFilterParams),
    responses(
        (status = 200, description = "Sections, optionally of one material", body = Vec<Section>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires admin role")
    ),
    tag = "Catalog",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_sections(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(filters): Query<MaterialFilterParams>,
) -> Result<Json<Vec<Section>>, AppError> {
    let sections = CatalogService::get_sections(&state.db, filters).await?;
    Ok(Json(sections))
}

#[utoipa::path(
    put,
    path = "/api/admin/sections/{id}",
    params(
        ("id" = Uuid, Path, description = "Section ID")
    ),
    request_body = UpdateSectionDto,
    responses(
        (status = 200, description = "Section renamed", body = Section),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires admin role"),
        (status = 404, description = "Section not found"),
        (status = 422, description = "Validation error")
    ),
    tag = "Catalog",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_section(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<SectionId>,
    ValidatedJson(dto): ValidatedJson<UpdateSectionDto>,
) -> Result<Json<Section>, AppError> {
    let updated = CatalogService::update_section(&state.db, id, dto).await?;
    Ok(Json(updated))
}

#[utoipa::path(
    delete,
    path = "/api/admin/sections/{id}",
    params(
        ("id" = Uuid, Path, description = "Section ID")
    ),
    responses(
        (status = 204, description = "Section deleted with its content"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires admin role"),
        (status = 404, description = "Section not found")
    ),
    tag = "Catalog",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_section(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<SectionId>,
) -> Result<StatusCode, AppError> {
    CatalogService::delete_section(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/admin/videos",
    request_body = CreateVideoDto,
    responses(
        (status = 201, description = "Video created", body = Video),
        (status = 400, description = "Section does not belong to material"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires admin role"),
        (status = 404, description = "Section not found"),
        (status = 422, description = "Validation error")
    ),
    tag = "Catalog",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn create_video(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ValidatedJson(dto): ValidatedJson<CreateVideoDto>,
) -> Result<(StatusCode, Json<Video>), AppError> {
    let video = CatalogService::create_video(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(video)))
}

#[utoipa::path(
    get,
    path = "/api/admin/videos",
    params(CatalogFilterParams),
    responses(
        (status = 200, description = "Videos in display order", body = PaginatedVideosResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires admin role")
    ),
    tag = "Catalog",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_videos(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(filters): Query<CatalogFilterParams>,
) -> Result<Json<PaginatedVideosResponse>, AppError> {
    let videos = CatalogService::get_videos(&state.db, filters).await?;
    Ok(Json(videos))
}

#[utoipa::path(
    put,
    path = "/api/admin/videos/reorder",
    request_body = ReorderVideosDto,
    responses(
        (status = 200, description = "Section videos in their new order", body = Vec<Video>),
        (status = 400, description = "Ids do not match the section's videos"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires admin role"),
        (status = 404, description = "Section not found"),
        (status = 422, description = "Validation error")
    ),
    tag = "Catalog",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn reorder_videos(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ValidatedJson(dto): ValidatedJson<ReorderVideosDto>,
) -> Result<Json<Vec<Video>>, AppError> {
    let videos = CatalogService::reorder_videos(&state.db, dto).await?;
    Ok(Json(videos))
}

#[utoipa::path(
    patch,
    path = "/api/admin/videos/{id}/free",
    params(
        ("id" = Uuid, Path, description = "Video ID")
    ),
    request_body = SetVideoFreeDto,
    responses(
        (status = 200, description = "Video updated", body = Video),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires admin role"),
        (status = 404, description = "Video not found")
    ),
    tag = "Catalog",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn set_video_free(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<VideoId>,
    Json(dto): Json<SetVideoFreeDto>,
) -> Result<Json<Video>, AppError> {
    let video = CatalogService::set_video_free(&state.db, id, dto.is_free).await?;
    Ok(Json(video))
}

#[utoipa::path(
    put,
    path = "/api/admin/videos/{id}",
    params(
        ("id" = Uuid, Path, description = "Video ID")
    ),
    request_body = UpdateVideoDto,
    responses(
        (status = 200, description = "Video updated", body = Video),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires admin role"),
        (status = 404, description = "Video not found"),
        (status = 422, description = "Validation error")
    ),
    tag = "Catalog",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_video(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<VideoId>,
    ValidatedJson(dto): ValidatedJson<UpdateVideoDto>,
) -> Result<Json<Video>, AppError> {
    let updated = CatalogService::update_video(&state.db, id, dto).await?;
    Ok(Json(updated))
}

#[utoipa::path(
    delete,
    path = "/api/admin/videos/{id}",
    params(
        ("id" = Uuid, Path, description = "Video ID")
    ),
    responses(
        (status = 204, description = "Video deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires admin role"),
        (status = 404, description = "Video not found")
    ),
    tag = "Catalog",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_video(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<VideoId>,
) -> Result<StatusCode, AppError> {
    CatalogService::delete_video(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/admin/question-groups",
    request_body = CreateQuestionGroupDto,
    responses(
        (status = 201, description = "Question group created", body = QuestionGroup),
        (status = 400, description = "Section does not belong to material"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires admin role"),
        (status = 404, description = "Section not found"),
        (status = 422, description = "Validation error")
    ),
    tag = "Catalog",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn create_question_group(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ValidatedJson(dto): ValidatedJson<CreateQuestionGroupDto>,
) -> Result<(StatusCode, Json<QuestionGroup>), AppError> {
    let group = CatalogService::create_question_group(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(group)))
}

#[utoipa::path(
    get,
    path = "/api/admin/question-groups",
    params(CatalogFilterParams),
    responses(
        (status = 200, description = "Question groups", body = PaginatedQuestionGroupsResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires admin role")
    ),
    tag = "Catalog",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_question_groups(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(filters): Query<CatalogFilterParams>,
) -> Result<Json<PaginatedQuestionGroupsResponse>, AppError> {
    let groups = CatalogService::get_question_groups(&state.db, filters).await?;
    Ok(Json(groups))
}

#[utoipa::path(
    put,
    path = "/api/admin/question-groups/{id}",
    params(
        ("id" = Uuid, Path, description = "Question group ID")
    ),
    request_body = UpdateQuestionGroupDto,
    responses(
        (status = 200, description = "Question group updated", body = QuestionGroup),
        (status = 400, description = "Section does not belong to the group's material"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires admin role"),
        (status = 404, description = "Question group or section not found"),
        (status = 422, description = "Validation error")
    ),
    tag = "Catalog",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_question_group(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<QuestionGroupId>,
    ValidatedJson(dto): ValidatedJson<UpdateQuestionGroupDto>,
) -> Result<Json<QuestionGroup>, AppError> {
    let updated = CatalogService::update_question_group(&state.db, id, dto).await?;
    Ok(Json(updated))
}

#[utoipa::path(
    delete,
    path = "/api/admin/question-groups/{id}",
    params(
        ("id" = Uuid, Path, description = "Question group ID")
    ),
    responses(
        (status = 204, description = "Question group deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires admin role"),
        (status = 404, description = "Question group not found")
    ),
    tag = "Catalog",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_question_group(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<QuestionGroupId>,
) -> Result<StatusCode, AppError> {
    CatalogService::delete_question_group(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    put,
    path = "/api/admin/question-groups/{id}/questions/{index}",
    params(
        ("id" = Uuid, Path, description = "Question group ID"),
        ("index" = usize, Path, description = "Zero-based question position")
    ),
    request_body = Question,
    responses(
        (status = 200, description = "Question replaced", body = QuestionGroup),
        (status = 400, description = "Question index out of range"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires admin role"),
        (status = 404, description = "Question group not found"),
        (status = 422, description = "Validation error")
    ),
    tag = "Catalog",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, question))]
pub async fn update_question(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path((id, index)): Path<(QuestionGroupId, usize)>,
    ValidatedJson(question): ValidatedJson<Question>,
) -> Result<Json<QuestionGroup>, AppError> {
    let group = CatalogService::update_question(&state.db, id, index, question).await?;
    Ok(Json(group))
}

#[utoipa::path(
    delete,
    path = "/api/admin/question-groups/{id}/questions/{index}",
    params(
        ("id" = Uuid, Path, description = "Question group ID"),
        ("index" = usize, Path, description = "Zero-based question position")
    ),
    responses(
        (status = 200, description = "Question removed, remaining group returned", body = QuestionGroup),
        (status = 400, description = "Question index out of range or last question of the group"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires admin role"),
        (status = 404, description = "Question group not found")
    ),
    tag = "Catalog",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_question(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path((id, index)): Path<(QuestionGroupId, usize)>,
) -> Result<Json<QuestionGroup>, AppError> {
    let group = CatalogService::delete_question(&state.db, id, index).await?;
    Ok(Json(group))
}

#[utoipa::path(
    post,
    path = "/api/admin/files",
    request_body = CreateFileDto,
    responses(
        (status = 201, description = "File registered", body = MaterialFile),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires admin role"),
        (status = 404, description = "Material not found"),
        (status = 409, description = "File number already used for the material"),
        (status = 422, description = "Validation error")
    ),
    tag = "Catalog",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn create_file(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ValidatedJson(dto): ValidatedJson<CreateFileDto>,
) -> Result<(StatusCode, Json<MaterialFile>), AppError> {
    let file = CatalogService::create_file(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(file)))
}

#[utoipa::path(
    get,
    path = "/api/admin/files",
    params(MaterialFilterParams),
    responses(
        (status = 200, description = "Material files ordered by number", body = Vec<MaterialFile>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires admin role")
    ),
    tag = "Catalog",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_files(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(filters): Query<MaterialFilterParams>,
) -> Result<Json<Vec<MaterialFile>>, AppError> {
    let files = CatalogService::get_files(&state.db, filters).await?;
    Ok(Json(files))
}

#[utoipa::path(
    put,
    path = "/api/admin/files/{id}",
    params(
        ("id" = Uuid, Path, description = "File ID")
    ),
    request_body = UpdateFileDto,
    responses(
        (status = 200, description = "File updated", body = MaterialFile),
        (status = 409, description = "File number already used for the material"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires admin role"),
        (status = 404, description = "File not found"),
        (status = 422, description = "Validation error")
    ),
    tag = "Catalog",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_file(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<FileId>,
    ValidatedJson(dto): ValidatedJson<UpdateFileDto>,
) -> Result<Json<MaterialFile>, AppError> {
    let updated = CatalogService::update_file(&state.db, id, dto).await?;
    Ok(Json(updated))
}

#[utoipa::path(
    delete,
    path = "/api/admin/files/{id}",
    params(
        ("id" = Uuid, Path, description = "File ID")
    ),
    responses(
        (status = 204, description = "File deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires admin role"),
        (status = 404, description = "File not found")
    ),
    tag = "Catalog",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_file(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<FileId>,
) -> Result<StatusCode, AppError> {
    CatalogService::delete_file(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
