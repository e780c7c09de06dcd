use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};

use edugate_core::{PaginationMeta, PaginationParams};
use edugate_entitlements::{ContentType, EffectiveAccess, MaterialAccess, SectionAccess};
use edugate_models::catalog::{
    CatalogFilterParams, Choice, CreateFileDto, CreateMaterialDto, CreateQuestionGroupDto,
    CreateSectionDto, CreateVideoDto, FileKind, FreeQuestionGroup, Image, Material, MaterialFile,
    PaginatedQuestionGroupsResponse, PaginatedVideosResponse, Question, QuestionGroup,
    ReorderVideosDto, Section, SeekPoint, SetVideoFreeDto, UpdateFileDto, UpdateMaterialDto,
    UpdateQuestionGroupDto, UpdateSectionDto, UpdateVideoDto, Video, VideoSource,
};
use edugate_models::codes_groups::{
    AccessFlags, Code, CodesGroup, CodesGroupSummary, GenerateCodesDto, GenerateCodesResponse,
    GenerationMode, GrantSurface, PaginatedCodesGroupsResponse, PaginatedCodesResponse,
};
use edugate_models::content::{
    AccessibleMaterialsCount, AccessibleMaterialsResponse, ExamResponse, FileView, FilesResponse,
    FreeQuestionsResponse, FreeVideosResponse, QuestionGroupView, QuestionLookupParams,
    QuestionsResponse, SampleMeta, SectionListParams, VideosResponse,
};
use edugate_models::free_questions::{
    RebuildFreePoolDto, RebuildFreePoolResponse, SectionRebuildOutcome,
};
use edugate_models::redemptions::{
    RedeemCodeDto, Redemption, RedemptionHistoryItem, RedemptionResult,
};
use edugate_models::students::{CreateStudentDto, SetStudentBlockedDto, Student};

use crate::modules::redemptions::model::RedemptionHistoryResponse;
use crate::modules::students::model::PaginatedStudentsResponse;

/// Body of every non-2xx response.
#[derive(ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::access::controller::get_my_access,
        crate::modules::access::controller::get_accessible_materials,
        crate::modules::redemptions::controller::redeem_code,
        crate::modules::redemptions::controller::get_my_redemptions,
        crate::modules::content::controller::list_materials,
        crate::modules::content::controller::list_sections,
        crate::modules::content::controller::get_questions,
        crate::modules::content::controller::get_question,
        crate::modules::content::controller::get_videos,
        crate::modules::content::controller::get_files,
        crate::modules::content::controller::get_exam,
        crate::modules::content::controller::get_free_questions,
        crate::modules::content::controller::get_free_videos,
        crate::modules::students::controller::create_student,
        crate::modules::students::controller::get_students,
        crate::modules::students::controller::get_student,
        crate::modules::students::controller::get_student_access,
        crate::modules::students::controller::set_student_blocked,
        crate::modules::codes_groups::controller::generate_codes,
        crate::modules::codes_groups::controller::get_codes_groups,
        crate::modules::codes_groups::controller::get_codes_group,
        crate::modules::codes_groups::controller::get_codes,
        crate::modules::codes_groups::controller::delete_codes_group,
        crate::modules::catalog::controller::create_material,
        crate::modules::catalog::controller::get_materials,
        crate::modules::catalog::controller::get_material,
        crate::modules::catalog::controller::update_material,
        crate::modules::catalog::controller::delete_material,
        crate::modules::catalog::controller::create_section,
        crate::modules::catalog::controller::get_sections,
        crate::modules::catalog::controller::update_section,
        crate::modules::catalog::controller::delete_section,
        crate::modules::catalog::controller::create_video,
        crate::modules::catalog::controller::get_videos,
        crate::modules::catalog::controller::reorder_videos,
        crate::modules::catalog::controller::set_video_free,
        crate::modules::catalog::controller::update_video,
        crate::modules::catalog::controller::delete_video,
        crate::modules::catalog::controller::create_question_group,
        crate::modules::catalog::controller::get_question_groups,
        crate::modules::catalog::controller::update_question_group,
        crate::modules::catalog::controller::delete_question_group,
        crate::modules::catalog::controller::update_question,
        crate::modules::catalog::controller::delete_question,
        crate::modules::catalog::controller::create_file,
        crate::modules::catalog::controller::get_files,
        crate::modules::catalog::controller::update_file,
        crate::modules::catalog::controller::delete_file,
        crate::modules::free_questions::controller::rebuild_free_pool,
    ),
    components(
        schemas(
            ErrorResponse,
            PaginationMeta,
            PaginationParams,
            ContentType,
            EffectiveAccess,
            MaterialAccess,
            SectionAccess,
            Material,
            Section,
            Image,
            Choice,
            Question,
            QuestionGroup,
            FreeQuestionGroup,
            VideoSource,
            SeekPoint,
            Video,
            FileKind,
            MaterialFile,
            CreateMaterialDto,
            UpdateMaterialDto,
            UpdateSectionDto,
            UpdateVideoDto,
            UpdateQuestionGroupDto,
            UpdateFileDto,
            CreateSectionDto,
            CreateVideoDto,
            ReorderVideosDto,
            SetVideoFreeDto,
            CreateQuestionGroupDto,
            CreateFileDto,
            CatalogFilterParams,
            PaginatedVideosResponse,
            PaginatedQuestionGroupsResponse,
            AccessFlags,
            Code,
            CodesGroup,
            CodesGroupSummary,
            GenerationMode,
            GrantSurface,
            GenerateCodesDto,
            GenerateCodesResponse,
            PaginatedCodesGroupsResponse,
            PaginatedCodesResponse,
            QuestionGroupView,
            QuestionLookupParams,
            SectionListParams,
            QuestionsResponse,
            VideosResponse,
            FileView,
            FilesResponse,
            ExamResponse,
            SampleMeta,
            FreeQuestionsResponse,
            FreeVideosResponse,
            AccessibleMaterialsCount,
            AccessibleMaterialsResponse,
            RedeemCodeDto,
            Redemption,
            RedemptionResult,
            RedemptionHistoryItem,
            RedemptionHistoryResponse,
            RebuildFreePoolDto,
            RebuildFreePoolResponse,
            SectionRebuildOutcome,
            Student,
            CreateStudentDto,
            SetStudentBlockedDto,
            PaginatedStudentsResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Access", description = "Effective access of the calling student"),
        (name = "Redemptions", description = "Access code redemption"),
        (name = "Content", description = "Questions, videos, files and exams, full or previewed"),
        (name = "Students", description = "Student management endpoints"),
        (name = "Codes Groups", description = "Access code provisioning"),
        (name = "Catalog", description = "Materials, sections and their content"),
        (name = "Free Questions", description = "Curated free question pool")
    ),
    info(
        title = "Edugate API",
        version = "0.1.0",
        description = "Content access backend: redeemable access codes, entitlement resolution and free previews, built with Rust, Axum, and PostgreSQL.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
