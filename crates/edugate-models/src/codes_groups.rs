//! Codes group models and DTOs.
//!
//! A codes group is a batch of single-use redemption codes sharing one grant.
//! The grant surface keeps every historical field: material-wide grants, the
//! legacy `sections` list and the per-type section lists with their access
//! flags.

use chrono::{DateTime, Utc};
use edugate_core::PaginationMeta;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::{CodeId, CodesGroupId, MaterialId, SectionId};

/// Smallest and largest batch a single provisioning call may create.
pub const MIN_CODE_COUNT: i64 = 1;
pub const MAX_CODE_COUNT: i64 = 10_000;

/// Codes echoed back to the admin after provisioning.
pub const CODE_SAMPLE_SIZE: usize = 50;

/// Content types a codes group's section grants may be gated on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AccessFlags {
    pub videos: bool,
    pub questions: bool,
    pub files: bool,
}

/// Stored codes group row, without its codes.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CodesGroup {
    pub id: CodesGroupId,
    pub name: String,
    pub expiration: DateTime<Utc>,
    pub materials_with_questions: Vec<MaterialId>,
    pub materials_with_files: Vec<MaterialId>,
    pub materials_with_lectures: Vec<MaterialId>,
    /// Legacy grant honored for both videos and questions
    pub sections: Vec<SectionId>,
    pub sections_for_videos: Vec<SectionId>,
    pub sections_for_questions: Vec<SectionId>,
    pub access_videos: bool,
    pub access_questions: bool,
    pub access_files: bool,
    pub created_at: DateTime<Utc>,
}

impl CodesGroup {
    pub fn access(&self) -> AccessFlags {
        AccessFlags {
            videos: self.access_videos,
            questions: self.access_questions,
            files: self.access_files,
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expiration <= now
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Code {
    pub id: CodeId,
    pub codes_group_id: CodesGroupId,
    pub value: String,
    pub is_used: bool,
    pub used_at: Option<DateTime<Utc>>,
}

/// Codes group listing row with usage counts.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CodesGroupSummary {
    pub id: CodesGroupId,
    pub name: String,
    pub expiration: DateTime<Utc>,
    pub total_codes: i64,
    pub used_codes: i64,
    pub access_videos: bool,
    pub access_questions: bool,
    pub access_files: bool,
    pub created_at: DateTime<Utc>,
}

/// Single-target provisioning modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum GenerationMode {
    SectionVideos,
    SectionQuestions,
    MaterialFiles,
    MaterialAll,
}

/// Request body for provisioning a batch of codes.
///
/// Either the composite arrays or a single `mode` with its target id. When any
/// composite array is non-empty, `mode` is ignored.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct GenerateCodesDto {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(range(min = 1, max = 10000))]
    pub code_count: i64,
    pub expiration: DateTime<Utc>,
    pub mode: Option<GenerationMode>,
    pub material_id: Option<MaterialId>,
    pub section_id: Option<SectionId>,
    #[serde(default)]
    pub sections_for_videos: Vec<SectionId>,
    #[serde(default)]
    pub sections_for_questions: Vec<SectionId>,
    #[serde(default)]
    pub materials_for_files: Vec<MaterialId>,
    #[serde(default)]
    pub materials_for_all: Vec<MaterialId>,
}

impl GenerateCodesDto {
    pub fn is_composite(&self) -> bool {
        !self.sections_for_videos.is_empty()
            || !self.sections_for_questions.is_empty()
            || !self.materials_for_files.is_empty()
            || !self.materials_for_all.is_empty()
    }

    pub fn expires_after(&self, now: DateTime<Utc>) -> bool {
        self.expiration > now
    }
}

/// Grant surface a provisioning request resolves to, before it is stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct GrantSurface {
    pub materials_with_questions: Vec<MaterialId>,
    pub materials_with_files: Vec<MaterialId>,
    pub materials_with_lectures: Vec<MaterialId>,
    pub sections: Vec<SectionId>,
    pub sections_for_videos: Vec<SectionId>,
    pub sections_for_questions: Vec<SectionId>,
    pub access: AccessFlags,
}

impl From<&CodesGroup> for GrantSurface {
    fn from(group: &CodesGroup) -> Self {
        Self {
            materials_with_questions: group.materials_with_questions.clone(),
            materials_with_files: group.materials_with_files.clone(),
            materials_with_lectures: group.materials_with_lectures.clone(),
            sections: group.sections.clone(),
            sections_for_videos: group.sections_for_videos.clone(),
            sections_for_questions: group.sections_for_questions.clone(),
            access: group.access(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GenerateCodesResponse {
    pub codes_group_id: CodesGroupId,
    pub name: String,
    pub expiration: DateTime<Utc>,
    pub code_count: i64,
    /// First codes of the batch, at most 50
    pub sample: Vec<String>,
    pub grant: GrantSurface,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedCodesGroupsResponse {
    pub data: Vec<CodesGroupSummary>,
    pub meta: PaginationMeta,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedCodesResponse {
    pub data: Vec<Code>,
    pub meta: PaginationMeta,
}
