//! Student-facing content read models.
//!
//! Every paid read reports `full_access`: `true` when the student's grants
//! cover the scope, `false` when the body is a bounded free preview.

use edugate_core::serde::{deserialize_optional_i64, deserialize_optional_id};
use edugate_core::{PaginationMeta, PaginationParams};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::catalog::{
    FileKind, FreeQuestionGroup, Image, Material, MaterialFile, Question, QuestionGroup, Video,
};
use crate::ids::{FileId, MaterialId, QuestionGroupId, SectionId};

/// Content scope: a whole material or one of its sections.
#[derive(Debug, Clone, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ContentScopeParams {
    pub material_id: MaterialId,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub section_id: Option<SectionId>,
}

#[derive(Debug, Clone, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct VideoListParams {
    pub material_id: MaterialId,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub section_id: Option<SectionId>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Clone, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FreeContentParams {
    pub material_id: MaterialId,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub section_id: Option<SectionId>,
    /// Maximum items returned (1-100, default from configuration)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FileListParams {
    pub kind: Option<FileKind>,
}

/// Sections of one material.
#[derive(Debug, Clone, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SectionListParams {
    pub material_id: MaterialId,
}

/// One question of a question group, addressed by position.
#[derive(Debug, Clone, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct QuestionLookupParams {
    pub question_group_id: QuestionGroupId,
    /// Zero-based position inside the group
    pub question_index: usize,
}

/// Question group as served to students, from either the real catalog or
/// the curated free pool.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct QuestionGroupView {
    pub id: Uuid,
    pub material_id: MaterialId,
    pub section_id: SectionId,
    pub paragraph: Option<String>,
    pub images: Vec<Image>,
    pub questions: Vec<Question>,
}

impl From<QuestionGroup> for QuestionGroupView {
    fn from(group: QuestionGroup) -> Self {
        Self {
            id: group.id.into_inner(),
            material_id: group.material_id,
            section_id: group.section_id,
            paragraph: group.paragraph,
            images: group.images.0,
            questions: group.questions.0,
        }
    }
}

impl From<FreeQuestionGroup> for QuestionGroupView {
    fn from(group: FreeQuestionGroup) -> Self {
        Self {
            id: group.id.into_inner(),
            material_id: group.material_id,
            section_id: group.section_id,
            paragraph: group.paragraph,
            images: group.images.0,
            questions: group.questions.0,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct QuestionsResponse {
    pub full_access: bool,
    pub data: Vec<QuestionGroupView>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VideosResponse {
    pub full_access: bool,
    pub data: Vec<Video>,
    /// Present for full listings only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<PaginationMeta>,
}

/// A material file; `access_url` is withheld on locked previews.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FileView {
    pub id: FileId,
    pub num: i32,
    pub kind: FileKind,
    pub filename: String,
    pub access_url: Option<String>,
}

impl FileView {
    pub fn unlocked(file: MaterialFile) -> Self {
        Self {
            id: file.id,
            num: file.num,
            kind: file.kind,
            filename: file.filename,
            access_url: Some(file.access_url),
        }
    }

    pub fn locked(file: MaterialFile) -> Self {
        Self {
            access_url: None,
            ..Self::unlocked(file)
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FilesResponse {
    pub full_access: bool,
    pub data: Vec<FileView>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ExamResponse {
    pub full_access: bool,
    pub material_id: MaterialId,
    pub count: usize,
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct SampleMeta {
    pub count: usize,
    pub cap: usize,
    /// Eligible items in scope before capping
    pub total_available: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FreeQuestionsResponse {
    pub data: Vec<QuestionGroupView>,
    pub meta: SampleMeta,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FreeVideosResponse {
    pub data: Vec<Video>,
    pub meta: SampleMeta,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AccessibleMaterialsCount {
    pub questions: usize,
    pub files: usize,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AccessibleMaterialsResponse {
    pub materials_with_questions: Vec<Material>,
    pub materials_with_files: Vec<Material>,
    pub count: AccessibleMaterialsCount,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_locked_file_hides_url() {
        let file = MaterialFile {
            id: FileId::new(),
            material_id: MaterialId::new(),
            num: 2,
            kind: FileKind::Notes,
            filename: "chapter-2.pdf".to_string(),
            access_url: "https://cdn.test/chapter-2.pdf".to_string(),
            created_at: Utc::now(),
        };

        let locked = FileView::locked(file.clone());
        assert_eq!(locked.filename, "chapter-2.pdf");
        assert!(locked.access_url.is_none());

        let unlocked = FileView::unlocked(file);
        assert_eq!(
            unlocked.access_url.as_deref(),
            Some("https://cdn.test/chapter-2.pdf")
        );
    }

    #[test]
    fn test_scope_params_optional_section() {
        let id = Uuid::new_v4();
        let json = format!(r#"{{"material_id": "{}", "section_id": ""}}"#, id);
        let params: ContentScopeParams = serde_json::from_str(&json).unwrap();
        assert_eq!(params.material_id.into_inner(), id);
        assert!(params.section_id.is_none());
    }

    #[test]
    fn test_scope_params_require_material() {
        assert!(serde_json::from_str::<ContentScopeParams>("{}").is_err());
    }
}
