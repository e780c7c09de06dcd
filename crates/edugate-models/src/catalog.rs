//! Content catalog models and DTOs.
//!
//! Materials contain sections; videos, question groups and files hang off a
//! material (and, for videos and question groups, a section). The entitlement
//! engine only reads these.

use chrono::{DateTime, Utc};
use edugate_core::serde::deserialize_optional_id;
use edugate_core::{PaginationMeta, PaginationParams};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::ids::{FileId, FreeQuestionGroupId, MaterialId, QuestionGroupId, SectionId, VideoId};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Material {
    pub id: MaterialId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateMaterialDto {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

/// Partial material update; absent fields keep their value.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateMaterialDto {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Section {
    pub id: SectionId,
    pub material_id: MaterialId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateSectionDto {
    pub material_id: MaterialId,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
}

/// Sections stay in their material; only the name changes.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateSectionDto {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
}

/// Image attached to a question group paragraph or an explanation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Image {
    pub name: String,
    pub access_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Choice {
    pub text: String,
    #[serde(default)]
    pub is_correct: bool,
}

/// A single question inside a question group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema, Validate)]
pub struct Question {
    #[serde(default)]
    pub is_english: bool,
    #[validate(length(min = 1))]
    pub text: String,
    #[serde(default)]
    pub is_multiple_choice: bool,
    #[serde(default)]
    pub choices: Vec<Choice>,
    pub information: Option<String>,
    #[serde(default)]
    pub info_images: Vec<Image>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct QuestionGroup {
    pub id: QuestionGroupId,
    pub material_id: MaterialId,
    pub section_id: SectionId,
    pub paragraph: Option<String>,
    #[schema(value_type = Vec<Image>)]
    pub images: Json<Vec<Image>>,
    #[schema(value_type = Vec<Question>)]
    pub questions: Json<Vec<Question>>,
    pub created_at: DateTime<Utc>,
}

/// Curated preview copy of a [`QuestionGroup`].
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct FreeQuestionGroup {
    pub id: FreeQuestionGroupId,
    pub material_id: MaterialId,
    pub section_id: SectionId,
    pub source_group_id: Option<QuestionGroupId>,
    pub paragraph: Option<String>,
    #[schema(value_type = Vec<Image>)]
    pub images: Json<Vec<Image>>,
    #[schema(value_type = Vec<Question>)]
    pub questions: Json<Vec<Question>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateQuestionGroupDto {
    pub material_id: MaterialId,
    pub section_id: SectionId,
    pub paragraph: Option<String>,
    #[serde(default)]
    pub images: Vec<Image>,
    #[validate(length(min = 1, max = 200), nested)]
    pub questions: Vec<Question>,
}

/// Partial question group update. A new section must belong to the group's
/// material. Questions are edited one at a time.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateQuestionGroupDto {
    pub section_id: Option<SectionId>,
    pub paragraph: Option<String>,
    pub images: Option<Vec<Image>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VideoSource {
    pub access_url: Option<String>,
    pub video_id: Option<String>,
    pub library_id: Option<String>,
    pub download_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SeekPoint {
    pub moment: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Video {
    pub id: VideoId,
    pub material_id: MaterialId,
    pub section_id: SectionId,
    pub name: String,
    #[schema(value_type = VideoSource)]
    pub source: Json<VideoSource>,
    #[schema(value_type = Vec<SeekPoint>)]
    pub seek_points: Json<Vec<SeekPoint>>,
    pub is_free: bool,
    pub order_index: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateVideoDto {
    pub material_id: MaterialId,
    pub section_id: SectionId,
    #[validate(length(min = 1, max = 300))]
    pub name: String,
    pub source: VideoSource,
    #[serde(default)]
    pub seek_points: Vec<SeekPoint>,
    /// Defaults to true for the first video of a section, false otherwise
    pub is_free: Option<bool>,
    /// Defaults to the number of videos already in the section plus one
    #[validate(range(min = 1))]
    pub order_index: Option<i32>,
}

/// Partial video update. Order and free flag have their own endpoints.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateVideoDto {
    #[validate(length(min = 1, max = 300))]
    pub name: Option<String>,
    pub source: Option<VideoSource>,
    pub seek_points: Option<Vec<SeekPoint>>,
}

/// New order for every video of a section, first element gets order 1.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ReorderVideosDto {
    pub section_id: SectionId,
    #[validate(length(min = 1))]
    pub video_ids: Vec<VideoId>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetVideoFreeDto {
    pub is_free: bool,
}

/// Paper kind of a downloadable material file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "file_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    GoldenPapers,
    Notes,
    MinisterialExam,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct MaterialFile {
    pub id: FileId,
    pub material_id: MaterialId,
    pub num: i32,
    pub kind: FileKind,
    pub filename: String,
    pub access_url: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateFileDto {
    pub material_id: MaterialId,
    #[validate(range(min = 1))]
    pub num: i32,
    pub kind: FileKind,
    #[validate(length(min = 1, max = 300))]
    pub filename: String,
    #[validate(length(min = 1, max = 2000))]
    pub access_url: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateFileDto {
    #[validate(range(min = 1))]
    pub num: Option<i32>,
    pub kind: Option<FileKind>,
    #[validate(length(min = 1, max = 300))]
    pub filename: Option<String>,
    #[validate(length(min = 1, max = 2000))]
    pub access_url: Option<String>,
}

/// Filters shared by the admin catalog listings.
#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CatalogFilterParams {
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub material_id: Option<MaterialId>,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub section_id: Option<SectionId>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedVideosResponse {
    pub data: Vec<Video>,
    pub meta: PaginationMeta,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedQuestionGroupsResponse {
    pub data: Vec<QuestionGroup>,
    pub meta: PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(text: &str) -> Question {
        Question {
            is_english: false,
            text: text.to_string(),
            is_multiple_choice: true,
            choices: vec![
                Choice {
                    text: "a".to_string(),
                    is_correct: true,
                },
                Choice {
                    text: "b".to_string(),
                    is_correct: false,
                },
            ],
            information: None,
            info_images: vec![],
        }
    }

    #[test]
    fn test_question_defaults_from_json() {
        let q: Question = serde_json::from_str(r#"{"text": "2 + 2?"}"#).unwrap();
        assert!(!q.is_english);
        assert!(!q.is_multiple_choice);
        assert!(q.choices.is_empty());
    }

    #[test]
    fn test_create_question_group_requires_questions() {
        let dto = CreateQuestionGroupDto {
            material_id: MaterialId::new(),
            section_id: SectionId::new(),
            paragraph: None,
            images: vec![],
            questions: vec![],
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_create_question_group_validates_nested_questions() {
        let dto = CreateQuestionGroupDto {
            material_id: MaterialId::new(),
            section_id: SectionId::new(),
            paragraph: Some("Read the passage".to_string()),
            images: vec![],
            questions: vec![question("ok"), question("")],
        };
        assert!(dto.validate().is_err());

        let dto = CreateQuestionGroupDto {
            questions: vec![question("ok")],
            ..dto
        };
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_file_kind_serde() {
        let kind: FileKind = serde_json::from_str(r#""ministerial_exam""#).unwrap();
        assert_eq!(kind, FileKind::MinisterialExam);
        assert_eq!(
            serde_json::to_string(&FileKind::GoldenPapers).unwrap(),
            r#""golden_papers""#
        );
    }

    #[test]
    fn test_catalog_filter_params_treat_empty_as_none() {
        let params: CatalogFilterParams =
            serde_json::from_str(r#"{"material_id": "", "section_id": ""}"#).unwrap();
        assert!(params.material_id.is_none());
        assert!(params.section_id.is_none());
    }

    #[test]
    fn test_update_dtos_validate_present_fields_only() {
        let empty: UpdateMaterialDto = serde_json::from_str("{}").unwrap();
        assert!(empty.validate().is_ok());

        let blank: UpdateMaterialDto = serde_json::from_str(r#"{"name": ""}"#).unwrap();
        assert!(blank.validate().is_err());

        let file: UpdateFileDto = serde_json::from_str(r#"{"num": 0}"#).unwrap();
        assert!(file.validate().is_err());
    }
}
