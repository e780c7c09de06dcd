use anyhow::Context;
use edugate_core::{AppError, PaginationParams};
use edugate_entitlements::fallback::{flatten_questions, sample_exam, select_free, select_free_videos};
use edugate_entitlements::{ContentType, EffectiveAccess, FallbackSource, Sampler};
use edugate_models::catalog::{FreeQuestionGroup, MaterialFile, QuestionGroup};
use edugate_models::{MaterialId, QuestionGroupId, SectionId};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::metrics::track_fallback_served;
use crate::modules::catalog::service::CatalogService;
use crate::modules::content::model::{
    ExamResponse, FileKind, FileView, FilesResponse, FreeQuestionsResponse, FreeVideosResponse,
    QuestionGroupView, QuestionsResponse, SampleMeta, Video, VideosResponse,
};

/// A free preview and how many items it was drawn from.
#[derive(Debug)]
pub struct Preview<T> {
    pub source: FallbackSource,
    pub items: Vec<T>,
    pub total_available: i64,
}

pub struct ContentService;

impl ContentService {
    /// Question groups for a scope: everything when granted, a preview
    /// otherwise.
    #[instrument(skip(db, access, sampler))]
    pub async fn get_questions(
        db: &PgPool,
        access: &EffectiveAccess,
        material_id: MaterialId,
        section_id: Option<SectionId>,
        cap: usize,
        sampler: &dyn Sampler,
    ) -> Result<QuestionsResponse, AppError> {
        CatalogService::ensure_scope_exists(db, material_id, section_id).await?;

        if access.has_access(ContentType::Questions, material_id, section_id) {
            let groups = sqlx::query_as::<_, QuestionGroup>(
                r#"SELECT * FROM question_groups
                   WHERE material_id = $1 AND ($2::uuid IS NULL OR section_id = $2)
                   ORDER BY created_at, id"#,
            )
            .bind(material_id)
            .bind(section_id)
            .fetch_all(db)
            .await
            .context("Failed to fetch question groups")
            .map_err(AppError::database)?;

            return Ok(QuestionsResponse {
                full_access: true,
                data: groups.into_iter().map(QuestionGroupView::from).collect(),
            });
        }

        let preview = Self::preview_questions(db, material_id, section_id, cap, sampler).await?;
        track_fallback_served(ContentType::Questions.as_str(), preview.source.as_str());

        Ok(QuestionsResponse {
            full_access: false,
            data: preview.items,
        })
    }

    /// Curated free groups for the scope in stored order, or a uniform
    /// sample of the real groups when nothing is curated.
    #[instrument(skip(db, sampler))]
    pub async fn preview_questions(
        db: &PgPool,
        material_id: MaterialId,
        section_id: Option<SectionId>,
        cap: usize,
        sampler: &dyn Sampler,
    ) -> Result<Preview<QuestionGroupView>, AppError> {
        let curated = sqlx::query_scalar::<_, Uuid>(
            r#"SELECT id FROM free_question_groups
               WHERE material_id = $1 AND ($2::uuid IS NULL OR section_id = $2)
               ORDER BY created_at, id"#,
        )
        .bind(material_id)
        .bind(section_id)
        .fetch_all(db)
        .await
        .context("Failed to fetch free question pool")
        .map_err(AppError::database)?;

        let eligible = if curated.is_empty() {
            sqlx::query_scalar::<_, Uuid>(
                r#"SELECT id FROM question_groups
                   WHERE material_id = $1 AND ($2::uuid IS NULL OR section_id = $2)
                   ORDER BY id"#,
            )
            .bind(material_id)
            .bind(section_id)
            .fetch_all(db)
            .await
            .context("Failed to fetch question group ids")
            .map_err(AppError::database)?
        } else {
            Vec::new()
        };

        let total_available = curated.len().max(eligible.len()) as i64;
        let (source, ids) = select_free(curated, &eligible, cap, sampler);

        let items = match source {
            FallbackSource::CuratedPool => sqlx::query_as::<_, FreeQuestionGroup>(
                "SELECT * FROM free_question_groups WHERE id = ANY($1) ORDER BY created_at, id",
            )
            .bind(&ids)
            .fetch_all(db)
            .await
            .context("Failed to fetch free question groups")
            .map_err(AppError::database)?
            .into_iter()
            .map(QuestionGroupView::from)
            .collect(),
            _ => {
                let mut groups = sqlx::query_as::<_, QuestionGroup>(
                    "SELECT * FROM question_groups WHERE id = ANY($1)",
                )
                .bind(&ids)
                .fetch_all(db)
                .await
                .context("Failed to fetch sampled question groups")
                .map_err(AppError::database)?;
                groups.sort_by_key(|group| ids.iter().position(|id| *id == group.id.into_inner()));
                groups.into_iter().map(QuestionGroupView::from).collect()
            }
        };

        Ok(Preview {
            source,
            items,
            total_available,
        })
    }

    /// A single question of a group, for students whose question grants
    /// cover the group's section.
    #[instrument(skip(db, access))]
    pub async fn get_question(
        db: &PgPool,
        access: &EffectiveAccess,
        group_id: QuestionGroupId,
        index: usize,
    ) -> Result<QuestionGroupView, AppError> {
        let group = sqlx::query_as::<_, QuestionGroup>("SELECT * FROM question_groups WHERE id = $1")
            .bind(group_id)
            .fetch_optional(db)
            .await
            .context("Failed to fetch question group")
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Question group not found")))?;

        if !access.has_access(ContentType::Questions, group.material_id, Some(group.section_id)) {
            return Err(AppError::forbidden(
                "You do not have access to this question group".to_string(),
            ));
        }

        let mut view = QuestionGroupView::from(group);
        if index >= view.questions.len() {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Question index is out of range"
            )));
        }
        view.questions = vec![view.questions.swap_remove(index)];

        Ok(view)
    }

    /// Videos for a scope: the full ordered page when granted, free videos
    /// otherwise.
    #[instrument(skip(db, access))]
    pub async fn get_videos(
        db: &PgPool,
        access: &EffectiveAccess,
        material_id: MaterialId,
        section_id: Option<SectionId>,
        pagination: PaginationParams,
        cap: usize,
    ) -> Result<VideosResponse, AppError> {
        CatalogService::ensure_scope_exists(db, material_id, section_id).await?;

        if access.has_access(ContentType::Videos, material_id, section_id) {
            let total = sqlx::query_scalar::<_, i64>(
                r#"SELECT COUNT(*) FROM videos
                   WHERE material_id = $1 AND ($2::uuid IS NULL OR section_id = $2)"#,
            )
            .bind(material_id)
            .bind(section_id)
            .fetch_one(db)
            .await
            .context("Failed to count videos")
            .map_err(AppError::database)?;

            let videos = sqlx::query_as::<_, Video>(
                r#"SELECT * FROM videos
                   WHERE material_id = $1 AND ($2::uuid IS NULL OR section_id = $2)
                   ORDER BY order_index ASC, created_at DESC, id
                   LIMIT $3 OFFSET $4"#,
            )
            .bind(material_id)
            .bind(section_id)
            .bind(pagination.limit())
            .bind(pagination.offset())
            .fetch_all(db)
            .await
            .context("Failed to fetch videos")
            .map_err(AppError::database)?;

            return Ok(VideosResponse {
                full_access: true,
                data: videos,
                meta: Some(pagination.meta(total)),
            });
        }

        let preview = Self::preview_videos(db, material_id, section_id, cap).await?;
        track_fallback_served(ContentType::Videos.as_str(), preview.source.as_str());

        Ok(VideosResponse {
            full_access: false,
            data: preview.items,
            meta: None,
        })
    }

    #[instrument(skip(db))]
    pub async fn preview_videos(
        db: &PgPool,
        material_id: MaterialId,
        section_id: Option<SectionId>,
        cap: usize,
    ) -> Result<Preview<Video>, AppError> {
        let free = sqlx::query_as::<_, Video>(
            r#"SELECT * FROM videos
               WHERE material_id = $1
                 AND ($2::uuid IS NULL OR section_id = $2)
                 AND is_free = TRUE"#,
        )
        .bind(material_id)
        .bind(section_id)
        .fetch_all(db)
        .await
        .context("Failed to fetch free videos")
        .map_err(AppError::database)?;

        let total_available = free.len() as i64;

        Ok(Preview {
            source: FallbackSource::FreeVideos,
            items: select_free_videos(free, cap),
            total_available,
        })
    }

    /// Files of a material. Without a file grant only the first file keeps
    /// its URL; the rest expose just their names.
    #[instrument(skip(db, access))]
    pub async fn get_files(
        db: &PgPool,
        access: &EffectiveAccess,
        material_id: MaterialId,
        kind: Option<FileKind>,
    ) -> Result<FilesResponse, AppError> {
        CatalogService::ensure_material_exists(db, material_id).await?;

        let files = sqlx::query_as::<_, MaterialFile>(
            r#"SELECT * FROM files
               WHERE material_id = $1 AND ($2::file_kind IS NULL OR kind = $2)
               ORDER BY num"#,
        )
        .bind(material_id)
        .bind(kind)
        .fetch_all(db)
        .await
        .context("Failed to fetch files")
        .map_err(AppError::database)?;

        let full_access = access.has_access(ContentType::Files, material_id, None);

        let data = if full_access {
            files.into_iter().map(FileView::unlocked).collect()
        } else {
            track_fallback_served(ContentType::Files.as_str(), "first_file");
            files
                .into_iter()
                .enumerate()
                .map(|(i, file)| {
                    if i == 0 {
                        FileView::unlocked(file)
                    } else {
                        FileView::locked(file)
                    }
                })
                .collect()
        };

        Ok(FilesResponse { full_access, data })
    }

    /// Exam draw for a material.
    ///
    /// With a material-level question grant: up to `exam_cap` questions drawn
    /// uniformly from every question of the material. Otherwise the questions
    /// of the free preview. A material without questions has no exam.
    #[instrument(skip(db, access, sampler))]
    pub async fn get_exam(
        db: &PgPool,
        access: &EffectiveAccess,
        material_id: MaterialId,
        exam_cap: usize,
        preview_cap: usize,
        sampler: &dyn Sampler,
    ) -> Result<ExamResponse, AppError> {
        CatalogService::ensure_material_exists(db, material_id).await?;

        let full_access = access.has_access(ContentType::Questions, material_id, None);

        let questions = if full_access {
            let groups = sqlx::query_as::<_, QuestionGroup>(
                "SELECT * FROM question_groups WHERE material_id = $1 ORDER BY created_at, id",
            )
            .bind(material_id)
            .fetch_all(db)
            .await
            .context("Failed to fetch question groups")
            .map_err(AppError::database)?;

            let all = flatten_questions(groups.into_iter().map(|group| group.questions.0));
            sample_exam(&all, exam_cap, sampler)
        } else {
            let preview =
                Self::preview_questions(db, material_id, None, preview_cap, sampler).await?;
            track_fallback_served("exam", preview.source.as_str());
            flatten_questions(preview.items.into_iter().map(|group| group.questions))
        };

        if questions.is_empty() {
            return Err(AppError::not_found(anyhow::anyhow!(
                "No questions found for this material"
            )));
        }

        Ok(ExamResponse {
            full_access,
            material_id,
            count: questions.len(),
            questions,
        })
    }

    #[instrument(skip(db, sampler))]
    pub async fn get_free_questions(
        db: &PgPool,
        material_id: MaterialId,
        section_id: Option<SectionId>,
        cap: usize,
        sampler: &dyn Sampler,
    ) -> Result<FreeQuestionsResponse, AppError> {
        CatalogService::ensure_scope_exists(db, material_id, section_id).await?;

        let preview = Self::preview_questions(db, material_id, section_id, cap, sampler).await?;

        Ok(FreeQuestionsResponse {
            meta: SampleMeta {
                count: preview.items.len(),
                cap,
                total_available: preview.total_available,
            },
            data: preview.items,
        })
    }

    #[instrument(skip(db))]
    pub async fn get_free_videos(
        db: &PgPool,
        material_id: MaterialId,
        section_id: Option<SectionId>,
        cap: usize,
    ) -> Result<FreeVideosResponse, AppError> {
        CatalogService::ensure_scope_exists(db, material_id, section_id).await?;

        let preview = Self::preview_videos(db, material_id, section_id, cap).await?;

        Ok(FreeVideosResponse {
            meta: SampleMeta {
                count: preview.items.len(),
                cap,
                total_available: preview.total_available,
            },
            data: preview.items,
        })
    }
}
