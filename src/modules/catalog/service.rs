use std::collections::HashSet;

use anyhow::Context;
use edugate_core::AppError;
use edugate_models::{FileId, MaterialId, QuestionGroupId, SectionId, VideoId};
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{info, instrument};

use crate::modules::catalog::model::{
    CatalogFilterParams, CreateFileDto, CreateMaterialDto, CreateQuestionGroupDto,
    CreateSectionDto, CreateVideoDto, Material, MaterialFile, MaterialFilterParams,
    PaginatedQuestionGroupsResponse, PaginatedVideosResponse, Question, QuestionGroup,
    ReorderVideosDto, Section, UpdateFileDto, UpdateMaterialDto, UpdateQuestionGroupDto,
    UpdateSectionDto, UpdateVideoDto, Video,
};

pub struct CatalogService;

impl CatalogService {
    // Materials

    #[instrument(skip(db))]
    pub async fn create_material(
        db: &PgPool,
        dto: CreateMaterialDto,
    ) -> Result<Material, AppError> {
        let material = sqlx::query_as::<_, Material>(
            r#"INSERT INTO materials (name, description)
               VALUES ($1, $2)
               RETURNING id, name, description, created_at"#,
        )
        .bind(dto.name.trim())
        .bind(&dto.description)
        .fetch_one(db)
        .await
        .context("Failed to create material")
        .map_err(AppError::database)?;

        Ok(material)
    }

    #[instrument(skip(db))]
    pub async fn get_materials(db: &PgPool) -> Result<Vec<Material>, AppError> {
        let materials = sqlx::query_as::<_, Material>(
            "SELECT id, name, description, created_at FROM materials ORDER BY name, id",
        )
        .fetch_all(db)
        .await
        .context("Failed to fetch materials")
        .map_err(AppError::database)?;

        Ok(materials)
    }

    #[instrument(skip(db))]
    pub async fn get_material(db: &PgPool, id: MaterialId) -> Result<Material, AppError> {
        sqlx::query_as::<_, Material>(
            "SELECT id, name, description, created_at FROM materials WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch material")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Material not found")))
    }

    #[instrument(skip(db, dto))]
    pub async fn update_material(
        db: &PgPool,
        id: MaterialId,
        dto: UpdateMaterialDto,
    ) -> Result<Material, AppError> {
        sqlx::query_as::<_, Material>(
            r#"UPDATE materials
               SET name = COALESCE($2, name), description = COALESCE($3, description)
               WHERE id = $1
               RETURNING id, name, description, created_at"#,
        )
        .bind(id)
        .bind(dto.name.as_deref().map(str::trim))
        .bind(&dto.description)
        .fetch_optional(db)
        .await
        .context("Failed to update material")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Material not found")))
    }

    #[instrument(skip(db))]
    pub async fn ensure_material_exists(db: &PgPool, id: MaterialId) -> Result<(), AppError> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM materials WHERE id = $1)")
                .bind(id)
                .fetch_one(db)
                .await
                .context("Failed to check material")
                .map_err(AppError::database)?;

        if !exists {
            return Err(AppError::not_found(anyhow::anyhow!("Material not found")));
        }

        Ok(())
    }

    /// Checks that the material exists and, when a section is given, that it
    /// is one of the material's sections. A section of another material is
    /// reported as missing.
    #[instrument(skip(db))]
    pub(crate) async fn ensure_scope_exists(
        db: &PgPool,
        material_id: MaterialId,
        section_id: Option<SectionId>,
    ) -> Result<(), AppError> {
        Self::ensure_material_exists(db, material_id).await?;

        let Some(section_id) = section_id else {
            return Ok(());
        };

        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM sections WHERE id = $1 AND material_id = $2)",
        )
        .bind(section_id)
        .bind(material_id)
        .fetch_one(db)
        .await
        .context("Failed to check section")
        .map_err(AppError::database)?;

        if !exists {
            return Err(AppError::not_found(anyhow::anyhow!("Section not found")));
        }

        Ok(())
    }

    /// Deletes a material with its sections and content.
    #[instrument(skip(db))]
    pub async fn delete_material(db: &PgPool, id: MaterialId) -> Result<(), AppError> {
        Self::delete_by_id(db, "materials", id.into_inner(), "Material not found").await?;
        info!(material_id = %id, "Material deleted");
        Ok(())
    }

    // Sections

    #[instrument(skip(db))]
    pub async fn create_section(db: &PgPool, dto: CreateSectionDto) -> Result<Section, AppError> {
        Self::ensure_material_exists(db, dto.material_id).await?;

        let section = sqlx::query_as::<_, Section>(
            r#"INSERT INTO sections (material_id, name)
               VALUES ($1, $2)
               RETURNING id, material_id, name, created_at"#,
        )
        .bind(dto.material_id)
        .bind(dto.name.trim())
        .fetch_one(db)
        .await
        .map_err(|e| AppError::from_foreign_key_violation(e, "Material does not exist"))?;

        Ok(section)
    }

    #[instrument(skip(db))]
    pub async fn get_sections(
        db: &PgPool,
        filters: MaterialFilterParams,
    ) -> Result<Vec<Section>, AppError> {
        let sections = sqlx::query_as::<_, Section>(
            r#"SELECT id, material_id, name, created_at
               FROM sections
               WHERE ($1::uuid IS NULL OR material_id = $1)
               ORDER BY created_at, id"#,
        )
        .bind(filters.material_id)
        .fetch_all(db)
        .await
        .context("Failed to fetch sections")
        .map_err(AppError::database)?;

        Ok(sections)
    }

    #[instrument(skip(db, dto))]
    pub async fn update_section(
        db: &PgPool,
        id: SectionId,
        dto: UpdateSectionDto,
    ) -> Result<Section, AppError> {
        sqlx::query_as::<_, Section>(
            r#"UPDATE sections SET name = $2
               WHERE id = $1
               RETURNING id, material_id, name, created_at"#,
        )
        .bind(id)
        .bind(dto.name.trim())
        .fetch_optional(db)
        .await
        .context("Failed to update section")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Section not found")))
    }

    #[instrument(skip(db))]
    pub async fn delete_section(db: &PgPool, id: SectionId) -> Result<(), AppError> {
        Self::delete_by_id(db, "sections", id.into_inner(), "Section not found").await
    }

    /// Checks that `section_id` exists and belongs to `material_id`.
    async fn ensure_section_in_material(
        db: &PgPool,
        material_id: MaterialId,
        section_id: SectionId,
    ) -> Result<(), AppError> {
        let owner =
            sqlx::query_scalar::<_, MaterialId>("SELECT material_id FROM sections WHERE id = $1")
                .bind(section_id)
                .fetch_optional(db)
                .await
                .context("Failed to fetch section")
                .map_err(AppError::database)?
                .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Section not found")))?;

        if owner != material_id {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Section does not belong to material"
            )));
        }

        Ok(())
    }

    // Videos

    /// Adds a video. The first video of a section is always free; the order
    /// defaults to the end of the section.
    #[instrument(skip(db, dto), fields(section_id = %dto.section_id))]
    pub async fn create_video(db: &PgPool, dto: CreateVideoDto) -> Result<Video, AppError> {
        Self::ensure_section_in_material(db, dto.material_id, dto.section_id).await?;

        let mut tx = db
            .begin()
            .await
            .context("Failed to begin transaction")
            .map_err(AppError::database)?;

        let existing =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM videos WHERE section_id = $1")
                .bind(dto.section_id)
                .fetch_one(&mut *tx)
                .await
                .context("Failed to count section videos")
                .map_err(AppError::database)?;

        let is_free = existing == 0 || dto.is_free.unwrap_or(false);
        let order_index = dto.order_index.unwrap_or(existing as i32 + 1);

        let video = sqlx::query_as::<_, Video>(
            r#"INSERT INTO videos (material_id, section_id, name, source, seek_points, is_free, order_index)
               VALUES ($1, $2, $3, $4, $5, $6, $7)
               RETURNING *"#,
        )
        .bind(dto.material_id)
        .bind(dto.section_id)
        .bind(dto.name.trim())
        .bind(Json(&dto.source))
        .bind(Json(&dto.seek_points))
        .bind(is_free)
        .bind(order_index)
        .fetch_one(&mut *tx)
        .await
        .context("Failed to create video")
        .map_err(AppError::database)?;

        tx.commit()
            .await
            .context("Failed to commit video")
            .map_err(AppError::database)?;

        Ok(video)
    }

    #[instrument(skip(db))]
    pub async fn get_videos(
        db: &PgPool,
        filters: CatalogFilterParams,
    ) -> Result<PaginatedVideosResponse, AppError> {
        let total = sqlx::query_scalar::<_, i64>(
            r#"SELECT COUNT(*) FROM videos
               WHERE ($1::uuid IS NULL OR material_id = $1)
                 AND ($2::uuid IS NULL OR section_id = $2)"#,
        )
        .bind(filters.material_id)
        .bind(filters.section_id)
        .fetch_one(db)
        .await
        .context("Failed to count videos")
        .map_err(AppError::database)?;

        let videos = sqlx::query_as::<_, Video>(
            r#"SELECT * FROM videos
               WHERE ($1::uuid IS NULL OR material_id = $1)
                 AND ($2::uuid IS NULL OR section_id = $2)
               ORDER BY order_index ASC, created_at DESC, id
               LIMIT $3 OFFSET $4"#,
        )
        .bind(filters.material_id)
        .bind(filters.section_id)
        .bind(filters.pagination.limit())
        .bind(filters.pagination.offset())
        .fetch_all(db)
        .await
        .context("Failed to fetch videos")
        .map_err(AppError::database)?;

        Ok(PaginatedVideosResponse {
            data: videos,
            meta: filters.pagination.meta(total),
        })
    }

    /// Rewrites a section's video order to `1..=n` following `video_ids`,
    /// which must list every video of the section exactly once.
    #[instrument(skip(db, dto), fields(section_id = %dto.section_id))]
    pub async fn reorder_videos(
        db: &PgPool,
        dto: ReorderVideosDto,
    ) -> Result<Vec<Video>, AppError> {
        let mut tx = db
            .begin()
            .await
            .context("Failed to begin transaction")
            .map_err(AppError::database)?;

        let current: HashSet<VideoId> = Self::section_video_ids(&mut tx, dto.section_id)
            .await?
            .into_iter()
            .collect();
        let requested: HashSet<VideoId> = dto.video_ids.iter().copied().collect();

        if requested.len() != dto.video_ids.len() {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "video_ids contains duplicates"
            )));
        }
        if requested != current {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "video_ids must list every video of the section exactly once"
            )));
        }

        sqlx::query(
            r#"UPDATE videos v
               SET order_index = o.position::int
               FROM UNNEST($1::uuid[]) WITH ORDINALITY AS o(id, position)
               WHERE v.id = o.id"#,
        )
        .bind(&dto.video_ids)
        .execute(&mut *tx)
        .await
        .context("Failed to reorder videos")
        .map_err(AppError::database)?;

        let videos = sqlx::query_as::<_, Video>(
            "SELECT * FROM videos WHERE section_id = $1 ORDER BY order_index, id",
        )
        .bind(dto.section_id)
        .fetch_all(&mut *tx)
        .await
        .context("Failed to fetch reordered videos")
        .map_err(AppError::database)?;

        tx.commit()
            .await
            .context("Failed to commit video order")
            .map_err(AppError::database)?;

        Ok(videos)
    }

    async fn section_video_ids(
        tx: &mut Transaction<'_, Postgres>,
        section_id: SectionId,
    ) -> Result<Vec<VideoId>, AppError> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM sections WHERE id = $1)")
                .bind(section_id)
                .fetch_one(&mut **tx)
                .await
                .context("Failed to check section")
                .map_err(AppError::database)?;
        if !exists {
            return Err(AppError::not_found(anyhow::anyhow!("Section not found")));
        }

        let ids = sqlx::query_scalar::<_, VideoId>(
            "SELECT id FROM videos WHERE section_id = $1 FOR UPDATE",
        )
        .bind(section_id)
        .fetch_all(&mut **tx)
        .await
        .context("Failed to fetch section videos")
        .map_err(AppError::database)?;

        Ok(ids)
    }

    #[instrument(skip(db))]
    pub async fn set_video_free(db: &PgPool, id: VideoId, is_free: bool) -> Result<Video, AppError> {
        sqlx::query_as::<_, Video>("UPDATE videos SET is_free = $2 WHERE id = $1 RETURNING *")
            .bind(id)
            .bind(is_free)
            .fetch_optional(db)
            .await
            .context("Failed to update video")
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Video not found")))
    }

    #[instrument(skip(db, dto))]
    pub async fn update_video(
        db: &PgPool,
        id: VideoId,
        dto: UpdateVideoDto,
    ) -> Result<Video, AppError> {
        sqlx::query_as::<_, Video>(
            r#"UPDATE videos
               SET name = COALESCE($2, name),
                   source = COALESCE($3, source),
                   seek_points = COALESCE($4, seek_points)
               WHERE id = $1
               RETURNING *"#,
        )
        .bind(id)
        .bind(dto.name.as_deref().map(str::trim))
        .bind(dto.source.as_ref().map(Json))
        .bind(dto.seek_points.as_ref().map(Json))
        .fetch_optional(db)
        .await
        .context("Failed to update video")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Video not found")))
    }

    #[instrument(skip(db))]
    pub async fn delete_video(db: &PgPool, id: VideoId) -> Result<(), AppError> {
        Self::delete_by_id(db, "videos", id.into_inner(), "Video not found").await
    }

    // Question groups

    #[instrument(skip(db, dto), fields(section_id = %dto.section_id))]
    pub async fn create_question_group(
        db: &PgPool,
        dto: CreateQuestionGroupDto,
    ) -> Result<QuestionGroup, AppError> {
        Self::ensure_section_in_material(db, dto.material_id, dto.section_id).await?;

        let group = sqlx::query_as::<_, QuestionGroup>(
            r#"INSERT INTO question_groups (material_id, section_id, paragraph, images, questions)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING *"#,
        )
        .bind(dto.material_id)
        .bind(dto.section_id)
        .bind(&dto.paragraph)
        .bind(Json(&dto.images))
        .bind(Json(&dto.questions))
        .fetch_one(db)
        .await
        .context("Failed to create question group")
        .map_err(AppError::database)?;

        Ok(group)
    }

    #[instrument(skip(db))]
    pub async fn get_question_groups(
        db: &PgPool,
        filters: CatalogFilterParams,
    ) -> Result<PaginatedQuestionGroupsResponse, AppError> {
        let total = sqlx::query_scalar::<_, i64>(
            r#"SELECT COUNT(*) FROM question_groups
               WHERE ($1::uuid IS NULL OR material_id = $1)
                 AND ($2::uuid IS NULL OR section_id = $2)"#,
        )
        .bind(filters.material_id)
        .bind(filters.section_id)
        .fetch_one(db)
        .await
        .context("Failed to count question groups")
        .map_err(AppError::database)?;

        let groups = sqlx::query_as::<_, QuestionGroup>(
            r#"SELECT * FROM question_groups
               WHERE ($1::uuid IS NULL OR material_id = $1)
                 AND ($2::uuid IS NULL OR section_id = $2)
               ORDER BY created_at, id
               LIMIT $3 OFFSET $4"#,
        )
        .bind(filters.material_id)
        .bind(filters.section_id)
        .bind(filters.pagination.limit())
        .bind(filters.pagination.offset())
        .fetch_all(db)
        .await
        .context("Failed to fetch question groups")
        .map_err(AppError::database)?;

        Ok(PaginatedQuestionGroupsResponse {
            data: groups,
            meta: filters.pagination.meta(total),
        })
    }

    #[instrument(skip(db, dto))]
    pub async fn update_question_group(
        db: &PgPool,
        id: QuestionGroupId,
        dto: UpdateQuestionGroupDto,
    ) -> Result<QuestionGroup, AppError> {
        if let Some(section_id) = dto.section_id {
            let material_id = sqlx::query_scalar::<_, MaterialId>(
                "SELECT material_id FROM question_groups WHERE id = $1",
            )
            .bind(id)
            .fetch_optional(db)
            .await
            .context("Failed to fetch question group")
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Question group not found")))?;

            Self::ensure_section_in_material(db, material_id, section_id).await?;
        }

        sqlx::query_as::<_, QuestionGroup>(
            r#"UPDATE question_groups
               SET section_id = COALESCE($2, section_id),
                   paragraph = COALESCE($3, paragraph),
                   images = COALESCE($4, images)
               WHERE id = $1
               RETURNING *"#,
        )
        .bind(id)
        .bind(dto.section_id)
        .bind(&dto.paragraph)
        .bind(dto.images.as_ref().map(Json))
        .fetch_optional(db)
        .await
        .context("Failed to update question group")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Question group not found")))
    }

    /// Replaces the question at `index`.
    #[instrument(skip(db, question))]
    pub async fn update_question(
        db: &PgPool,
        id: QuestionGroupId,
        index: usize,
        question: Question,
    ) -> Result<QuestionGroup, AppError> {
        Self::edit_questions(db, id, index, |questions| {
            questions[index] = question;
            Ok(())
        })
        .await
    }

    /// Removes the question at `index`. A group keeps at least one question.
    #[instrument(skip(db))]
    pub async fn delete_question(
        db: &PgPool,
        id: QuestionGroupId,
        index: usize,
    ) -> Result<QuestionGroup, AppError> {
        Self::edit_questions(db, id, index, |questions| {
            if questions.len() == 1 {
                return Err(AppError::bad_request(anyhow::anyhow!(
                    "A question group must keep at least one question"
                )));
            }
            questions.remove(index);
            Ok(())
        })
        .await
    }

    /// Locks a group's questions, checks `index` is in range, applies `edit`
    /// and stores the result.
    async fn edit_questions<F>(
        db: &PgPool,
        id: QuestionGroupId,
        index: usize,
        edit: F,
    ) -> Result<QuestionGroup, AppError>
    where
        F: FnOnce(&mut Vec<Question>) -> Result<(), AppError>,
    {
        let mut tx = db
            .begin()
            .await
            .context("Failed to begin transaction")
            .map_err(AppError::database)?;

        let Json(mut questions) = sqlx::query_scalar::<_, Json<Vec<Question>>>(
            "SELECT questions FROM question_groups WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .context("Failed to fetch question group")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Question group not found")))?;

        if index >= questions.len() {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Question {} does not exist in the group",
                index + 1
            )));
        }

        edit(&mut questions)?;

        let group = sqlx::query_as::<_, QuestionGroup>(
            "UPDATE question_groups SET questions = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(Json(&questions))
        .fetch_one(&mut *tx)
        .await
        .context("Failed to update questions")
        .map_err(AppError::database)?;

        tx.commit()
            .await
            .context("Failed to commit questions")
            .map_err(AppError::database)?;

        Ok(group)
    }

    #[instrument(skip(db))]
    pub async fn delete_question_group(db: &PgPool, id: QuestionGroupId) -> Result<(), AppError> {
        Self::delete_by_id(db, "question_groups", id.into_inner(), "Question group not found")
            .await
    }

    // Files

    #[instrument(skip(db))]
    pub async fn create_file(db: &PgPool, dto: CreateFileDto) -> Result<MaterialFile, AppError> {
        Self::ensure_material_exists(db, dto.material_id).await?;

        let file = sqlx::query_as::<_, MaterialFile>(
            r#"INSERT INTO files (material_id, num, kind, filename, access_url)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING *"#,
        )
        .bind(dto.material_id)
        .bind(dto.num)
        .bind(dto.kind)
        .bind(dto.filename.trim())
        .bind(dto.access_url.trim())
        .fetch_one(db)
        .await
        .map_err(|e| {
            AppError::from_unique_violation(e, "A file with this number already exists for the material")
        })?;

        Ok(file)
    }

    #[instrument(skip(db))]
    pub async fn get_files(
        db: &PgPool,
        filters: MaterialFilterParams,
    ) -> Result<Vec<MaterialFile>, AppError> {
        let files = sqlx::query_as::<_, MaterialFile>(
            r#"SELECT * FROM files
               WHERE ($1::uuid IS NULL OR material_id = $1)
               ORDER BY material_id, num"#,
        )
        .bind(filters.material_id)
        .fetch_all(db)
        .await
        .context("Failed to fetch files")
        .map_err(AppError::database)?;

        Ok(files)
    }

    #[instrument(skip(db, dto))]
    pub async fn update_file(
        db: &PgPool,
        id: FileId,
        dto: UpdateFileDto,
    ) -> Result<MaterialFile, AppError> {
        sqlx::query_as::<_, MaterialFile>(
            r#"UPDATE files
               SET num = COALESCE($2, num),
                   kind = COALESCE($3, kind),
                   filename = COALESCE($4, filename),
                   access_url = COALESCE($5, access_url)
               WHERE id = $1
               RETURNING *"#,
        )
        .bind(id)
        .bind(dto.num)
        .bind(dto.kind)
        .bind(dto.filename.as_deref().map(str::trim))
        .bind(dto.access_url.as_deref().map(str::trim))
        .fetch_optional(db)
        .await
        .map_err(|e| {
            AppError::from_unique_violation(e, "A file with this number already exists for the material")
        })?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("File not found")))
    }

    #[instrument(skip(db))]
    pub async fn delete_file(db: &PgPool, id: FileId) -> Result<(), AppError> {
        Self::delete_by_id(db, "files", id.into_inner(), "File not found").await
    }

    /// `table` is always one of this module's literal table names.
    async fn delete_by_id(
        db: &PgPool,
        table: &'static str,
        id: uuid::Uuid,
        not_found: &'static str,
    ) -> Result<(), AppError> {
        let result = sqlx::query(&format!("DELETE FROM {} WHERE id = $1", table))
            .bind(id)
            .execute(db)
            .await
            .with_context(|| format!("Failed to delete from {}", table))
            .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!(not_found)));
        }

        Ok(())
    }
}
