use std::collections::HashSet;

use anyhow::Context;
use chrono::Utc;
use edugate_core::{AppError, PaginationParams};
use edugate_entitlements::codegen::generate_unique_codes;
use edugate_entitlements::{GrantPlan, plan_grant};
use edugate_models::CodesGroupId;
use sqlx::PgPool;
use tracing::{info, instrument};

use crate::metrics::track_codes_generated;
use crate::modules::codes_groups::model::{
    CODE_SAMPLE_SIZE, Code, CodesGroup, CodesGroupSummary, GenerateCodesDto,
    GenerateCodesResponse, GrantSurface, PaginatedCodesGroupsResponse, PaginatedCodesResponse,
};

/// Collision retries before giving up on filling a batch.
const MAX_INSERT_ROUNDS: usize = 8;

pub struct CodesGroupService;

impl CodesGroupService {
    /// Creates a codes group and `code_count` fresh codes for it.
    #[instrument(skip(db, dto), fields(code_count = dto.code_count))]
    pub async fn generate_codes(
        db: &PgPool,
        dto: GenerateCodesDto,
    ) -> Result<GenerateCodesResponse, AppError> {
        if !dto.expires_after(Utc::now()) {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Expiration must be in the future"
            )));
        }

        let plan = plan_grant(&dto).map_err(AppError::bad_request)?;
        Self::ensure_targets_exist(db, &plan).await?;

        let name = dto
            .name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("Codes {}", Utc::now().format("%Y-%m-%d %H:%M")));
        let count = dto.code_count as usize;

        let mut tx = db
            .begin()
            .await
            .context("Failed to begin transaction")
            .map_err(AppError::database)?;

        let surface = &plan.surface;
        let group = sqlx::query_as::<_, CodesGroup>(
            r#"INSERT INTO codes_groups (
                   name, expiration,
                   materials_with_questions, materials_with_files, materials_with_lectures,
                   sections, sections_for_videos, sections_for_questions,
                   access_videos, access_questions, access_files
               )
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
               RETURNING *"#,
        )
        .bind(&name)
        .bind(dto.expiration)
        .bind(&surface.materials_with_questions)
        .bind(&surface.materials_with_files)
        .bind(&surface.materials_with_lectures)
        .bind(&surface.sections)
        .bind(&surface.sections_for_videos)
        .bind(&surface.sections_for_questions)
        .bind(surface.access.videos)
        .bind(surface.access.questions)
        .bind(surface.access.files)
        .fetch_one(&mut *tx)
        .await
        .context("Failed to create codes group")
        .map_err(AppError::database)?;

        let mut inserted: Vec<String> = Vec::with_capacity(count);
        let mut attempted: HashSet<String> = HashSet::with_capacity(count);

        for _ in 0..MAX_INSERT_ROUNDS {
            if inserted.len() >= count {
                break;
            }

            let batch = {
                let mut rng = rand::thread_rng();
                generate_unique_codes(&mut rng, count - inserted.len(), &attempted)
            };

            // Codes already taken by other groups are skipped and regenerated.
            let stored = sqlx::query_scalar::<_, String>(
                r#"INSERT INTO codes (codes_group_id, value)
                   SELECT $1, value FROM UNNEST($2::varchar[]) AS value
                   ON CONFLICT (value) DO NOTHING
                   RETURNING value"#,
            )
            .bind(group.id)
            .bind(&batch)
            .fetch_all(&mut *tx)
            .await
            .context("Failed to insert codes")
            .map_err(AppError::database)?;

            attempted.extend(batch);
            inserted.extend(stored);
        }

        if inserted.len() < count {
            return Err(AppError::internal_error(format!(
                "Could only allocate {} of {} unique codes",
                inserted.len(),
                count
            )));
        }

        tx.commit()
            .await
            .context("Failed to commit codes group")
            .map_err(AppError::database)?;

        info!(codes_group_id = %group.id, code_count = count, "Codes generated");
        track_codes_generated(dto.code_count);

        inserted.truncate(CODE_SAMPLE_SIZE);

        Ok(GenerateCodesResponse {
            codes_group_id: group.id,
            name: group.name.clone(),
            expiration: group.expiration,
            code_count: dto.code_count,
            sample: inserted,
            grant: GrantSurface::from(&group),
        })
    }

    /// Referenced sections and materials must exist. Composite requests
    /// report unknown ids as invalid input, single-target ones as not found.
    async fn ensure_targets_exist(db: &PgPool, plan: &GrantPlan) -> Result<(), AppError> {
        let missing = |what: &str| {
            let message = anyhow::anyhow!("{} not found", what);
            if plan.composite {
                AppError::bad_request(message)
            } else {
                AppError::not_found(message)
            }
        };

        if !plan.sections.is_empty() {
            let found =
                sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM sections WHERE id = ANY($1)")
                    .bind(&plan.sections)
                    .fetch_one(db)
                    .await
                    .context("Failed to check sections")
                    .map_err(AppError::database)?;
            if found != plan.sections.len() as i64 {
                return Err(missing("One or more sections"));
            }
        }

        if !plan.materials.is_empty() {
            let found =
                sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM materials WHERE id = ANY($1)")
                    .bind(&plan.materials)
                    .fetch_one(db)
                    .await
                    .context("Failed to check materials")
                    .map_err(AppError::database)?;
            if found != plan.materials.len() as i64 {
                return Err(missing("One or more materials"));
            }
        }

        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn get_codes_groups(
        db: &PgPool,
        pagination: PaginationParams,
    ) -> Result<PaginatedCodesGroupsResponse, AppError> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM codes_groups")
            .fetch_one(db)
            .await
            .context("Failed to count codes groups")
            .map_err(AppError::database)?;

        let groups = sqlx::query_as::<_, CodesGroupSummary>(
            r#"SELECT
                cg.id,
                cg.name,
                cg.expiration,
                COUNT(c.id) AS total_codes,
                COUNT(c.id) FILTER (WHERE c.is_used) AS used_codes,
                cg.access_videos,
                cg.access_questions,
                cg.access_files,
                cg.created_at
               FROM codes_groups cg
               LEFT JOIN codes c ON c.codes_group_id = cg.id
               GROUP BY cg.id
               ORDER BY cg.created_at DESC, cg.id
               LIMIT $1 OFFSET $2"#,
        )
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(db)
        .await
        .context("Failed to fetch codes groups")
        .map_err(AppError::database)?;

        Ok(PaginatedCodesGroupsResponse {
            data: groups,
            meta: pagination.meta(total),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_codes_group(db: &PgPool, id: CodesGroupId) -> Result<CodesGroup, AppError> {
        sqlx::query_as::<_, CodesGroup>("SELECT * FROM codes_groups WHERE id = $1")
            .bind(id)
            .fetch_optional(db)
            .await
            .context("Failed to fetch codes group")
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Codes group not found")))
    }

    #[instrument(skip(db))]
    pub async fn get_codes(
        db: &PgPool,
        id: CodesGroupId,
        pagination: PaginationParams,
    ) -> Result<PaginatedCodesResponse, AppError> {
        Self::get_codes_group(db, id).await?;

        let total =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM codes WHERE codes_group_id = $1")
                .bind(id)
                .fetch_one(db)
                .await
                .context("Failed to count codes")
                .map_err(AppError::database)?;

        let codes = sqlx::query_as::<_, Code>(
            r#"SELECT id, codes_group_id, value, is_used, used_at
               FROM codes
               WHERE codes_group_id = $1
               ORDER BY value
               LIMIT $2 OFFSET $3"#,
        )
        .bind(id)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(db)
        .await
        .context("Failed to fetch codes")
        .map_err(AppError::database)?;

        Ok(PaginatedCodesResponse {
            data: codes,
            meta: pagination.meta(total),
        })
    }

    /// Deletes a group with its codes and the redemptions that reference it.
    #[instrument(skip(db))]
    pub async fn delete_codes_group(db: &PgPool, id: CodesGroupId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM codes_groups WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .context("Failed to delete codes group")
            .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Codes group not found")));
        }

        info!(codes_group_id = %id, "Codes group deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{in_days, insert_material, insert_section, insert_student};
    use axum::http::StatusCode;
    use edugate_entitlements::codegen::is_well_formed;
    use edugate_models::codes_groups::GenerationMode;
    use edugate_models::{MaterialId, SectionId};

    fn single(mode: GenerationMode, count: i64) -> GenerateCodesDto {
        GenerateCodesDto {
            name: Some("Spring batch".to_string()),
            code_count: count,
            expiration: in_days(30),
            mode: Some(mode),
            material_id: None,
            section_id: None,
            sections_for_videos: vec![],
            sections_for_questions: vec![],
            materials_for_files: vec![],
            materials_for_all: vec![],
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_generate_section_videos(pool: PgPool) {
        let material = insert_material(&pool, "History").await;
        let section = insert_section(&pool, material, "Ancient").await;
        let mut dto = single(GenerationMode::SectionVideos, 120);
        dto.section_id = Some(section);

        let response = CodesGroupService::generate_codes(&pool, dto).await.unwrap();

        assert_eq!(response.code_count, 120);
        assert_eq!(response.sample.len(), CODE_SAMPLE_SIZE);
        assert!(response.sample.iter().all(|code| is_well_formed(code)));
        assert_eq!(response.grant.sections_for_videos, vec![section]);
        assert!(response.grant.sections.is_empty());
        assert!(response.grant.access.videos);
        assert!(!response.grant.access.questions);

        let stored = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(DISTINCT value) FROM codes WHERE codes_group_id = $1",
        )
        .bind(response.codes_group_id)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(stored, 120);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_generate_rejects_past_expiration(pool: PgPool) {
        let material = insert_material(&pool, "History").await;
        let mut dto = single(GenerationMode::MaterialAll, 1);
        dto.material_id = Some(material);
        dto.expiration = in_days(-1);

        let err = CodesGroupService::generate_codes(&pool, dto)
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_generate_requires_target_for_mode(pool: PgPool) {
        let err = CodesGroupService::generate_codes(&pool, single(GenerationMode::SectionQuestions, 1))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_generate_unknown_single_target_is_not_found(pool: PgPool) {
        let mut dto = single(GenerationMode::MaterialFiles, 1);
        dto.material_id = Some(MaterialId::new());

        let err = CodesGroupService::generate_codes(&pool, dto)
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_generate_unknown_composite_target_is_invalid(pool: PgPool) {
        let material = insert_material(&pool, "History").await;
        let section = insert_section(&pool, material, "Ancient").await;
        let mut dto = single(GenerationMode::MaterialAll, 1);
        dto.mode = None;
        dto.sections_for_questions = vec![section, SectionId::new()];

        let err = CodesGroupService::generate_codes(&pool, dto)
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_generate_composite_grant(pool: PgPool) {
        let material = insert_material(&pool, "History").await;
        let section = insert_section(&pool, material, "Ancient").await;
        let mut dto = single(GenerationMode::MaterialAll, 3);
        dto.mode = None;
        dto.name = None;
        dto.sections_for_videos = vec![section];
        dto.materials_for_files = vec![material];

        let response = CodesGroupService::generate_codes(&pool, dto).await.unwrap();

        assert!(response.name.starts_with("Codes "));
        assert_eq!(response.sample.len(), 3);
        assert_eq!(response.grant.sections_for_videos, vec![section]);
        assert_eq!(response.grant.materials_with_files, vec![material]);
        assert!(response.grant.access.videos && response.grant.access.files);
        assert!(!response.grant.access.questions);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_list_groups_counts_used_codes(pool: PgPool) {
        let material = insert_material(&pool, "History").await;
        let mut dto = single(GenerationMode::MaterialAll, 4);
        dto.material_id = Some(material);
        let response = CodesGroupService::generate_codes(&pool, dto).await.unwrap();

        sqlx::query("UPDATE codes SET is_used = TRUE WHERE value = $1")
            .bind(&response.sample[0])
            .execute(&pool)
            .await
            .unwrap();

        let groups = CodesGroupService::get_codes_groups(&pool, PaginationParams::default())
            .await
            .unwrap();

        assert_eq!(groups.meta.total, 1);
        assert_eq!(groups.data[0].total_codes, 4);
        assert_eq!(groups.data[0].used_codes, 1);

        let codes = CodesGroupService::get_codes(
            &pool,
            response.codes_group_id,
            PaginationParams {
                limit: Some(3),
                offset: None,
                page: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(codes.data.len(), 3);
        assert!(codes.meta.has_more);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_delete_group_cascades_to_redemptions(pool: PgPool) {
        let student = insert_student(&pool).await;
        let material = insert_material(&pool, "History").await;
        let mut dto = single(GenerationMode::MaterialAll, 1);
        dto.material_id = Some(material);
        let response = CodesGroupService::generate_codes(&pool, dto).await.unwrap();
        crate::modules::redemptions::service::RedemptionService::redeem(
            &pool,
            student,
            &response.sample[0],
        )
        .await
        .unwrap();

        CodesGroupService::delete_codes_group(&pool, response.codes_group_id)
            .await
            .unwrap();

        let remaining = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM redemptions")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(remaining, 0);

        let err = CodesGroupService::delete_codes_group(&pool, response.codes_group_id)
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }
}
