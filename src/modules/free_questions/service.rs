use anyhow::Context;
use edugate_core::AppError;
use edugate_entitlements::sampler::{Sampler, sample};
use edugate_models::{QuestionGroupId, SectionId};
use sqlx::PgPool;
use tracing::{info, instrument, warn};

use crate::metrics::track_free_pool_rebuilt;
use crate::modules::free_questions::model::{RebuildFreePoolResponse, SectionRebuildOutcome};

pub struct FreeQuestionService;

impl FreeQuestionService {
    /// Clears the curated pool and refills it with up to `per_section_cap`
    /// single-question groups per section. Each section is copied in its own
    /// transaction; a failing section is reported and the others still land.
    #[instrument(skip(db, sampler))]
    pub async fn rebuild_free_pool(
        db: &PgPool,
        per_section_cap: usize,
        sampler: &dyn Sampler,
    ) -> Result<RebuildFreePoolResponse, AppError> {
        sqlx::query("DELETE FROM free_question_groups")
            .execute(db)
            .await
            .context("Failed to clear free question pool")
            .map_err(AppError::database)?;

        let section_ids = sqlx::query_scalar::<_, SectionId>(
            r#"SELECT DISTINCT section_id FROM question_groups
               WHERE jsonb_array_length(questions) = 1
               ORDER BY section_id"#,
        )
        .fetch_all(db)
        .await
        .context("Failed to find sections with single-question groups")
        .map_err(AppError::database)?;

        let mut sections = Vec::with_capacity(section_ids.len());
        for section_id in section_ids {
            let outcome = match Self::rebuild_section(db, section_id, per_section_cap, sampler)
                .await
            {
                Ok(copied) => SectionRebuildOutcome {
                    section_id,
                    copied,
                    error: None,
                },
                Err(e) => {
                    warn!(section_id = %section_id, error = %e.error, "Free pool section failed");
                    SectionRebuildOutcome {
                        section_id,
                        copied: 0,
                        error: Some(e.error.to_string()),
                    }
                }
            };
            sections.push(outcome);
        }

        let total_copied = sections.iter().map(|s| s.copied).sum();
        let failed = sections.iter().filter(|s| s.error.is_some()).count();
        track_free_pool_rebuilt(total_copied, failed);

        info!(
            total_copied,
            sections = sections.len(),
            failed,
            "Free question pool rebuilt"
        );

        Ok(RebuildFreePoolResponse {
            total_copied,
            sections_processed: sections.len() as i64,
            sections,
        })
    }

    async fn rebuild_section(
        db: &PgPool,
        section_id: SectionId,
        cap: usize,
        sampler: &dyn Sampler,
    ) -> Result<i64, AppError> {
        let candidates = sqlx::query_scalar::<_, QuestionGroupId>(
            r#"SELECT id FROM question_groups
               WHERE section_id = $1 AND jsonb_array_length(questions) = 1
               ORDER BY id"#,
        )
        .bind(section_id)
        .fetch_all(db)
        .await
        .context("Failed to fetch section candidates")
        .map_err(AppError::database)?;

        let chosen = sample(sampler, &candidates, cap);

        let mut tx = db
            .begin()
            .await
            .context("Failed to begin transaction")
            .map_err(AppError::database)?;

        let result = sqlx::query(
            r#"INSERT INTO free_question_groups
                   (material_id, section_id, source_group_id, paragraph, images, questions)
               SELECT material_id, section_id, id, paragraph, images, questions
               FROM question_groups
               WHERE id = ANY($1)"#,
        )
        .bind(&chosen)
        .execute(&mut *tx)
        .await
        .context("Failed to copy groups into the free pool")
        .map_err(AppError::database)?;

        tx.commit()
            .await
            .context("Failed to commit free pool section")
            .map_err(AppError::database)?;

        Ok(result.rows_affected() as i64)
    }
}
