use anyhow::Context;
use chrono::{DateTime, Utc};
use edugate_core::AppError;
use edugate_entitlements::{EffectiveAccess, ResolutionPolicy, resolve};
use edugate_models::StudentId;
use edugate_models::catalog::Material;
use edugate_models::codes_groups::CodesGroup;
use edugate_models::{MaterialId, SectionId};
use sqlx::PgPool;
use tracing::instrument;

use crate::metrics::track_access_resolved;
use crate::modules::access::model::{AccessibleMaterialsCount, AccessibleMaterialsResponse};
use crate::modules::students::service::StudentService;

pub struct AccessService;

impl AccessService {
    /// Codes groups behind the student's ledger that still grant access at
    /// `now`: unexpired, and the redeemed code is still marked used.
    #[instrument(skip(db))]
    pub async fn load_valid_groups(
        db: &PgPool,
        student_id: StudentId,
        now: DateTime<Utc>,
    ) -> Result<Vec<CodesGroup>, AppError> {
        let groups = sqlx::query_as::<_, CodesGroup>(
            r#"SELECT cg.*
               FROM redemptions r
               JOIN codes_groups cg ON cg.id = r.codes_group_id
               JOIN codes c ON c.value = r.code AND c.codes_group_id = cg.id
               WHERE r.student_id = $1
                 AND c.is_used = TRUE
                 AND cg.expiration > $2
               ORDER BY r.redeemed_at"#,
        )
        .bind(student_id)
        .bind(now)
        .fetch_all(db)
        .await
        .context("Failed to load codes groups for student")
        .map_err(AppError::database)?;

        Ok(groups)
    }

    /// Resolves what `student_id` may access in full right now.
    #[instrument(skip(db))]
    pub async fn resolve_for_student(
        db: &PgPool,
        student_id: StudentId,
        policy: ResolutionPolicy,
    ) -> Result<EffectiveAccess, AppError> {
        StudentService::ensure_exists(db, student_id).await?;

        let now = Utc::now();
        let groups = Self::load_valid_groups(db, student_id, now).await?;
        track_access_resolved(groups.len());

        Ok(resolve(&groups, now, policy))
    }

    /// Materials the student can open question banks or files for.
    ///
    /// A section-level question grant lists the section's material too.
    #[instrument(skip(db, access))]
    pub async fn accessible_materials(
        db: &PgPool,
        access: &EffectiveAccess,
    ) -> Result<AccessibleMaterialsResponse, AppError> {
        let question_materials: Vec<MaterialId> =
            access.materials.questions.iter().copied().collect();
        let question_sections: Vec<SectionId> = access.sections.questions.iter().copied().collect();
        let file_materials: Vec<MaterialId> = access.materials.files.iter().copied().collect();

        let materials_with_questions = sqlx::query_as::<_, Material>(
            r#"SELECT id, name, description, created_at
               FROM materials
               WHERE id = ANY($1)
                  OR id IN (SELECT material_id FROM sections WHERE id = ANY($2))
               ORDER BY name, id"#,
        )
        .bind(&question_materials)
        .bind(&question_sections)
        .fetch_all(db)
        .await
        .context("Failed to fetch materials with question access")
        .map_err(AppError::database)?;

        let materials_with_files = sqlx::query_as::<_, Material>(
            r#"SELECT id, name, description, created_at
               FROM materials
               WHERE id = ANY($1)
               ORDER BY name, id"#,
        )
        .bind(&file_materials)
        .fetch_all(db)
        .await
        .context("Failed to fetch materials with file access")
        .map_err(AppError::database)?;

        let count = AccessibleMaterialsCount {
            questions: materials_with_questions.len(),
            files: materials_with_files.len(),
        };

        Ok(AccessibleMaterialsResponse {
            materials_with_questions,
            materials_with_files,
            count,
        })
    }
}
