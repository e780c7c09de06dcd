use anyhow::Context;
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use edugate_core::AppError;
use edugate_models::StudentId;
use edugate_models::codes_groups::{CodesGroup, GrantSurface};
use sqlx::{FromRow, PgPool};
use tracing::{info, instrument, warn};

use crate::metrics::track_code_redeemed;
use crate::modules::redemptions::model::{
    RedemptionHistoryItem, RedemptionHistoryResponse, RedemptionResult,
};
use crate::modules::students::service::StudentService;

#[derive(Debug, FromRow)]
struct CodeLookup {
    code_is_used: bool,
    #[sqlx(flatten)]
    group: CodesGroup,
}

pub struct RedemptionService;

impl RedemptionService {
    /// Redeems `code` for `student_id`.
    ///
    /// Marking the code used and writing the ledger entry happen in one
    /// transaction. The mark is a conditional update, so of several concurrent
    /// attempts on one code exactly one succeeds; the ledger's unique index
    /// rejects a second code from a group the student already holds.
    #[instrument(skip(db))]
    pub async fn redeem(
        db: &PgPool,
        student_id: StudentId,
        code: &str,
    ) -> Result<RedemptionResult, AppError> {
        let result = Self::redeem_in_transaction(db, student_id, code).await;

        match &result {
            Ok(redemption) => {
                info!(
                    student_id = %student_id,
                    codes_group_id = %redemption.codes_group_id,
                    "Code redeemed"
                );
                track_code_redeemed("success");
            }
            Err(err) => {
                warn!(student_id = %student_id, status = %err.status, error = %err.error, "Redemption rejected");
                track_code_redeemed(outcome_label(err.status));
            }
        }

        result
    }

    async fn redeem_in_transaction(
        db: &PgPool,
        student_id: StudentId,
        code: &str,
    ) -> Result<RedemptionResult, AppError> {
        let mut tx = db
            .begin()
            .await
            .context("Failed to begin transaction")
            .map_err(AppError::database)?;

        let is_blocked =
            sqlx::query_scalar::<_, bool>("SELECT is_blocked FROM students WHERE id = $1")
                .bind(student_id)
                .fetch_optional(&mut *tx)
                .await
                .context("Failed to fetch student")
                .map_err(AppError::database)?
                .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Student not found")))?;

        if is_blocked {
            return Err(AppError::forbidden("Student account is blocked".to_string()));
        }

        let lookup = sqlx::query_as::<_, CodeLookup>(
            r#"SELECT c.is_used AS code_is_used, cg.*
               FROM codes c
               JOIN codes_groups cg ON cg.id = c.codes_group_id
               WHERE c.value = $1"#,
        )
        .bind(code)
        .fetch_optional(&mut *tx)
        .await
        .context("Failed to look up code")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Code not found")))?;

        let group = lookup.group;

        if group.is_expired_at(Utc::now()) {
            return Err(AppError::gone(anyhow::anyhow!("Codes group has expired")));
        }

        if lookup.code_is_used {
            return Err(AppError::conflict(anyhow::anyhow!(
                "Code has already been used"
            )));
        }

        let holds_group = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM redemptions WHERE student_id = $1 AND codes_group_id = $2)",
        )
        .bind(student_id)
        .bind(group.id)
        .fetch_one(&mut *tx)
        .await
        .context("Failed to check existing redemptions")
        .map_err(AppError::database)?;

        if holds_group {
            return Err(AppError::conflict(anyhow::anyhow!(
                "A code from this group has already been redeemed"
            )));
        }

        let marked = sqlx::query(
            "UPDATE codes SET is_used = TRUE, used_at = NOW() WHERE value = $1 AND is_used = FALSE",
        )
        .bind(code)
        .execute(&mut *tx)
        .await
        .context("Failed to mark code as used")
        .map_err(AppError::database)?;

        if marked.rows_affected() == 0 {
            return Err(AppError::conflict(anyhow::anyhow!(
                "Code has already been used"
            )));
        }

        let redeemed_at = sqlx::query_scalar::<_, DateTime<Utc>>(
            r#"INSERT INTO redemptions (student_id, code, codes_group_id)
               VALUES ($1, $2, $3)
               RETURNING redeemed_at"#,
        )
        .bind(student_id)
        .bind(code)
        .bind(group.id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            AppError::from_unique_violation(e, "A code from this group has already been redeemed")
        })?;

        tx.commit()
            .await
            .context("Failed to commit redemption")
            .map_err(AppError::database)?;

        Ok(RedemptionResult {
            success: true,
            codes_group_id: group.id,
            codes_group_name: group.name.clone(),
            expiration: group.expiration,
            redeemed_at,
            grant: GrantSurface::from(&group),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_history(
        db: &PgPool,
        student_id: StudentId,
    ) -> Result<RedemptionHistoryResponse, AppError> {
        StudentService::ensure_exists(db, student_id).await?;

        let data = sqlx::query_as::<_, RedemptionHistoryItem>(
            r#"SELECT
                r.code,
                r.codes_group_id,
                cg.name AS codes_group_name,
                cg.expiration,
                r.redeemed_at,
                (cg.expiration > $2 AND c.is_used) AS is_active
               FROM redemptions r
               JOIN codes_groups cg ON cg.id = r.codes_group_id
               JOIN codes c ON c.value = r.code
               WHERE r.student_id = $1
               ORDER BY r.redeemed_at DESC"#,
        )
        .bind(student_id)
        .bind(Utc::now())
        .fetch_all(db)
        .await
        .context("Failed to fetch redemption history")
        .map_err(AppError::database)?;

        Ok(RedemptionHistoryResponse { data })
    }
}

fn outcome_label(status: StatusCode) -> &'static str {
    match status {
        StatusCode::NOT_FOUND => "not_found",
        StatusCode::GONE => "expired",
        StatusCode::CONFLICT => "conflict",
        StatusCode::FORBIDDEN => "forbidden",
        StatusCode::BAD_REQUEST => "invalid",
        _ => "error",
    }
}
