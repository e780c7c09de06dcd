//! Redemption models and DTOs.

use edugate_core::AppError;
use serde::Serialize;
use utoipa::ToSchema;

pub use edugate_models::redemptions::*;

#[derive(Debug, Serialize, ToSchema)]
pub struct RedemptionHistoryResponse {
    pub data: Vec<RedemptionHistoryItem>,
}

/// Trims a submitted code. Case is preserved; codes are matched exactly.
pub fn normalize_code(raw: &str) -> Result<String, AppError> {
    let code = raw.trim();

    if code.is_empty() {
        return Err(AppError::bad_request(anyhow::anyhow!("Code is required")));
    }

    if code.len() as u64 > MAX_CODE_LENGTH {
        return Err(AppError::bad_request(anyhow::anyhow!(
            "Code must be at most {} characters",
            MAX_CODE_LENGTH
        )));
    }

    Ok(code.to_string())
}
