//! Redemption ledger models and DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::codes_groups::GrantSurface;
use crate::ids::{CodesGroupId, RedemptionId, StudentId};

/// Longest code value accepted before touching the store.
pub const MAX_CODE_LENGTH: u64 = 64;

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RedeemCodeDto {
    #[validate(length(min = 1, max = 64))]
    pub code: String,
}

/// Ledger entry: one redeemed code of one group, per student.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Redemption {
    pub id: RedemptionId,
    pub student_id: StudentId,
    pub code: String,
    pub codes_group_id: CodesGroupId,
    pub redeemed_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RedemptionResult {
    pub success: bool,
    pub codes_group_id: CodesGroupId,
    pub codes_group_name: String,
    pub expiration: DateTime<Utc>,
    pub redeemed_at: DateTime<Utc>,
    pub grant: GrantSurface,
}

/// Redemption history row with the state of its group.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct RedemptionHistoryItem {
    pub code: String,
    pub codes_group_id: CodesGroupId,
    pub codes_group_name: String,
    pub expiration: DateTime<Utc>,
    pub redeemed_at: DateTime<Utc>,
    /// Group not expired and code still marked used
    pub is_active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redeem_code_dto_bounds() {
        let ok = RedeemCodeDto {
            code: "ABCDEFGH23".to_string(),
        };
        assert!(ok.validate().is_ok());

        let empty = RedeemCodeDto {
            code: String::new(),
        };
        assert!(empty.validate().is_err());

        let long = RedeemCodeDto {
            code: "A".repeat(MAX_CODE_LENGTH as usize + 1),
        };
        assert!(long.validate().is_err());
    }
}
