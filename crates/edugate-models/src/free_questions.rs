//! Free question pool models.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::SectionId;

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct RebuildFreePoolDto {
    /// Groups copied per section; defaults to the configured pool cap
    #[validate(range(min = 1, max = 100))]
    pub per_section_cap: Option<i64>,
}

/// Outcome of rebuilding one section of the pool.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SectionRebuildOutcome {
    pub section_id: SectionId,
    pub copied: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RebuildFreePoolResponse {
    pub total_copied: i64,
    pub sections_processed: i64,
    pub sections: Vec<SectionRebuildOutcome>,
}
