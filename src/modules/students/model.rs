//! Student models and DTOs.
//!
//! Re-exports the shared student models and adds the admin list envelope.

use edugate_core::PaginationMeta;
use serde::Serialize;
use utoipa::ToSchema;

pub use edugate_models::students::*;

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedStudentsResponse {
    pub data: Vec<Student>,
    pub meta: PaginationMeta,
}
