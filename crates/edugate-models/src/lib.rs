//! # Edugate Models
//!
//! Domain models and DTOs for the edugate API.
//!
//! # Modules
//!
//! - [`ids`]: Strongly-typed entity ids
//! - [`catalog`]: Materials, sections, videos, question groups and files
//! - [`codes_groups`]: Codes groups, codes and provisioning DTOs
//! - [`redemptions`]: Redemption ledger entries and results
//! - [`content`]: Student-facing content views (full or preview)
//! - [`free_questions`]: Curated free question pool rebuild reports
//! - [`students`]: Student profiles

pub mod catalog;
pub mod codes_groups;
pub mod content;
pub mod free_questions;
pub mod ids;
pub mod redemptions;
pub mod students;

pub use ids::{
    CodeId, CodesGroupId, FileId, FreeQuestionGroupId, MaterialId, QuestionGroupId, RedemptionId,
    SectionId, StudentId, VideoId,
};
