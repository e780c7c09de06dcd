//! Content read models.
//!
//! Responses carry `full_access` so clients can tell the full catalog from a
//! free preview.

pub use edugate_models::catalog::{FileKind, Question, Video};
pub use edugate_models::content::*;
