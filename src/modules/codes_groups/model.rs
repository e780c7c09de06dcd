//! Codes group models and DTOs.

pub use edugate_models::codes_groups::*;
