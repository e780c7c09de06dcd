//! # Edugate Core
//!
//! Core types, errors, and utilities for the edugate API.
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`pagination`]: Pagination utilities for API responses
//! - [`serde`]: Custom serde deserialization helpers for query strings
//!
//! # Example
//!
//! ```ignore
//! use edugate_core::errors::AppError;
//! use edugate_core::pagination::PaginationParams;
//!
//! let error = AppError::gone(anyhow::anyhow!("Codes group has expired"));
//!
//! let params = PaginationParams::default();
//! let limit = params.limit();
//! ```

pub mod errors;
pub mod pagination;
pub mod serde;

pub use errors::AppError;
pub use pagination::{PaginationMeta, PaginationParams};
