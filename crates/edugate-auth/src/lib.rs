//! # Edugate Auth
//!
//! Authentication claims and JWT utilities for the edugate API.
//!
//! The API only verifies bearer tokens: a token carries an opaque subject
//! (the student or admin id) and a [`Role`]. Token issuance exists for the
//! CLI and for tests.
//!
//! # Example
//!
//! ```ignore
//! use edugate_auth::{Role, create_access_token, verify_token};
//! use edugate_config::JwtConfig;
//!
//! let config = JwtConfig::from_env();
//! let token = create_access_token(student_id, Role::Student, &config)?;
//! let claims = verify_token(&token, &config)?;
//! assert_eq!(claims.role, Role::Student);
//! ```

pub mod claims;
pub mod jwt;

// Re-export commonly used types at crate root
pub use claims::{Claims, Role};
pub use jwt::{create_access_token, verify_token};
