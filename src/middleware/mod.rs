//! Middleware modules for request processing.
//!
//! # Authentication Flow
//!
//! 1. Client sends request with `Authorization: Bearer <token>` header
//! 2. `AuthUser` extractor validates the JWT and extracts claims
//! 3. Role extractors (`RequireStudent`, `RequireAdmin`) check the token role
//! 4. Handler executes if all checks pass
//!
//! # Example
//!
//! ```ignore
//! use crate::middleware::auth::RequireStudent;
//!
//! async fn redeem(RequireStudent(auth_user): RequireStudent) -> impl IntoResponse {
//!     let student_id = auth_user.student_id()?;
//!     // ...
//! }
//! ```

pub mod auth;
