use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use edugate_auth::{Claims, Role, verify_token};
use edugate_core::AppError;
use edugate_models::StudentId;

use crate::state::AppState;

/// Extractor that validates the bearer JWT and provides its claims.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    pub fn role(&self) -> Role {
        self.0.role
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.0.role == role
    }

    /// The token subject as a student id.
    pub fn student_id(&self) -> Result<StudentId, AppError> {
        self.0
            .subject_id()
            .map(StudentId::from)
            .ok_or_else(|| AppError::unauthorized("Invalid subject in token".to_string()))
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("Missing authorization header".to_string()))?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::unauthorized("Invalid authorization header format".to_string())
        })?;

        let claims = verify_token(token, &state.jwt_config)?;

        Ok(AuthUser(claims))
    }
}

/// Generates an extractor that only admits tokens carrying the given role.
#[macro_export]
macro_rules! require_role {
    ($name:ident, $role:expr) => {
        #[derive(Debug, Clone)]
        pub struct $name(pub $crate::middleware::auth::AuthUser);

        impl axum::extract::FromRequestParts<$crate::state::AppState> for $name {
            type Rejection = edugate_core::AppError;

            async fn from_request_parts(
                parts: &mut axum::http::request::Parts,
                state: &$crate::state::AppState,
            ) -> Result<Self, Self::Rejection> {
                let auth_user =
                    $crate::middleware::auth::AuthUser::from_request_parts(parts, state).await?;

                if !auth_user.has_role($role) {
                    return Err(edugate_core::AppError::forbidden(format!(
                        "Access denied. Requires role: {}",
                        $role
                    )));
                }

                Ok($name(auth_user))
            }
        }
    };
}

require_role!(RequireStudent, edugate_auth::Role::Student);
require_role!(RequireAdmin, edugate_auth::Role::Admin);
