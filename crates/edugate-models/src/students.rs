//! Student models and DTOs.
//!
//! Students only carry profile data here; credentials live with the identity
//! provider that issues bearer tokens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::StudentId;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Student {
    pub id: StudentId,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub is_blocked: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateStudentDto {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(length(min = 6, max = 20))]
    pub phone: String,
}

/// Blocked students keep reading but can no longer redeem codes.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SetStudentBlockedDto {
    pub is_blocked: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_student_dto_validation() {
        let valid = CreateStudentDto {
            first_name: "Lina".to_string(),
            last_name: "Haddad".to_string(),
            phone: "0791234567".to_string(),
        };
        assert!(valid.validate().is_ok());
    }

    #[test]
    fn test_create_student_dto_empty_name() {
        let invalid = CreateStudentDto {
            first_name: String::new(),
            last_name: "Haddad".to_string(),
            phone: "0791234567".to_string(),
        };
        assert!(invalid.validate().is_err());
    }

    #[test]
    fn test_create_student_dto_short_phone() {
        let invalid = CreateStudentDto {
            first_name: "Lina".to_string(),
            last_name: "Haddad".to_string(),
            phone: "123".to_string(),
        };
        assert!(invalid.validate().is_err());
    }
}
