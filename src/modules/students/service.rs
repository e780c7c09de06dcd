use anyhow::Context;
use edugate_core::{AppError, PaginationParams};
use edugate_models::StudentId;
use sqlx::PgPool;
use tracing::{info, instrument};

use crate::modules::students::model::{CreateStudentDto, PaginatedStudentsResponse, Student};

const STUDENT_COLUMNS: &str = "id, first_name, last_name, phone, is_blocked, created_at";

pub struct StudentService;

impl StudentService {
    #[instrument(skip(db, dto))]
    pub async fn create_student(db: &PgPool, dto: CreateStudentDto) -> Result<Student, AppError> {
        let student = sqlx::query_as::<_, Student>(&format!(
            "INSERT INTO students (first_name, last_name, phone) VALUES ($1, $2, $3) RETURNING {}",
            STUDENT_COLUMNS
        ))
        .bind(dto.first_name.trim())
        .bind(dto.last_name.trim())
        .bind(dto.phone.trim())
        .fetch_one(db)
        .await
        .map_err(|e| {
            AppError::from_unique_violation(e, "A student with this phone number already exists")
        })?;

        Ok(student)
    }

    #[instrument(skip(db))]
    pub async fn get_students(
        db: &PgPool,
        pagination: PaginationParams,
    ) -> Result<PaginatedStudentsResponse, AppError> {
        let limit = pagination.limit();
        let offset = pagination.offset();

        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM students")
            .fetch_one(db)
            .await
            .context("Failed to count students")
            .map_err(AppError::database)?;

        let students = sqlx::query_as::<_, Student>(&format!(
            "SELECT {} FROM students ORDER BY created_at DESC, id LIMIT $1 OFFSET $2",
            STUDENT_COLUMNS
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await
        .context("Failed to fetch students")
        .map_err(AppError::database)?;

        Ok(PaginatedStudentsResponse {
            data: students,
            meta: pagination.meta(total),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_student(db: &PgPool, id: StudentId) -> Result<Student, AppError> {
        sqlx::query_as::<_, Student>(&format!(
            "SELECT {} FROM students WHERE id = $1",
            STUDENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch student")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Student not found")))
    }

    #[instrument(skip(db))]
    pub async fn set_blocked(
        db: &PgPool,
        id: StudentId,
        is_blocked: bool,
    ) -> Result<Student, AppError> {
        let student = sqlx::query_as::<_, Student>(&format!(
            "UPDATE students SET is_blocked = $2 WHERE id = $1 RETURNING {}",
            STUDENT_COLUMNS
        ))
        .bind(id)
        .bind(is_blocked)
        .fetch_optional(db)
        .await
        .context("Failed to update student")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Student not found")))?;

        info!(student_id = %id, is_blocked, "Student block status changed");
        Ok(student)
    }

    /// Fails with `404` when the student does not exist.
    #[instrument(skip(db))]
    pub async fn ensure_exists(db: &PgPool, id: StudentId) -> Result<(), AppError> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM students WHERE id = $1)")
                .bind(id)
                .fetch_one(db)
                .await
                .context("Failed to check student")
                .map_err(AppError::database)?;

        if !exists {
            return Err(AppError::not_found(anyhow::anyhow!("Student not found")));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn dto(phone: &str) -> CreateStudentDto {
        CreateStudentDto {
            first_name: " Lina ".to_string(),
            last_name: "Haddad".to_string(),
            phone: phone.to_string(),
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_create_student_trims_names(pool: PgPool) {
        let student = StudentService::create_student(&pool, dto("0791234567"))
            .await
            .unwrap();

        assert_eq!(student.first_name, "Lina");
        assert!(!student.is_blocked);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_create_student_duplicate_phone_conflicts(pool: PgPool) {
        StudentService::create_student(&pool, dto("0791234567"))
            .await
            .unwrap();

        let err = StudentService::create_student(&pool, dto("0791234567"))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::CONFLICT);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_get_student_not_found(pool: PgPool) {
        let err = StudentService::get_student(&pool, StudentId::new())
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);

        let err = StudentService::ensure_exists(&pool, StudentId::new())
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_set_blocked_toggles(pool: PgPool) {
        let student = StudentService::create_student(&pool, dto("0791234567"))
            .await
            .unwrap();

        let blocked = StudentService::set_blocked(&pool, student.id, true)
            .await
            .unwrap();
        assert!(blocked.is_blocked);
        assert!(
            StudentService::get_student(&pool, student.id)
                .await
                .unwrap()
                .is_blocked
        );

        let unblocked = StudentService::set_blocked(&pool, student.id, false)
            .await
            .unwrap();
        assert!(!unblocked.is_blocked);

        let err = StudentService::set_blocked(&pool, StudentId::new(), true)
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_get_students_paginates(pool: PgPool) {
        for phone in ["0790000001", "0790000002", "0790000003"] {
            StudentService::create_student(&pool, dto(phone))
                .await
                .unwrap();
        }

        let page = StudentService::get_students(
            &pool,
            PaginationParams {
                limit: Some(2),
                offset: None,
                page: None,
            },
        )
        .await
        .unwrap();

        assert_eq!(page.data.len(), 2);
        assert_eq!(page.meta.total, 3);
        assert!(page.meta.has_more);
    }
}
