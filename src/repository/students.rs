//! Students repository for database operations

use sqlx::{Pool, Postgres};

use super::like_pattern;
use crate::{
    error::{AppError, AppResult},
    models::student::{Student, StudentInput},
};

const STUDENT_COLUMNS: &str =
    "id, first_name, last_name, email, semester, control_number, major, created_at";

#[derive(Clone)]
pub struct StudentsRepository {
    pool: Pool<Postgres>,
}

impl StudentsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List students, newest first
    pub async fn list(&self) -> AppResult<Vec<Student>> {
        let students = sqlx::query_as::<_, Student>(&format!(
            "SELECT {} FROM students WHERE deleted_at IS NULL ORDER BY created_at DESC, id DESC",
            STUDENT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(students)
    }

    /// Case-insensitive search over names, email, control number and major
    pub async fn search(&self, term: &str) -> AppResult<Vec<Student>> {
        let students = sqlx::query_as::<_, Student>(&format!(
            r#"
            SELECT {} FROM students
            WHERE deleted_at IS NULL
              AND (first_name ILIKE $1 OR last_name ILIKE $1 OR email ILIKE $1
                   OR control_number ILIKE $1 OR major ILIKE $1)
            ORDER BY first_name ASC, id ASC
            "#,
            STUDENT_COLUMNS
        ))
        .bind(like_pattern(term))
        .fetch_all(&self.pool)
        .await?;
        Ok(students)
    }

    /// Get student by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Student> {
        sqlx::query_as::<_, Student>(&format!(
            "SELECT {} FROM students WHERE id = $1 AND deleted_at IS NULL",
            STUDENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Student with id {} not found", id)))
    }

    /// Create a student
    pub async fn create(&self, data: &StudentInput) -> AppResult<Student> {
        let student = sqlx::query_as::<_, Student>(&format!(
            r#"
            INSERT INTO students (first_name, last_name, email, semester, control_number, major)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            STUDENT_COLUMNS
        ))
        .bind(&data.first_name)
        .bind(&data.last_name)
        .bind(&data.email)
        .bind(&data.semester)
        .bind(&data.control_number)
        .bind(&data.major)
        .fetch_one(&self.pool)
        .await?;
        Ok(student)
    }

    /// Replace a student's fields
    pub async fn update(&self, id: i32, data: &StudentInput) -> AppResult<Student> {
        sqlx::query_as::<_, Student>(&format!(
            r#"
            UPDATE students
            SET first_name = $2, last_name = $3, email = $4,
                semester = $5, control_number = $6, major = $7
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING {}
            "#,
            STUDENT_COLUMNS
        ))
        .bind(id)
        .bind(&data.first_name)
        .bind(&data.last_name)
        .bind(&data.email)
        .bind(&data.semester)
        .bind(&data.control_number)
        .bind(&data.major)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Student with id {} not found", id)))
    }

    /// Soft-delete a student, refused while the student has active loans.
    ///
    /// Loan history keeps pointing at the row, so past loans still show the
    /// student's name. The row lock makes a concurrent loan creation wait.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        let found: Option<i32> = sqlx::query_scalar(
            "SELECT id FROM students WHERE id = $1 AND deleted_at IS NULL FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        if found.is_none() {
            return Err(AppError::NotFound(format!("Student with id {} not found", id)));
        }

        let active_loans: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM loans WHERE student_id = $1 AND status = 'active'",
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        if active_loans > 0 {
            return Err(AppError::Conflict(format!(
                "Student has {} active loan(s) and cannot be deleted",
                active_loans
            )));
        }

        sqlx::query("UPDATE students SET deleted_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}
