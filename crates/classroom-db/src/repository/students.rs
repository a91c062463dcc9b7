//! Student operations

use chrono::Utc;
use sqlx::Row;

use crate::error::DbError;
use crate::models::{NewStudent, Student, StudentChanges};
use crate::repository::Database;

impl Database {
    // ==================== Student Operations ====================

    /// Insert a new student
    pub async fn insert_student(&self, student: NewStudent) -> Result<Student, DbError> {
        let now = Utc::now();

        let existing = self.get_student_by_email(&student.email).await?;
        if existing.is_some() {
            return Err(DbError::Duplicate(format!(
                "Student '{}' already exists",
                student.email
            )));
        }

        let result = sqlx::query(
            r#"
            INSERT INTO students (name, email, course, dob, account_id, password_hash, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&student.name)
        .bind(&student.email)
        .bind(&student.course)
        .bind(student.dob)
        .bind(student.account_id)
        .bind(&student.password_hash)
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DbError::from_insert(e, format!("Student '{}' already exists", student.email)))?;

        let id: i64 = result.get("id");

        Ok(Student {
            id,
            name: student.name,
            email: student.email,
            course: student.course,
            dob: student.dob,
            account_id: student.account_id,
            password_hash: student.password_hash,
            created_at: now,
            updated_at: now,
        })
    }

    /// Get a student by email
    pub async fn get_student_by_email(&self, email: &str) -> Result<Option<Student>, DbError> {
        let result = sqlx::query(
            r#"
            SELECT id, name, email, course, dob, account_id, password_hash, created_at, updated_at
            FROM students
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        result.map(|row| Student::try_from(&row).map_err(DbError::from)).transpose()
    }

    /// Get a student by ID
    pub async fn get_student_by_id(&self, id: i64) -> Result<Option<Student>, DbError> {
        let result = sqlx::query(
            r#"
            SELECT id, name, email, course, dob, account_id, password_hash, created_at, updated_at
            FROM students
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        result.map(|row| Student::try_from(&row).map_err(DbError::from)).transpose()
    }

    /// List the students owned by an account
    pub async fn list_students_for_account(&self, account_id: i64) -> Result<Vec<Student>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, email, course, dob, account_id, password_hash, created_at, updated_at
            FROM students
            WHERE account_id = ?
            ORDER BY id
            "#,
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| Student::try_from(row).map_err(DbError::from))
            .collect()
    }

    /// Overwrite a student's mutable fields, returning the stored record
    pub async fn update_student(
        &self,
        id: i64,
        changes: StudentChanges,
    ) -> Result<Option<Student>, DbError> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            UPDATE students
            SET name = ?, course = ?, dob = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&changes.name)
        .bind(&changes.course)
        .bind(changes.dob)
        .bind(now.to_rfc3339())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_student_by_id(id).await
    }

    /// Delete a student together with the courses it owns
    pub async fn delete_student(&self, id: i64) -> Result<bool, DbError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM courses WHERE student_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM students WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}
