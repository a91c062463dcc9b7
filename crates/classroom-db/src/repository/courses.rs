//! Course operations

use chrono::Utc;
use sqlx::Row;

use crate::error::DbError;
use crate::models::{Course, CourseChanges, NewCourse};
use crate::repository::Database;

/// One optional search predicate for course listings
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CourseFilter {
    /// Case-insensitive substring match on the course name, folded with
    /// Unicode lowercase rules
    NameContains(String),
    /// Exact course code
    Code(i64),
    /// Exact credit-hour count
    CreditHour(i64),
}

impl CourseFilter {
    fn sql(&self) -> &'static str {
        match self {
            CourseFilter::NameContains(_) => "instr(course_name_folded, ?) > 0",
            CourseFilter::Code(_) => "course_code = ?",
            CourseFilter::CreditHour(_) => "credit_hour = ?",
        }
    }
}

/// Search over a student's courses.
///
/// Filters are OR-combined; an empty query matches every owned course.
#[derive(Debug, Clone, Default)]
pub struct CourseQuery {
    filters: Vec<CourseFilter>,
}

impl CourseQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a predicate to the query
    pub fn with(mut self, filter: CourseFilter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn filters(&self) -> &[CourseFilter] {
        &self.filters
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

const COURSE_COLUMNS: &str =
    "id, course_name, course_code, credit_hour, student_id, created_at, updated_at";

impl Database {
    // ==================== Course Operations ====================

    /// Insert a new course
    pub async fn insert_course(&self, course: NewCourse) -> Result<Course, DbError> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO courses (course_name, course_name_folded, course_code, credit_hour, student_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&course.course_name)
        .bind(course.course_name.to_lowercase())
        .bind(course.course_code)
        .bind(course.credit_hour)
        .bind(course.student_id)
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .fetch_one(&self.pool)
        .await?;

        let id: i64 = result.get("id");

        Ok(Course {
            id,
            course_name: course.course_name,
            course_code: course.course_code,
            credit_hour: course.credit_hour,
            student_id: course.student_id,
            created_at: now,
            updated_at: now,
        })
    }

    /// Get a course by ID
    pub async fn get_course_by_id(&self, id: i64) -> Result<Option<Course>, DbError> {
        let sql = format!("SELECT {} FROM courses WHERE id = ?", COURSE_COLUMNS);
        let result = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        result.map(|row| Course::try_from(&row).map_err(DbError::from)).transpose()
    }

    /// List a student's courses, narrowed by the query's filters
    pub async fn list_courses_for_student(
        &self,
        student_id: i64,
        query: &CourseQuery,
    ) -> Result<Vec<Course>, DbError> {
        let mut sql = format!("SELECT {} FROM courses WHERE student_id = ?", COURSE_COLUMNS);
        if !query.is_empty() {
            let clauses: Vec<&str> = query.filters.iter().map(CourseFilter::sql).collect();
            sql.push_str(&format!(" AND ({})", clauses.join(" OR ")));
        }
        sql.push_str(" ORDER BY id");

        let mut courses_query = sqlx::query(&sql).bind(student_id);
        for filter in &query.filters {
            courses_query = match filter {
                CourseFilter::NameContains(name) => courses_query.bind(name.to_lowercase()),
                CourseFilter::Code(code) => courses_query.bind(*code),
                CourseFilter::CreditHour(hours) => courses_query.bind(*hours),
            };
        }

        let rows = courses_query.fetch_all(&self.pool).await?;
        rows.iter()
            .map(|row| Course::try_from(row).map_err(DbError::from))
            .collect()
    }

    /// Overwrite a course's mutable fields, returning the stored record
    pub async fn update_course(
        &self,
        id: i64,
        changes: CourseChanges,
    ) -> Result<Option<Course>, DbError> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            UPDATE courses
            SET course_name = ?, course_name_folded = ?, course_code = ?, credit_hour = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&changes.course_name)
        .bind(changes.course_name.to_lowercase())
        .bind(changes.course_code)
        .bind(changes.credit_hour)
        .bind(now.to_rfc3339())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_course_by_id(id).await
    }

    /// Delete a course
    pub async fn delete_course(&self, id: i64) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM courses WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
