//! Request/Response DTOs

use chrono::{NaiveDate, Utc};
use classroom_db::{Course, Student};
use serde::{Deserialize, Serialize};

/// Plain acknowledgement
#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

// ==================== Teacher Types ====================

/// Signup request
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// Login request
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Option<String>,
}

/// Public identity returned at login
#[derive(Serialize)]
pub struct LoginUser {
    pub id: i64,
    pub email: String,
    pub role: String,
}

/// Login response
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    pub expires_in: i64,
    pub user: LoginUser,
}

// ==================== Student Types ====================

/// Add student request. `teacherEmail` sent by older clients is ignored:
/// ownership always comes from the caller's token.
#[derive(Deserialize)]
pub struct AddStudentRequest {
    pub name: String,
    pub email: String,
    pub course: String,
    pub dob: NaiveDate,
}

/// Update student request (every field required)
#[derive(Deserialize)]
pub struct UpdateStudentRequest {
    pub name: String,
    pub course: String,
    pub dob: NaiveDate,
}

/// Student response (without password)
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub course: String,
    pub dob: NaiveDate,
    pub age: u32,
    pub teacher_id: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Student> for StudentResponse {
    fn from(s: Student) -> Self {
        let age = s.age_on(Utc::now().date_naive());
        Self {
            id: s.id,
            name: s.name,
            email: s.email,
            course: s.course,
            dob: s.dob,
            age,
            teacher_id: s.account_id,
            created_at: s.created_at.to_rfc3339(),
            updated_at: s.updated_at.to_rfc3339(),
        }
    }
}

/// Student creation response
#[derive(Serialize)]
pub struct StudentCreatedResponse {
    pub message: String,
    pub student: StudentResponse,
}

// ==================== Course Types ====================

/// Add or update course request (every field required)
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseRequest {
    pub course_name: String,
    pub course_code: i64,
    pub credit_hour: i64,
}

/// Course listing query parameters. Empty values count as absent.
#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CourseSearchParams {
    #[serde(default)]
    pub course_name: Option<String>,
    #[serde(default)]
    pub course_code: Option<String>,
    #[serde(default)]
    pub credit_hour: Option<String>,
}

/// Course response
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseResponse {
    pub id: i64,
    pub course_name: String,
    pub course_code: i64,
    pub credit_hour: i64,
    pub student_id: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Course> for CourseResponse {
    fn from(c: Course) -> Self {
        Self {
            id: c.id,
            course_name: c.course_name,
            course_code: c.course_code,
            credit_hour: c.credit_hour,
            student_id: c.student_id,
            created_at: c.created_at.to_rfc3339(),
            updated_at: c.updated_at.to_rfc3339(),
        }
    }
}

/// Course creation/update response
#[derive(Serialize)]
pub struct CourseMessageResponse {
    pub message: String,
    pub course: CourseResponse,
}
