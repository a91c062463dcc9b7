//! Teacher-managed student routes

use axum::{
    Extension, Json, Router,
    extract::State,
    http::StatusCode,
    middleware,
    routing::{get, post, put},
};
use classroom_auth::{
    AuthUser, GENERATED_PASSWORD_LENGTH, TeacherOnly, generate_password, hash_password,
    require_role,
};
use classroom_db::{NewStudent, Student, StudentChanges};
use classroom_notify::Notification;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath};
use crate::state::AppState;

use super::types::{
    AddStudentRequest, MessageResponse, StudentCreatedResponse, StudentResponse,
    UpdateStudentRequest,
};
use super::validation::{MIN_NAME_LENGTH, validate_email, validate_text};

/// Load a student and require the caller to own it
async fn owned_student(state: &AppState, teacher: &AuthUser, id: i64) -> Result<Student, ApiError> {
    let student = state
        .db
        .get_student_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("student not found".to_string()))?;

    if student.account_id != teacher.id {
        debug!("Teacher {} denied access to student {}", teacher.id, id);
        return Err(ApiError::Forbidden);
    }

    Ok(student)
}

/// POST /students/add
async fn add_student(
    Extension(teacher): Extension<AuthUser>,
    State(state): State<AppState>,
    ApiJson(request): ApiJson<AddStudentRequest>,
) -> Result<(StatusCode, Json<StudentCreatedResponse>), ApiError> {
    validate_text("Name", &request.name, MIN_NAME_LENGTH)?;
    validate_email(&request.email)?;
    validate_text("Course", &request.course, MIN_NAME_LENGTH)?;

    if state.db.get_student_by_email(&request.email).await?.is_some() {
        return Err(ApiError::DuplicateEmail(
            "student with this email already exists".to_string(),
        ));
    }

    let password = generate_password(GENERATED_PASSWORD_LENGTH);
    let password_hash = hash_password(&password)?;

    let student = state
        .db
        .insert_student(NewStudent {
            name: request.name.trim().to_string(),
            email: request.email,
            course: request.course.trim().to_string(),
            dob: request.dob,
            account_id: teacher.id,
            password_hash,
        })
        .await?;

    info!("Teacher {} added student {}", teacher.id, student.id);

    // The record is durable at this point; delivery runs detached
    state.notifications.dispatch(Notification::account_created(
        &student.email,
        &student.name,
        &password,
    ));

    Ok((
        StatusCode::CREATED,
        Json(StudentCreatedResponse {
            message: "student saved successfully".to_string(),
            student: student.into(),
        }),
    ))
}

/// GET /students/my-students
async fn my_students(
    Extension(teacher): Extension<AuthUser>,
    State(state): State<AppState>,
) -> Result<Json<Vec<StudentResponse>>, ApiError> {
    let students = state.db.list_students_for_account(teacher.id).await?;

    Ok(Json(students.into_iter().map(StudentResponse::from).collect()))
}

/// PUT /students/{id}
async fn update_student(
    Extension(teacher): Extension<AuthUser>,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(request): ApiJson<UpdateStudentRequest>,
) -> Result<Json<StudentResponse>, ApiError> {
    validate_text("Name", &request.name, MIN_NAME_LENGTH)?;
    validate_text("Course", &request.course, MIN_NAME_LENGTH)?;

    owned_student(&state, &teacher, id).await?;

    let student = state
        .db
        .update_student(
            id,
            StudentChanges {
                name: request.name.trim().to_string(),
                course: request.course.trim().to_string(),
                dob: request.dob,
            },
        )
        .await?
        .ok_or_else(|| ApiError::NotFound("student not found".to_string()))?;

    info!("Teacher {} updated student {}", teacher.id, id);

    Ok(Json(student.into()))
}

/// DELETE /students/{id}
async fn delete_student(
    Extension(teacher): Extension<AuthUser>,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    owned_student(&state, &teacher, id).await?;

    if !state.db.delete_student(id).await? {
        return Err(ApiError::NotFound("student not found".to_string()));
    }

    info!("Teacher {} deleted student {}", teacher.id, id);

    Ok(Json(MessageResponse::new("student deleted successfully")))
}

/// Create student routes, guarded for teachers
pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/students/add", post(add_student))
        .route("/students/my-students", get(my_students))
        .route("/students/{id}", put(update_student).delete(delete_student))
        .route_layer(middleware::from_fn_with_state(
            state.tokens.clone(),
            require_role::<TeacherOnly>,
        ))
}
