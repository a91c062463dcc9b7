//! Student-managed course routes

use axum::{
    Extension, Json, Router,
    extract::State,
    http::StatusCode,
    middleware,
    routing::{get, post, put},
};
use classroom_auth::{AuthUser, StudentOnly, require_role};
use classroom_db::{Course, CourseChanges, CourseFilter, CourseQuery, NewCourse};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::state::AppState;

use super::types::{
    CourseMessageResponse, CourseRequest, CourseResponse, CourseSearchParams, MessageResponse,
};
use super::validation::{validate_non_negative, validate_text};

fn validate_course(request: &CourseRequest) -> Result<(), ApiError> {
    validate_text("Course name", &request.course_name, 1)?;
    validate_non_negative("Course code", request.course_code)?;
    validate_non_negative("Credit hour", request.credit_hour)?;
    Ok(())
}

/// Parse an optional numeric query parameter; empty counts as absent
fn parse_number(field: &str, value: Option<&str>) -> Result<Option<i64>, ApiError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => v
            .parse()
            .map(Some)
            .map_err(|_| ApiError::Validation(format!("{} must be a number", field))),
        None => Ok(None),
    }
}

impl TryFrom<&CourseSearchParams> for CourseQuery {
    type Error = ApiError;

    fn try_from(params: &CourseSearchParams) -> Result<Self, Self::Error> {
        let mut query = CourseQuery::new();

        if let Some(name) = params.course_name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
            query = query.with(CourseFilter::NameContains(name.to_string()));
        }
        if let Some(code) = parse_number("courseCode", params.course_code.as_deref())? {
            query = query.with(CourseFilter::Code(code));
        }
        if let Some(hours) = parse_number("creditHour", params.credit_hour.as_deref())? {
            query = query.with(CourseFilter::CreditHour(hours));
        }

        Ok(query)
    }
}

/// Load a course and require the caller to own it
async fn owned_course(state: &AppState, student: &AuthUser, id: i64) -> Result<Course, ApiError> {
    let course = state
        .db
        .get_course_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Course not found".to_string()))?;

    if course.student_id != student.id {
        debug!("Student {} denied access to course {}", student.id, id);
        return Err(ApiError::Forbidden);
    }

    Ok(course)
}

/// POST /courses/addCourse
async fn add_course(
    Extension(student): Extension<AuthUser>,
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CourseRequest>,
) -> Result<(StatusCode, Json<CourseMessageResponse>), ApiError> {
    validate_course(&request)?;

    // The token can outlive a student record deleted by its teacher
    if state.db.get_student_by_id(student.id).await?.is_none() {
        return Err(ApiError::NotFound("Student not found".to_string()));
    }

    let course = state
        .db
        .insert_course(NewCourse {
            course_name: request.course_name.trim().to_string(),
            course_code: request.course_code,
            credit_hour: request.credit_hour,
            student_id: student.id,
        })
        .await?;

    info!("Student {} added course {}", student.id, course.id);

    Ok((
        StatusCode::CREATED,
        Json(CourseMessageResponse {
            message: "course added successfully".to_string(),
            course: course.into(),
        }),
    ))
}

/// GET /courses/my-courses
async fn my_courses(
    Extension(student): Extension<AuthUser>,
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<CourseSearchParams>,
) -> Result<Json<Vec<CourseResponse>>, ApiError> {
    let query = CourseQuery::try_from(&params)?;

    let courses = state.db.list_courses_for_student(student.id, &query).await?;

    Ok(Json(courses.into_iter().map(CourseResponse::from).collect()))
}

/// PUT /courses/{id}
async fn update_course(
    Extension(student): Extension<AuthUser>,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(request): ApiJson<CourseRequest>,
) -> Result<Json<CourseMessageResponse>, ApiError> {
    validate_course(&request)?;

    owned_course(&state, &student, id).await?;

    let course = state
        .db
        .update_course(
            id,
            CourseChanges {
                course_name: request.course_name.trim().to_string(),
                course_code: request.course_code,
                credit_hour: request.credit_hour,
            },
        )
        .await?
        .ok_or_else(|| ApiError::NotFound("Course not found".to_string()))?;

    info!("Student {} updated course {}", student.id, id);

    Ok(Json(CourseMessageResponse {
        message: "Course updated successfully".to_string(),
        course: course.into(),
    }))
}

/// DELETE /courses/{id}
async fn delete_course(
    Extension(student): Extension<AuthUser>,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    owned_course(&state, &student, id).await?;

    if !state.db.delete_course(id).await? {
        return Err(ApiError::NotFound("Course not found".to_string()));
    }

    info!("Student {} deleted course {}", student.id, id);

    Ok(Json(MessageResponse::new("Course deleted successfully")))
}

/// Create course routes, guarded for students
pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/courses/addCourse", post(add_course))
        .route("/courses/my-courses", get(my_courses))
        .route("/courses/{id}", put(update_course).delete(delete_course))
        .route_layer(middleware::from_fn_with_state(
            state.tokens.clone(),
            require_role::<StudentOnly>,
        ))
}
