//! Teacher signup and login routes

use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use classroom_auth::{AuthError, DUMMY_HASH, hash_password, verify_password};
use classroom_db::{NewAccount, Role};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::state::AppState;

use super::types::{LoginRequest, LoginResponse, LoginUser, MessageResponse, SignupRequest};
use super::validation::{
    MAX_PASSWORD_LENGTH, MIN_NAME_LENGTH, validate_email, validate_password, validate_text,
};

/// POST /teacher/signup
async fn signup(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<SignupRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    validate_text("First name", &request.first_name, MIN_NAME_LENGTH)?;
    validate_text("Last name", &request.last_name, MIN_NAME_LENGTH)?;
    validate_email(&request.email)?;
    validate_password(&request.password)?;

    debug!("Signup attempt for {}", request.email);

    if state.db.get_account_by_email(&request.email).await?.is_some() {
        return Err(ApiError::DuplicateEmail("Email already exists".to_string()));
    }

    let password_hash = hash_password(&request.password)?;

    let account = state
        .db
        .insert_account(NewAccount {
            first_name: request.first_name.trim().to_string(),
            last_name: request.last_name.trim().to_string(),
            email: request.email,
            password_hash,
        })
        .await?;

    info!("Registered teacher account {}", account.id);

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("User registered successfully")),
    ))
}

/// POST /teacher/login
///
/// Serves both roles: the `role` field selects which credential store the
/// email is looked up in and which role the issued token carries.
async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let role: Role = request
        .role
        .as_deref()
        .and_then(|r| r.parse().ok())
        .ok_or(AuthError::MissingRole)?;

    if request.email.is_empty() || request.password.is_empty() {
        return Err(ApiError::Validation(
            "Email and password are required".to_string(),
        ));
    }
    if request.password.len() > MAX_PASSWORD_LENGTH {
        return Err(ApiError::Validation(format!(
            "Password exceeds maximum length of {} characters",
            MAX_PASSWORD_LENGTH
        )));
    }

    debug!("Login attempt for {} as {}", request.email, role);

    // (id, email, password hash) of the matching record, if any
    let record = match role {
        Role::Teacher => state
            .db
            .get_account_by_email(&request.email)
            .await?
            .map(|a| (a.id, a.email, a.password_hash)),
        Role::Student => state
            .db
            .get_student_by_email(&request.email)
            .await?
            .map(|s| (s.id, s.email, s.password_hash)),
    };

    // Verify against a dummy hash when the email is unknown so both
    // failure paths take the same time
    let hash_to_verify = record
        .as_ref()
        .map(|(_, _, hash)| hash.as_str())
        .unwrap_or(DUMMY_HASH);
    let password_valid = verify_password(&request.password, hash_to_verify)?;

    let (id, email) = match (record, password_valid) {
        (Some((id, email, _)), true) => (id, email),
        _ => {
            metrics::counter!("classroom_logins_total", "role" => role.as_str(), "outcome" => "rejected")
                .increment(1);
            return Err(AuthError::InvalidCredentials.into());
        }
    };

    let token = state.tokens.issue(id, role)?;

    metrics::counter!("classroom_logins_total", "role" => role.as_str(), "outcome" => "success")
        .increment(1);
    info!("{} {} logged in", role, id);

    Ok(Json(LoginResponse {
        message: "Successful Login".to_string(),
        token,
        expires_in: state.tokens.ttl_secs(),
        user: LoginUser {
            id,
            email,
            role: role.as_str().to_string(),
        },
    }))
}

/// Create teacher routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/teacher/signup", post(signup))
        .route("/teacher/login", post(login))
}
