//! Role guards for Axum

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use classroom_db::Role;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::error::AuthError;
use crate::jwt::{Claims, TokenService};

/// Verified caller identity, attached to request extensions by the guards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: i64,
    pub role: Role,
}

impl AuthUser {
    /// Create from JWT claims
    pub fn from_claims(claims: &Claims) -> Self {
        Self {
            id: claims.id,
            role: claims.role,
        }
    }
}

/// A guard admitting exactly one role
pub trait RoleGuard: Send + Sync + 'static {
    const ROLE: Role;
}

/// Guard for teacher-only routes
pub struct TeacherOnly;

impl RoleGuard for TeacherOnly {
    const ROLE: Role = Role::Teacher;
}

/// Guard for student-only routes
pub struct StudentOnly;

impl RoleGuard for StudentOnly {
    const ROLE: Role = Role::Student;
}

/// Extract the token from a `Bearer <token>` header value
fn extract_bearer_token(header: &str) -> Result<&str, AuthError> {
    let mut parts = header.split_whitespace();

    let Some(scheme) = parts.next() else {
        return Err(AuthError::MissingToken);
    };
    if !scheme.eq_ignore_ascii_case("Bearer") {
        return Err(AuthError::InvalidAuthHeader);
    }

    parts.next().ok_or(AuthError::MissingToken)
}

/// Authenticate a request's headers and require `required` as the token role
pub fn authenticate(
    headers: &HeaderMap,
    tokens: &TokenService,
    required: Role,
) -> Result<AuthUser, AuthError> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingAuthHeader)?
        .to_str()
        .map_err(|_| AuthError::InvalidAuthHeader)?;

    let token = extract_bearer_token(header)?;
    let claims = tokens.verify(token)?;

    if claims.role != required {
        debug!(
            "Rejected {} token {} on {} route",
            claims.role, claims.id, required
        );
        return Err(AuthError::RoleMismatch { required });
    }

    Ok(AuthUser::from_claims(&claims))
}

/// Role guard middleware
///
/// Validates the bearer token, checks it was issued for `G::ROLE` and adds
/// the `AuthUser` to request extensions before running the handler.
pub async fn require_role<G: RoleGuard>(
    State(tokens): State<Arc<TokenService>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let user = authenticate(request.headers(), &tokens, G::ROLE)?;

    debug!("Authenticated {} {}", user.role, user.id);

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}
