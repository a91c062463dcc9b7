//! Classroom Authentication and Authorization
//!
//! This crate provides JWT identity tokens, Argon2 password handling and
//! the role guards that sit in front of the teacher and student routes.

pub mod error;
pub mod jwt;
pub mod middleware;
pub mod password;

pub use error::AuthError;
pub use jwt::{Claims, TOKEN_TTL_SECS, TokenService};
pub use middleware::{AuthUser, RoleGuard, StudentOnly, TeacherOnly, authenticate, require_role};
pub use password::{
    DUMMY_HASH, GENERATED_PASSWORD_LENGTH, generate_password, hash_password, verify_password,
};
