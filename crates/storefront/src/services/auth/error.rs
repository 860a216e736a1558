//! Authentication error types.

use thiserror::Error;

use crate::store::StorageError;

/// Errors that can occur during authentication and account operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] uwinfly_core::EmailError),

    /// The display name is empty.
    #[error("name cannot be empty")]
    EmptyName,

    /// A user with this email (compared case-insensitively) already exists.
    #[error("email already registered")]
    DuplicateEmail,

    /// Password shorter than the minimum length.
    #[error("password must be at least 8 characters")]
    WeakPassword,

    /// Wrong identifier or password.
    ///
    /// Deliberately a single variant: login failures must not reveal
    /// whether the identifier exists.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// No user record with the requested ID.
    #[error("user not found")]
    UserNotFound,

    /// The backing store failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}
