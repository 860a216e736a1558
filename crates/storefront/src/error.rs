//! Unified error handling.
//!
//! Services return their own error enums; `AppError` is the one type the
//! view layer deals with. It flattens every failure to an [`ErrorKind`] so
//! the localized message catalog in [`crate::messages`] can translate it,
//! and it marks storage failures as fatal-for-the-operation. Nothing in
//! this crate panics across a service boundary.

use thiserror::Error;

use crate::catalog::CatalogError;
use crate::services::auth::AuthError;
use crate::services::cart::CartError;
use crate::services::checkout::CheckoutError;
use crate::store::StorageError;

/// Application-level error type for the storefront core.
#[derive(Debug, Error)]
pub enum AppError {
    /// Authentication or account operation failed.
    #[error("auth error: {0}")]
    Auth(#[from] AuthError),

    /// Cart operation failed.
    #[error("cart error: {0}")]
    Cart(#[from] CartError),

    /// Checkout operation failed.
    #[error("checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Catalog could not be loaded.
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// The backing store failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Flat error classification, the key into the message catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    DuplicateEmail,
    WeakPassword,
    InvalidEmail,
    EmptyName,
    InvalidCredentials,
    NotAuthenticated,
    OutOfStock,
    ProductNotFound,
    EmptyCart,
    OrderNotFound,
    UserNotFound,
    CatalogUnavailable,
    StorageUnavailable,
}

impl AppError {
    /// Classify this error, looking through the service nesting.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Auth(e) => auth_kind(e),
            Self::Cart(e) => cart_kind(e),
            Self::Checkout(e) => match e {
                CheckoutError::EmptyCart => ErrorKind::EmptyCart,
                CheckoutError::OrderNotFound => ErrorKind::OrderNotFound,
                CheckoutError::Cart(inner) => cart_kind(inner),
                CheckoutError::Storage(_) => ErrorKind::StorageUnavailable,
            },
            Self::Catalog(_) => ErrorKind::CatalogUnavailable,
            Self::Storage(_) => ErrorKind::StorageUnavailable,
        }
    }

    /// Whether the failed operation cannot be retried meaningfully.
    ///
    /// Only storage failures qualify: the operation is aborted and surfaced,
    /// but the process keeps running.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self.kind(), ErrorKind::StorageUnavailable)
    }

    /// The localized user-facing message for this error.
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        crate::messages::for_kind(self.kind())
    }
}

const fn auth_kind(e: &AuthError) -> ErrorKind {
    match e {
        AuthError::InvalidEmail(_) => ErrorKind::InvalidEmail,
        AuthError::EmptyName => ErrorKind::EmptyName,
        AuthError::DuplicateEmail => ErrorKind::DuplicateEmail,
        AuthError::WeakPassword => ErrorKind::WeakPassword,
        AuthError::InvalidCredentials => ErrorKind::InvalidCredentials,
        AuthError::UserNotFound => ErrorKind::UserNotFound,
        AuthError::Storage(_) => ErrorKind::StorageUnavailable,
    }
}

const fn cart_kind(e: &CartError) -> ErrorKind {
    match e {
        CartError::NotAuthenticated => ErrorKind::NotAuthenticated,
        CartError::UserNotFound => ErrorKind::UserNotFound,
        CartError::ProductNotFound => ErrorKind::ProductNotFound,
        CartError::OutOfStock => ErrorKind::OutOfStock,
        CartError::Storage(_) => ErrorKind::StorageUnavailable,
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
