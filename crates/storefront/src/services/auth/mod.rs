//! Authentication and account service.
//!
//! Registers, authenticates, and logs out users against the credential
//! store, and owns the session-slot reconciliation rules for profile edits
//! and deletions.
//!
//! # Policy decisions
//!
//! The source system shipped two divergent auth implementations; this
//! service implements one reconciled policy (recorded in DESIGN.md):
//!
//! - **Login identifier**: email or display name, compared
//!   case-insensitively.
//! - **Password at rest**: reversible base64 encoding with a
//!   backward-compatible plaintext fallback; legacy plaintext records are
//!   re-encoded transparently on the next successful login.
//! - **Administrator access**: there is no credential override inside
//!   `login`. The built-in admin account is provisioned by an explicit
//!   [`AuthService::seed_admin`] bootstrap step run once at initialization.

mod error;

pub use error::AuthError;

use chrono::Utc;
use secrecy::{ExposeSecret, SecretString};
use tracing::instrument;
use uuid::Uuid;

use uwinfly_core::{Email, Role, StoredPassword, UserId};

use crate::models::{SessionUser, User};
use crate::store::{CredentialStore, StorageBackend, StorageError};

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Outcome of an access check for a protected view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessCheck {
    /// Access granted; render the view.
    Granted,
    /// Nobody is logged in; redirect to the login page (relative to the
    /// zone the caller is in).
    LoginRequired,
    /// Logged in, but the zone requires admin and the user is not one;
    /// redirect away.
    Forbidden,
}

impl AccessCheck {
    /// Whether the caller may proceed.
    #[must_use]
    pub const fn is_granted(self) -> bool {
        matches!(self, Self::Granted)
    }
}

/// The built-in administrator account, created at initialization.
#[derive(Debug, Clone)]
pub struct AdminSeed {
    /// Display name, also the conventional login identifier (`admin`).
    pub name: String,
    /// Seed account email.
    pub email: Email,
    /// Seed account password.
    pub password: SecretString,
}

/// Authentication service.
///
/// Handles registration, login/logout, session reads, access gating, and
/// account management (the admin-zone edit/delete flows).
pub struct AuthService<'a> {
    store: CredentialStore<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service over `backend`.
    #[must_use]
    pub const fn new(backend: &'a dyn StorageBackend) -> Self {
        Self {
            store: CredentialStore::new(backend),
        }
    }

    // =========================================================================
    // Registration & Login
    // =========================================================================

    /// Register a new user.
    ///
    /// Appends a `Role::User` record with a generated ID and an encoded
    /// password. Does NOT log the user in.
    ///
    /// # Errors
    ///
    /// - `AuthError::EmptyName` / `AuthError::InvalidEmail` on bad input
    /// - `AuthError::DuplicateEmail` if the normalized email is taken
    /// - `AuthError::WeakPassword` if the password is under 8 characters
    /// - `AuthError::Storage` if the store cannot be read or written
    #[instrument(skip_all, fields(email = %email))]
    pub fn register(&self, name: &str, email: &str, password: &str) -> Result<User, AuthError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AuthError::EmptyName);
        }

        let email = Email::parse(email.trim())?;
        validate_password(password)?;

        let mut users = self.store.list_users()?;
        if users.iter().any(|u| u.email.matches(email.as_str())) {
            return Err(AuthError::DuplicateEmail);
        }

        let user = User {
            id: UserId::new(Uuid::new_v4().to_string()),
            name: name.to_owned(),
            email,
            password: StoredPassword::encode(password),
            role: Role::User,
            created_at: Utc::now(),
            cart: Vec::new(),
        };

        users.push(user.clone());
        self.store.save_users(&users)?;

        tracing::info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    /// Log in with an email or display name.
    ///
    /// On success the sanitized user is copied into the session slot and
    /// returned. A legacy plaintext password record is re-encoded in place.
    /// On failure the session slot is left untouched.
    ///
    /// # Errors
    ///
    /// - `AuthError::InvalidCredentials` for any identifier/password
    ///   mismatch (never distinguishes the two)
    /// - `AuthError::Storage` if the store cannot be read or written
    #[instrument(skip_all)]
    pub fn login(&self, identifier: &str, password: &str) -> Result<SessionUser, AuthError> {
        let mut users = self.store.list_users()?;

        let Some(index) = users
            .iter()
            .position(|u| u.matches_identifier(identifier.trim()))
        else {
            return Err(AuthError::InvalidCredentials);
        };

        let user = users.get_mut(index).ok_or(AuthError::InvalidCredentials)?;
        if !user.password.matches(password) {
            return Err(AuthError::InvalidCredentials);
        }

        // Records written before encoding existed store the password
        // verbatim; upgrade them now that we have the plaintext in hand.
        if user.password.is_legacy_plaintext(password) {
            user.password = StoredPassword::encode(password);
            let session = user.sanitized();
            self.store.save_users(&users)?;
            self.store.set_session(Some(&session))?;
            tracing::info!(user_id = %session.id, "login ok (password re-encoded)");
            return Ok(session);
        }

        let session = user.sanitized();
        self.store.set_session(Some(&session))?;
        tracing::info!(user_id = %session.id, "login ok");
        Ok(session)
    }

    /// Clear the session slot. Idempotent; succeeds whether or not anyone
    /// is logged in.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Unavailable` if the store cannot be written.
    pub fn logout(&self) -> Result<(), StorageError> {
        self.store.set_session(None)
    }

    // =========================================================================
    // Session reads
    // =========================================================================

    /// The currently logged-in user, if any.
    ///
    /// # Errors
    ///
    /// Propagates storage read/parse failures.
    pub fn current_user(&self) -> Result<Option<SessionUser>, StorageError> {
        self.store.get_session()
    }

    /// Whether anyone is logged in.
    ///
    /// # Errors
    ///
    /// Propagates storage read/parse failures.
    pub fn is_logged_in(&self) -> Result<bool, StorageError> {
        Ok(self.current_user()?.is_some())
    }

    /// Whether the logged-in user has the admin role.
    ///
    /// # Errors
    ///
    /// Propagates storage read/parse failures.
    pub fn is_admin(&self) -> Result<bool, StorageError> {
        Ok(self
            .current_user()?
            .is_some_and(|user| user.role.is_admin()))
    }

    /// Gate used before rendering a protected view. Reads only; never
    /// mutates state.
    ///
    /// # Errors
    ///
    /// Propagates storage read/parse failures.
    pub fn require_auth(&self, admin_zone: bool) -> Result<AccessCheck, StorageError> {
        match self.current_user()? {
            None => Ok(AccessCheck::LoginRequired),
            Some(user) if admin_zone && !user.role.is_admin() => Ok(AccessCheck::Forbidden),
            Some(_) => Ok(AccessCheck::Granted),
        }
    }

    // =========================================================================
    // Admin bootstrap
    // =========================================================================

    /// Provision the built-in administrator account.
    ///
    /// Run once at system initialization, in place of the credential
    /// override the source system buried inside its login path. If a record
    /// already matches the seed identity (by email or name), it is promoted
    /// to admin and its password reset to the seed password; otherwise a
    /// fresh admin record is appended. After seeding, logging in with the
    /// seed name and password always yields an admin session.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the store cannot be read or written.
    #[instrument(skip_all, fields(email = %seed.email))]
    pub fn seed_admin(&self, seed: &AdminSeed) -> Result<(), AuthError> {
        let mut users = self.store.list_users()?;

        if let Some(user) = users.iter_mut().find(|u| {
            u.email.matches(seed.email.as_str()) || u.name.eq_ignore_ascii_case(&seed.name)
        }) {
            let password = StoredPassword::encode(seed.password.expose_secret());
            if user.role.is_admin() && user.password == password {
                return Ok(());
            }
            user.role = Role::Admin;
            user.password = password;
            self.store.save_users(&users)?;
            tracing::info!("existing record promoted to admin");
            return Ok(());
        }

        users.push(User {
            id: UserId::new(Uuid::new_v4().to_string()),
            name: seed.name.clone(),
            email: seed.email.clone(),
            password: StoredPassword::encode(seed.password.expose_secret()),
            role: Role::Admin,
            created_at: Utc::now(),
            cart: Vec::new(),
        });
        self.store.save_users(&users)?;
        tracing::info!("admin account seeded");
        Ok(())
    }

    // =========================================================================
    // Account management (admin-zone edit/delete flows)
    // =========================================================================

    /// Update a user's profile.
    ///
    /// If the edited user is the one in the session slot, the slot is
    /// rewritten from the updated record so the session copy cannot go
    /// stale.
    ///
    /// # Errors
    ///
    /// - `AuthError::UserNotFound` if `id` is unknown
    /// - `AuthError::EmptyName` / `AuthError::InvalidEmail` on bad input
    /// - `AuthError::DuplicateEmail` if the new email collides with
    ///   another user
    /// - `AuthError::WeakPassword` if a replacement password is under 8
    ///   characters
    /// - `AuthError::Storage` if the store cannot be read or written
    #[instrument(skip_all, fields(user_id = %id))]
    pub fn update_user(
        &self,
        id: &UserId,
        name: &str,
        email: &str,
        new_password: Option<&str>,
    ) -> Result<User, AuthError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AuthError::EmptyName);
        }
        let email = Email::parse(email.trim())?;

        let mut users = self.store.list_users()?;
        let index = users
            .iter()
            .position(|u| &u.id == id)
            .ok_or(AuthError::UserNotFound)?;

        let taken = users
            .iter()
            .enumerate()
            .any(|(i, u)| i != index && u.email.matches(email.as_str()));
        if taken {
            return Err(AuthError::DuplicateEmail);
        }

        let user = users.get_mut(index).ok_or(AuthError::UserNotFound)?;
        user.name = name.to_owned();
        user.email = email;
        if let Some(password) = new_password {
            validate_password(password)?;
            user.password = StoredPassword::encode(password);
        }
        let updated = user.clone();

        self.store.save_users(&users)?;

        // Explicit reconciliation: the session slot is a copy and does not
        // follow the durable record on its own.
        if let Some(session) = self.store.get_session()? {
            if session.id == updated.id {
                self.store.set_session(Some(&updated.sanitized()))?;
            }
        }

        Ok(updated)
    }

    /// Delete a user record.
    ///
    /// Deleting the currently-logged-in user clears the session slot
    /// immediately: `current_user()` observes `None` right after.
    ///
    /// # Errors
    ///
    /// - `AuthError::UserNotFound` if `id` is unknown
    /// - `AuthError::Storage` if the store cannot be read or written
    #[instrument(skip_all, fields(user_id = %id))]
    pub fn delete_user(&self, id: &UserId) -> Result<(), AuthError> {
        let mut users = self.store.list_users()?;
        let index = users
            .iter()
            .position(|u| &u.id == id)
            .ok_or(AuthError::UserNotFound)?;
        let removed = users.remove(index);

        self.store.save_users(&users)?;

        if let Some(session) = self.store.get_session()? {
            if session.id == removed.id {
                self.store.set_session(None)?;
            }
        }

        tracing::info!("user deleted");
        Ok(())
    }
}

fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword);
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn seed() -> AdminSeed {
        AdminSeed {
            name: "admin".to_owned(),
            email: Email::parse("admin@uwinfly.id").unwrap(),
            password: SecretString::from("admin"),
        }
    }

    #[test]
    fn test_register_then_login_roundtrip() {
        let backend = MemoryStore::new();
        let auth = AuthService::new(&backend);

        auth.register("Dina", "dina@x.com", "password1").unwrap();
        // registration does not log in
        assert!(!auth.is_logged_in().unwrap());

        let session = auth.login("dina@x.com", "password1").unwrap();
        assert_eq!(session.name, "Dina");
        assert_eq!(session.email.as_str(), "dina@x.com");
        assert_eq!(session.role, Role::User);
        assert!(auth.is_logged_in().unwrap());
    }

    #[test]
    fn test_login_by_display_name() {
        let backend = MemoryStore::new();
        let auth = AuthService::new(&backend);
        auth.register("Dina", "dina@x.com", "password1").unwrap();

        assert!(auth.login("dina", "password1").is_ok());
        assert!(auth.login("DINA", "password1").is_ok());
    }

    #[test]
    fn test_duplicate_email_is_case_insensitive() {
        let backend = MemoryStore::new();
        let auth = AuthService::new(&backend);
        auth.register("A", "a@b.com", "password1").unwrap();

        assert!(matches!(
            auth.register("B", "A@B.COM", "password2"),
            Err(AuthError::DuplicateEmail)
        ));
    }

    #[test]
    fn test_weak_password_boundary() {
        let backend = MemoryStore::new();
        let auth = AuthService::new(&backend);

        assert!(matches!(
            auth.register("A", "a@b.com", "short"),
            Err(AuthError::WeakPassword)
        ));
        assert!(matches!(
            auth.register("A", "a@b.com", "1234567"),
            Err(AuthError::WeakPassword)
        ));
        // exactly 8 characters succeeds
        assert!(auth.register("A", "a@b.com", "12345678").is_ok());
    }

    #[test]
    fn test_failed_login_leaves_session_untouched() {
        let backend = MemoryStore::new();
        let auth = AuthService::new(&backend);
        auth.register("Dina", "dina@x.com", "password1").unwrap();
        auth.login("dina@x.com", "password1").unwrap();

        assert!(matches!(
            auth.login("nonexistent@x.com", "whatever"),
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            auth.login("dina@x.com", "wrongpass"),
            Err(AuthError::InvalidCredentials)
        ));
        // prior session still intact
        assert_eq!(auth.current_user().unwrap().unwrap().name, "Dina");
    }

    #[test]
    fn test_logout_is_idempotent() {
        let backend = MemoryStore::new();
        let auth = AuthService::new(&backend);
        auth.logout().unwrap();
        auth.register("Dina", "dina@x.com", "password1").unwrap();
        auth.login("dina@x.com", "password1").unwrap();
        auth.logout().unwrap();
        auth.logout().unwrap();
        assert!(!auth.is_logged_in().unwrap());
    }

    #[test]
    fn test_legacy_plaintext_is_reencoded_on_login() {
        let backend = MemoryStore::new();
        let auth = AuthService::new(&backend);
        let mut user = auth.register("Dina", "dina@x.com", "password1").unwrap();

        // Rewrite the record as an old plaintext one
        user.password = StoredPassword::from_stored("password1");
        CredentialStore::new(&backend).save_users(&[user]).unwrap();

        auth.login("dina@x.com", "password1").unwrap();

        let stored = CredentialStore::new(&backend).list_users().unwrap();
        let password = &stored.first().unwrap().password;
        assert!(!password.is_legacy_plaintext("password1"));
        assert!(password.matches("password1"));
    }

    #[test]
    fn test_seeded_admin_login() {
        let backend = MemoryStore::new();
        let auth = AuthService::new(&backend);
        auth.seed_admin(&seed()).unwrap();

        let session = auth.login("admin", "admin").unwrap();
        assert_eq!(session.role, Role::Admin);
        assert!(auth.is_admin().unwrap());
    }

    #[test]
    fn test_seed_promotes_existing_record() {
        let backend = MemoryStore::new();
        let auth = AuthService::new(&backend);
        // someone grabbed the admin name first
        auth.register("admin", "other@x.com", "longenough").unwrap();

        auth.seed_admin(&seed()).unwrap();
        let session = auth.login("admin", "admin").unwrap();
        assert_eq!(session.role, Role::Admin);
    }

    #[test]
    fn test_seed_is_idempotent() {
        let backend = MemoryStore::new();
        let auth = AuthService::new(&backend);
        auth.seed_admin(&seed()).unwrap();
        auth.seed_admin(&seed()).unwrap();

        let users = CredentialStore::new(&backend).list_users().unwrap();
        assert_eq!(users.len(), 1);
    }

    #[test]
    fn test_require_auth_gating() {
        let backend = MemoryStore::new();
        let auth = AuthService::new(&backend);

        assert_eq!(auth.require_auth(false).unwrap(), AccessCheck::LoginRequired);
        assert_eq!(auth.require_auth(true).unwrap(), AccessCheck::LoginRequired);

        auth.register("Dina", "dina@x.com", "password1").unwrap();
        auth.login("dina@x.com", "password1").unwrap();
        assert_eq!(auth.require_auth(false).unwrap(), AccessCheck::Granted);
        assert_eq!(auth.require_auth(true).unwrap(), AccessCheck::Forbidden);

        auth.seed_admin(&seed()).unwrap();
        auth.login("admin", "admin").unwrap();
        assert!(auth.require_auth(true).unwrap().is_granted());
    }

    #[test]
    fn test_update_user_reconciles_session() {
        let backend = MemoryStore::new();
        let auth = AuthService::new(&backend);
        let user = auth.register("Dina", "dina@x.com", "password1").unwrap();
        auth.login("dina@x.com", "password1").unwrap();

        auth.update_user(&user.id, "Dina R.", "dina@x.com", None)
            .unwrap();
        assert_eq!(auth.current_user().unwrap().unwrap().name, "Dina R.");
    }

    #[test]
    fn test_update_user_rejects_taken_email() {
        let backend = MemoryStore::new();
        let auth = AuthService::new(&backend);
        auth.register("A", "a@x.com", "password1").unwrap();
        let b = auth.register("B", "b@x.com", "password1").unwrap();

        assert!(matches!(
            auth.update_user(&b.id, "B", "A@X.COM", None),
            Err(AuthError::DuplicateEmail)
        ));
    }

    #[test]
    fn test_delete_logged_in_user_clears_session() {
        let backend = MemoryStore::new();
        let auth = AuthService::new(&backend);
        let user = auth.register("Dina", "dina@x.com", "password1").unwrap();
        auth.login("dina@x.com", "password1").unwrap();

        auth.delete_user(&user.id).unwrap();
        assert!(auth.current_user().unwrap().is_none());
    }

    #[test]
    fn test_delete_other_user_keeps_session() {
        let backend = MemoryStore::new();
        let auth = AuthService::new(&backend);
        let a = auth.register("A", "a@x.com", "password1").unwrap();
        auth.register("B", "b@x.com", "password1").unwrap();
        auth.login("b@x.com", "password1").unwrap();

        auth.delete_user(&a.id).unwrap();
        assert_eq!(auth.current_user().unwrap().unwrap().name, "B");
        assert!(matches!(
            auth.delete_user(&a.id),
            Err(AuthError::UserNotFound)
        ));
    }
}
