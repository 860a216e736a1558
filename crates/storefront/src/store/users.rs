//! Credential store: the users collection and the current-session slot.
//!
//! Pure storage, no business rules. Both records are JSON documents in the
//! shared key-value store; the users collection is always replaced as a
//! whole (the source system never wrote incrementally).

use tracing::instrument;

use crate::models::{SessionUser, User};

use super::{StorageBackend, StorageError, keys};

/// Storage access for users and the session slot.
///
/// Constructed with an explicit backend reference and passed into services
/// (dependency injection); nothing in this crate reaches for ambient global
/// storage.
pub struct CredentialStore<'a> {
    backend: &'a dyn StorageBackend,
}

impl<'a> CredentialStore<'a> {
    /// Create a credential store over `backend`.
    #[must_use]
    pub const fn new(backend: &'a dyn StorageBackend) -> Self {
        Self { backend }
    }

    /// All registered users, in insertion order. Empty if the collection
    /// was never initialized.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Unavailable` if the store cannot be read, or
    /// `StorageError::Corrupt` if the stored collection fails to parse.
    pub fn list_users(&self) -> Result<Vec<User>, StorageError> {
        match self.backend.read(keys::USERS)? {
            Some(raw) => serde_json::from_str(&raw)
                .map_err(|e| StorageError::Corrupt(format!("users collection: {e}"))),
            None => Ok(Vec::new()),
        }
    }

    /// Replace the entire stored user list.
    ///
    /// Whole-collection overwrite: concurrent writers race and the last
    /// writer wins (see the module docs in [`super`]).
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Unavailable` if the store cannot be written.
    #[instrument(skip_all, fields(count = users.len()))]
    pub fn save_users(&self, users: &[User]) -> Result<(), StorageError> {
        let raw = serde_json::to_string(users)
            .map_err(|e| StorageError::Corrupt(format!("users collection: {e}")))?;
        self.backend.write(keys::USERS, &raw)
    }

    /// Look up a single user by ID.
    ///
    /// # Errors
    ///
    /// Propagates read/parse failures from [`Self::list_users`].
    pub fn find_user(&self, id: &uwinfly_core::UserId) -> Result<Option<User>, StorageError> {
        Ok(self.list_users()?.into_iter().find(|u| &u.id == id))
    }

    /// The session copy, or `None` when nobody is logged in.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Unavailable` if the store cannot be read, or
    /// `StorageError::Corrupt` if the slot fails to parse.
    pub fn get_session(&self) -> Result<Option<SessionUser>, StorageError> {
        match self.backend.read(keys::CURRENT_USER)? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| StorageError::Corrupt(format!("session slot: {e}"))),
            None => Ok(None),
        }
    }

    /// Overwrite or clear the session slot.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Unavailable` if the store cannot be written.
    pub fn set_session(&self, session: Option<&SessionUser>) -> Result<(), StorageError> {
        match session {
            Some(user) => {
                let raw = serde_json::to_string(user)
                    .map_err(|e| StorageError::Corrupt(format!("session slot: {e}")))?;
                self.backend.write(keys::CURRENT_USER, &raw)
            }
            None => self.backend.remove(keys::CURRENT_USER),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::Utc;
    use uwinfly_core::{Email, Role, StoredPassword, UserId};

    fn user(id: &str, email: &str) -> User {
        User {
            id: UserId::new(id),
            name: id.to_owned(),
            email: Email::parse(email).unwrap(),
            password: StoredPassword::encode("password1"),
            role: Role::User,
            created_at: Utc::now(),
            cart: Vec::new(),
        }
    }

    #[test]
    fn test_uninitialized_collection_is_empty() {
        let backend = MemoryStore::new();
        let store = CredentialStore::new(&backend);
        assert!(store.list_users().unwrap().is_empty());
        assert!(store.get_session().unwrap().is_none());
    }

    #[test]
    fn test_save_and_list_users() {
        let backend = MemoryStore::new();
        let store = CredentialStore::new(&backend);

        let users = vec![user("a", "a@x.com"), user("b", "b@x.com")];
        store.save_users(&users).unwrap();

        let listed = store.list_users().unwrap();
        assert_eq!(listed, users);
        assert_eq!(
            store.find_user(&UserId::new("b")).unwrap().unwrap().id,
            UserId::new("b")
        );
        assert!(store.find_user(&UserId::new("c")).unwrap().is_none());
    }

    #[test]
    fn test_session_slot_set_and_clear() {
        let backend = MemoryStore::new();
        let store = CredentialStore::new(&backend);

        let session = user("a", "a@x.com").sanitized();
        store.set_session(Some(&session)).unwrap();
        assert_eq!(store.get_session().unwrap().unwrap(), session);

        store.set_session(None).unwrap();
        assert!(store.get_session().unwrap().is_none());
        // clearing twice is fine
        store.set_session(None).unwrap();
    }

    #[test]
    fn test_corrupt_collection_is_surfaced() {
        let backend = MemoryStore::new();
        backend.write(keys::USERS, "{not json").unwrap();

        let store = CredentialStore::new(&backend);
        assert!(matches!(
            store.list_users(),
            Err(StorageError::Corrupt(_))
        ));
    }
}
