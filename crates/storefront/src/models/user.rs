//! User and session record types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use uwinfly_core::{Email, ProductId, Role, StoredPassword, UserId};

/// A durable user record, the authoritative representation of a registered
/// user in the users collection.
///
/// Invariants: at most one record per normalized email; `id` is immutable
/// once assigned. The cart lives here and only here - the session record
/// derives its cart view by looking this record up, so there is no second
/// copy to drift out of sync.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Opaque unique ID, generated at registration.
    pub id: UserId,
    /// Display name. Also usable as a login identifier.
    pub name: String,
    /// Email address, unique by normalized form.
    pub email: Email,
    /// Password at rest (see `StoredPassword` for the comparison rules).
    pub password: StoredPassword,
    /// Role; records written before roles existed deserialize as `User`.
    #[serde(default)]
    pub role: Role,
    /// When the user registered.
    pub created_at: DateTime<Utc>,
    /// Shopping cart. Older records omit the field entirely; it
    /// deserializes as empty, never as "missing".
    #[serde(default)]
    pub cart: Vec<CartItem>,
}

impl User {
    /// The sanitized copy placed in the session slot.
    #[must_use]
    pub fn sanitized(&self) -> SessionUser {
        SessionUser {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
            created_at: self.created_at,
        }
    }

    /// Whether `identifier` names this user, by normalized email or
    /// case-insensitive display name.
    #[must_use]
    pub fn matches_identifier(&self, identifier: &str) -> bool {
        self.email.matches(identifier) || self.name.eq_ignore_ascii_case(identifier)
    }
}

/// The session record: a denormalized copy of exactly one user record,
/// minus the password, representing "who is currently logged in".
///
/// It carries no cart either - cart reads resolve the durable record by
/// `id`. The copy can still go stale when the underlying user is edited or
/// deleted; those flows reconcile the slot explicitly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    /// ID of the underlying durable user record.
    pub id: UserId,
    pub name: String,
    pub email: Email,
    #[serde(default)]
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// One cart line: a product reference and a quantity.
///
/// Carts are unique by product and every quantity is at least 1; the cart
/// service maintains both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: ProductId,
    pub quantity: u32,
}

impl CartItem {
    /// Create a cart line.
    #[must_use]
    pub const fn new(product_id: ProductId, quantity: u32) -> Self {
        Self {
            product_id,
            quantity,
        }
    }
}
