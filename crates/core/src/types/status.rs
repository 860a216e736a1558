//! Status and role enums for persisted records.

use serde::{Deserialize, Serialize};

/// Catalog stock status.
///
/// Maps to the catalog document's `"available"` / `"out_of_stock"` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    #[default]
    Available,
    OutOfStock,
}

impl StockStatus {
    /// Whether a product with this status can be added to a cart.
    #[must_use]
    pub const fn is_available(self) -> bool {
        matches!(self, Self::Available)
    }
}

/// Order payment status.
///
/// The only permitted transition is `Pending` -> `Paid`, performed once
/// during payment confirmation. Orders are never deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Paid,
}

impl OrderStatus {
    /// Whether this order is still awaiting payment.
    #[must_use]
    pub const fn is_pending(self) -> bool {
        matches!(self, Self::Pending)
    }
}

/// User role.
///
/// A single boolean capability: `Admin` grants access to the admin zone,
/// everything else is `User`. Records written before roles existed carry no
/// role field, so deserialization defaults to `User`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    /// Whether this role grants admin-zone access.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}
