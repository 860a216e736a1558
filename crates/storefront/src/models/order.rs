//! Order record type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use uwinfly_core::{OrderId, OrderStatus, Rupiah, UserId};

use super::CartItem;

/// A checkout attempt in the order ledger.
///
/// Orders are immutable snapshots of the cart at checkout time, except for
/// the single `pending -> paid` transition which also sets `paid_at`.
/// They never reference the live cart and are never deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Timestamp-derived ID (`order_{unix_millis}`).
    pub id: OrderId,
    /// Random short code, the lookup key during payment confirmation.
    /// Unique among pending orders only probabilistically; a collision
    /// would confirm the older order first. Accepted limitation.
    pub ref_number: String,
    /// Owning user, or `None` if the session was lost mid-checkout.
    pub user_id: Option<UserId>,
    /// Snapshot of the cart at checkout time.
    pub items: Vec<CartItem>,
    /// Total computed from catalog prices at checkout time.
    pub total: Rupiah,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    /// Set exactly once, on the transition to paid.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Whether this order has been paid.
    #[must_use]
    pub const fn is_paid(&self) -> bool {
        matches!(self.status, OrderStatus::Paid)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use uwinfly_core::ProductId;

    #[test]
    fn test_wire_shape() {
        let order = Order {
            id: OrderId::new("order_1700000000000"),
            ref_number: "A1B2C3D4E".to_owned(),
            user_id: Some(UserId::new("u-1")),
            items: vec![CartItem::new(ProductId::new(7), 2)],
            total: Rupiah::new(9_000_000),
            status: OrderStatus::Pending,
            created_at: Utc::now(),
            paid_at: None,
        };

        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["refNumber"], "A1B2C3D4E");
        assert_eq!(json["status"], "pending");
        assert_eq!(json["total"], 9_000_000);
        // paidAt is absent until the order is paid
        assert!(json.get("paidAt").is_none());
    }

    #[test]
    fn test_null_user_id_roundtrip() {
        let json = r#"{
            "id": "order_1700000000000",
            "refNumber": "A1B2C3D4E",
            "userId": null,
            "items": [],
            "total": 0,
            "status": "pending",
            "createdAt": "2024-01-01T00:00:00Z"
        }"#;
        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.user_id, None);
        assert!(!order.is_paid());
    }
}
