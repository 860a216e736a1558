//! Checkout and payment confirmation.
//!
//! Checkout snapshots the cart into a pending order in the ledger; payment
//! confirmation transitions it to paid and then clears the cart. The two
//! effects are deliberately not atomic and are ordered mark-paid-first: if
//! the cart clear fails, the paid-order record is already durable and only
//! the clear is lost.

use chrono::Utc;
use rand::Rng;
use thiserror::Error;
use tracing::instrument;

use uwinfly_core::{OrderId, OrderStatus, Rupiah};

use crate::catalog::Catalog;
use crate::models::Order;
use crate::services::cart::{CartError, CartService};
use crate::store::{CredentialStore, OrderLedger, StorageBackend, StorageError};

/// Length of the human-readable payment reference code.
const REF_NUMBER_LEN: usize = 9;

const REF_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Errors that can occur during checkout operations.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Checkout was attempted with an empty cart.
    #[error("cart is empty")]
    EmptyCart,

    /// No order carries the given reference number.
    #[error("order not found")]
    OrderNotFound,

    /// Cart access failed.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// The backing store failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Checkout service: order creation and payment confirmation.
pub struct CheckoutService<'a> {
    backend: &'a dyn StorageBackend,
    catalog: &'a Catalog,
}

impl<'a> CheckoutService<'a> {
    /// Create a checkout service over `backend`, pricing against `catalog`.
    #[must_use]
    pub const fn new(backend: &'a dyn StorageBackend, catalog: &'a Catalog) -> Self {
        Self { backend, catalog }
    }

    /// Begin checkout: snapshot the current cart into a pending order and
    /// append it to the ledger.
    ///
    /// `user_id` is taken from the session slot and is `None` when the
    /// session was lost mid-checkout (the order still goes through).
    /// Reference-code uniqueness among pending orders is probabilistic;
    /// accepted limitation of the generation scheme.
    ///
    /// # Errors
    ///
    /// - `CheckoutError::EmptyCart` if there is nothing to buy
    /// - `CheckoutError::Storage` if the store cannot be read or written
    #[instrument(skip(self))]
    pub fn begin_checkout(&self) -> Result<Order, CheckoutError> {
        let cart_service = CartService::new(self.backend, self.catalog);
        let items = cart_service.get_cart()?;
        if items.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let total = cart_service.total(&items);
        let user_id = CredentialStore::new(self.backend)
            .get_session()?
            .map(|session| session.id);

        let order = Order {
            id: OrderId::new(format!("order_{}", Utc::now().timestamp_millis())),
            ref_number: generate_ref_number(),
            user_id,
            items,
            total,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
            paid_at: None,
        };

        OrderLedger::new(self.backend).append(order.clone())?;
        tracing::info!(order_id = %order.id, ref_number = %order.ref_number, total = %order.total, "order created");
        Ok(order)
    }

    /// Transition an order from pending to paid and set `paidAt`.
    ///
    /// Re-confirming an already-paid order is an idempotent no-op: the
    /// order is returned unchanged and `paidAt` keeps its original value.
    ///
    /// # Errors
    ///
    /// - `CheckoutError::OrderNotFound` for an unknown reference
    /// - `CheckoutError::Storage` if the store cannot be read or written
    #[instrument(skip(self))]
    pub fn mark_paid(&self, ref_number: &str) -> Result<Order, CheckoutError> {
        let ledger = OrderLedger::new(self.backend);
        let mut orders = ledger.list_orders()?;

        let order = orders
            .iter_mut()
            .find(|o| o.ref_number == ref_number)
            .ok_or(CheckoutError::OrderNotFound)?;

        if order.is_paid() {
            return Ok(order.clone());
        }

        order.status = OrderStatus::Paid;
        order.paid_at = Some(Utc::now());
        let paid = order.clone();

        ledger.save_orders(&orders)?;
        tracing::info!(order_id = %paid.id, "order marked paid");
        Ok(paid)
    }

    /// Confirm payment: mark the order paid, THEN clear the acting user's
    /// cart. The paid-order write lands first, so a cart-clear failure
    /// never loses the payment record (it is still surfaced to the
    /// caller).
    ///
    /// # Errors
    ///
    /// Same as [`Self::mark_paid`], plus cart/storage failures from the
    /// clear step.
    #[instrument(skip(self))]
    pub fn confirm_payment(&self, ref_number: &str) -> Result<Order, CheckoutError> {
        let order = self.mark_paid(ref_number)?;

        match CartService::new(self.backend, self.catalog).clear() {
            // Session lost after checkout began; there is no cart to clear.
            Ok(_) | Err(CartError::NotAuthenticated | CartError::UserNotFound) => Ok(order),
            Err(e) => Err(e.into()),
        }
    }

    /// The fake EMV-style QRIS payload rendered into the checkout QR code.
    /// Display-only; nothing parses it back.
    #[must_use]
    pub fn qris_payload(total: Rupiah) -> String {
        let millis = Utc::now().timestamp_millis().to_string();
        let suffix = millis
            .get(millis.len().saturating_sub(6)..)
            .unwrap_or(&millis);
        let checksum: String = {
            let mut rng = rand::rng();
            (0..4)
                .map(|_| {
                    let digit = rng.random_range(0..16_u32);
                    char::from_digit(digit, 16)
                        .unwrap_or('0')
                        .to_ascii_uppercase()
                })
                .collect()
        };
        format!(
            "00020126360014br.gov.bcb.brcode0136123456789{suffix}5204481153039651065407{:0>10}6304{checksum}",
            total.as_i64()
        )
    }
}

/// 9-character uppercase alphanumeric reference code.
fn generate_ref_number() -> String {
    let mut rng = rand::rng();
    (0..REF_NUMBER_LEN)
        .map(|_| {
            let index = rng.random_range(0..REF_ALPHABET.len());
            char::from(*REF_ALPHABET.get(index).unwrap_or(&b'0'))
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::Product;
    use crate::services::auth::AuthService;
    use crate::store::MemoryStore;
    use uwinfly_core::{ProductId, StockStatus};

    fn catalog() -> Catalog {
        Catalog::from_products(vec![Product {
            id: ProductId::new(7),
            name: "Uwinfly T3 Pro".to_owned(),
            category: "Sepeda Listrik".to_owned(),
            description: String::new(),
            price: Rupiah::new(4_500_000),
            image: String::new(),
            stock: StockStatus::Available,
            rating: 4.8,
            sold: 1200,
            link: String::new(),
        }])
    }

    fn login_and_fill_cart(backend: &MemoryStore, catalog: &Catalog) {
        let auth = AuthService::new(backend);
        auth.register("Dina", "dina@x.com", "password1").unwrap();
        auth.login("dina@x.com", "password1").unwrap();
        let cart = CartService::new(backend, catalog);
        cart.add_item(ProductId::new(7), 1).unwrap();
        cart.add_item(ProductId::new(7), 1).unwrap();
    }

    #[test]
    fn test_empty_cart_cannot_checkout() {
        let backend = MemoryStore::new();
        let catalog = catalog();
        let checkout = CheckoutService::new(&backend, &catalog);
        assert!(matches!(
            checkout.begin_checkout(),
            Err(CheckoutError::EmptyCart)
        ));
    }

    #[test]
    fn test_checkout_snapshots_cart_and_total() {
        let backend = MemoryStore::new();
        let catalog = catalog();
        login_and_fill_cart(&backend, &catalog);

        let checkout = CheckoutService::new(&backend, &catalog);
        let order = checkout.begin_checkout().unwrap();

        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.total, Rupiah::new(9_000_000));
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.ref_number.len(), REF_NUMBER_LEN);
        assert!(order.user_id.is_some());
        assert!(order.id.as_str().starts_with("order_"));

        // the order is a snapshot: later cart changes do not touch it
        CartService::new(&backend, &catalog)
            .remove_item(ProductId::new(7))
            .unwrap();
        let stored = OrderLedger::new(&backend)
            .find_by_ref(&order.ref_number)
            .unwrap()
            .unwrap();
        assert_eq!(stored.items, order.items);
    }

    #[test]
    fn test_confirm_payment_marks_paid_then_clears_cart() {
        let backend = MemoryStore::new();
        let catalog = catalog();
        login_and_fill_cart(&backend, &catalog);

        let checkout = CheckoutService::new(&backend, &catalog);
        let order = checkout.begin_checkout().unwrap();
        let paid = checkout.confirm_payment(&order.ref_number).unwrap();

        assert_eq!(paid.status, OrderStatus::Paid);
        assert!(paid.paid_at.is_some());
        assert!(
            CartService::new(&backend, &catalog)
                .get_cart()
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn test_mark_paid_unknown_ref() {
        let backend = MemoryStore::new();
        let catalog = catalog();
        let checkout = CheckoutService::new(&backend, &catalog);
        assert!(matches!(
            checkout.mark_paid("NOSUCHREF"),
            Err(CheckoutError::OrderNotFound)
        ));
    }

    #[test]
    fn test_double_confirm_is_idempotent() {
        let backend = MemoryStore::new();
        let catalog = catalog();
        login_and_fill_cart(&backend, &catalog);

        let checkout = CheckoutService::new(&backend, &catalog);
        let order = checkout.begin_checkout().unwrap();

        let first = checkout.confirm_payment(&order.ref_number).unwrap();
        let second = checkout.confirm_payment(&order.ref_number).unwrap();

        assert_eq!(second.status, OrderStatus::Paid);
        // paidAt keeps its original value
        assert_eq!(second.paid_at, first.paid_at);
    }

    #[test]
    fn test_checkout_without_session_keeps_null_user() {
        let backend = MemoryStore::new();
        let catalog = catalog();
        login_and_fill_cart(&backend, &catalog);

        // session evaporates between cart fill and checkout: cart reads
        // come back empty, so checkout is refused
        AuthService::new(&backend).logout().unwrap();
        let checkout = CheckoutService::new(&backend, &catalog);
        assert!(matches!(
            checkout.begin_checkout(),
            Err(CheckoutError::EmptyCart)
        ));
    }

    #[test]
    fn test_qris_payload_shape() {
        let payload = CheckoutService::qris_payload(Rupiah::new(9_000_000));
        assert!(payload.starts_with("00020126360014br.gov.bcb.brcode"));
        assert!(payload.contains("0009000000"));
    }

    #[test]
    fn test_ref_numbers_are_uppercase_alphanumeric() {
        let r = generate_ref_number();
        assert_eq!(r.len(), REF_NUMBER_LEN);
        assert!(
            r.chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        );
    }
}
