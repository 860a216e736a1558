//! Cart service.
//!
//! All cart state lives in the durable user record (single source of
//! truth); the session slot only identifies whose record to read. Every
//! mutation is a read-modify-write of the users collection followed by a
//! UI refresh notification.

use thiserror::Error;
use tracing::instrument;

use uwinfly_core::{ProductId, Rupiah};

use crate::catalog::Catalog;
use crate::models::CartItem;
use crate::store::{CredentialStore, StorageBackend, StorageError};

/// Errors that can occur during cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// No session; the caller must log in first.
    #[error("not authenticated")]
    NotAuthenticated,

    /// The session points at a user record that no longer exists.
    #[error("user not found")]
    UserNotFound,

    /// The product is not in the catalog.
    #[error("product not found in catalog")]
    ProductNotFound,

    /// The catalog marks the product as out of stock.
    #[error("product is out of stock")]
    OutOfStock,

    /// The backing store failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Receiver for the UI refresh signal fired after every cart mutation
/// (cart badge, navbar count). An event notification, not a return value.
pub trait CartNotifier {
    /// Called with the cart as it stands after the mutation.
    fn cart_updated(&self, cart: &[CartItem]);
}

/// Cart service for the authenticated user.
pub struct CartService<'a> {
    store: CredentialStore<'a>,
    catalog: &'a Catalog,
    notifier: Option<&'a dyn CartNotifier>,
}

impl<'a> CartService<'a> {
    /// Create a cart service over `backend`, resolving products against
    /// `catalog`.
    #[must_use]
    pub const fn new(backend: &'a dyn StorageBackend, catalog: &'a Catalog) -> Self {
        Self {
            store: CredentialStore::new(backend),
            catalog,
            notifier: None,
        }
    }

    /// Attach a refresh-signal receiver.
    #[must_use]
    pub const fn with_notifier(mut self, notifier: &'a dyn CartNotifier) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// The current user's cart, empty when nobody is logged in or the
    /// session is stale against a deleted user record.
    ///
    /// # Errors
    ///
    /// Propagates storage read/parse failures.
    pub fn get_cart(&self) -> Result<Vec<CartItem>, CartError> {
        let Some(session) = self.store.get_session()? else {
            return Ok(Vec::new());
        };
        Ok(self
            .store
            .find_user(&session.id)?
            .map(|user| user.cart)
            .unwrap_or_default())
    }

    /// Add `qty` of a product (minimum 1). Increments the quantity if the
    /// product is already in the cart, appends a new line otherwise.
    ///
    /// # Errors
    ///
    /// - `CartError::NotAuthenticated` without a session
    /// - `CartError::ProductNotFound` / `CartError::OutOfStock` per the
    ///   catalog
    /// - `CartError::UserNotFound` for a stale session
    /// - `CartError::Storage` on store failure
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub fn add_item(&self, product_id: ProductId, qty: u32) -> Result<Vec<CartItem>, CartError> {
        let product = self
            .catalog
            .find(product_id)
            .ok_or(CartError::ProductNotFound)?;
        if !product.stock.is_available() {
            return Err(CartError::OutOfStock);
        }

        let qty = qty.max(1);
        self.mutate(|cart| {
            if let Some(item) = cart.iter_mut().find(|i| i.product_id == product_id) {
                item.quantity = item.quantity.saturating_add(qty);
            } else {
                cart.push(CartItem::new(product_id, qty));
            }
        })
    }

    /// Set a line's quantity, clamped to a minimum of 1. No-op if the
    /// product is not in the cart.
    ///
    /// # Errors
    ///
    /// Same as [`Self::add_item`], minus the catalog checks.
    #[instrument(skip(self), fields(product_id = %product_id, qty))]
    pub fn set_quantity(
        &self,
        product_id: ProductId,
        qty: u32,
    ) -> Result<Vec<CartItem>, CartError> {
        self.mutate(|cart| {
            if let Some(item) = cart.iter_mut().find(|i| i.product_id == product_id) {
                item.quantity = qty.max(1);
            }
        })
    }

    /// Remove a line. No-op if the product is not in the cart.
    ///
    /// # Errors
    ///
    /// Same as [`Self::set_quantity`].
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub fn remove_item(&self, product_id: ProductId) -> Result<Vec<CartItem>, CartError> {
        self.mutate(|cart| cart.retain(|i| i.product_id != product_id))
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Same as [`Self::set_quantity`].
    pub fn clear(&self) -> Result<Vec<CartItem>, CartError> {
        self.mutate(Vec::clear)
    }

    /// Total of a cart against the catalog. Lines whose product vanished
    /// from the catalog contribute nothing.
    #[must_use]
    pub fn total(&self, cart: &[CartItem]) -> Rupiah {
        cart.iter()
            .filter_map(|item| {
                self.catalog
                    .price_of(item.product_id)
                    .map(|price| price * item.quantity)
            })
            .sum()
    }

    /// Read-modify-write of the session user's durable cart, then fire the
    /// refresh signal. The single logical "persist" operation: either the
    /// durable record reflects the change and the signal fires, or the
    /// error is returned and nothing was written.
    fn mutate(&self, op: impl FnOnce(&mut Vec<CartItem>)) -> Result<Vec<CartItem>, CartError> {
        let session = self
            .store
            .get_session()?
            .ok_or(CartError::NotAuthenticated)?;

        let mut users = self.store.list_users()?;
        let user = users
            .iter_mut()
            .find(|u| u.id == session.id)
            .ok_or(CartError::UserNotFound)?;

        op(&mut user.cart);
        let cart = user.cart.clone();
        self.store.save_users(&users)?;

        if let Some(notifier) = self.notifier {
            notifier.cart_updated(&cart);
        }
        Ok(cart)
    }
}
