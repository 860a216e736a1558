//! Order ledger storage.
//!
//! Append-mostly list of checkout attempts, stored independently of the
//! user records and linked to them only by `userId` and the human-readable
//! reference code.

use tracing::instrument;

use crate::models::Order;

use super::{StorageBackend, StorageError, keys};

/// Storage access for the order ledger.
pub struct OrderLedger<'a> {
    backend: &'a dyn StorageBackend,
}

impl<'a> OrderLedger<'a> {
    /// Create an order ledger over `backend`.
    #[must_use]
    pub const fn new(backend: &'a dyn StorageBackend) -> Self {
        Self { backend }
    }

    /// All orders, oldest first. Empty if the ledger was never written.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Unavailable` if the store cannot be read, or
    /// `StorageError::Corrupt` if the ledger fails to parse.
    pub fn list_orders(&self) -> Result<Vec<Order>, StorageError> {
        match self.backend.read(keys::ORDERS)? {
            Some(raw) => serde_json::from_str(&raw)
                .map_err(|e| StorageError::Corrupt(format!("order ledger: {e}"))),
            None => Ok(Vec::new()),
        }
    }

    /// Replace the stored ledger.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Unavailable` if the store cannot be written.
    pub fn save_orders(&self, orders: &[Order]) -> Result<(), StorageError> {
        let raw = serde_json::to_string(orders)
            .map_err(|e| StorageError::Corrupt(format!("order ledger: {e}")))?;
        self.backend.write(keys::ORDERS, &raw)
    }

    /// Append one order (read-push-write).
    ///
    /// # Errors
    ///
    /// Propagates read/write failures.
    #[instrument(skip_all, fields(order_id = %order.id, ref_number = %order.ref_number))]
    pub fn append(&self, order: Order) -> Result<(), StorageError> {
        let mut orders = self.list_orders()?;
        orders.push(order);
        self.save_orders(&orders)
    }

    /// Find an order by its payment reference code.
    ///
    /// # Errors
    ///
    /// Propagates read/parse failures.
    pub fn find_by_ref(&self, ref_number: &str) -> Result<Option<Order>, StorageError> {
        Ok(self
            .list_orders()?
            .into_iter()
            .find(|o| o.ref_number == ref_number))
    }
}
