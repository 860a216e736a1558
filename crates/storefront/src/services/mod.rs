//! Business services over the storage layer.
//!
//! Each service is constructed with an explicit backend reference and holds
//! no state of its own; every call re-reads the store.

pub mod auth;
pub mod cart;
pub mod checkout;

pub use auth::{AccessCheck, AdminSeed, AuthError, AuthService};
pub use cart::{CartError, CartNotifier, CartService};
pub use checkout::{CheckoutError, CheckoutService};
