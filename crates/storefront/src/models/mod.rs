//! Persisted record types.
//!
//! These are the shapes serialized into the key-value store. Field names are
//! camelCase on the wire so records written by the deployed demo remain
//! readable.

pub mod order;
pub mod user;

pub use order::Order;
pub use user::{CartItem, SessionUser, User};
