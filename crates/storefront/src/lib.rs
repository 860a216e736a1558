//! Uwinfly Storefront core library.
//!
//! Session, cart, and checkout services for the Uwinfly e-bike storefront,
//! backed by a local key-value store (the browser-local-storage model) and a
//! read-only product catalog document.
//!
//! # Architecture
//!
//! - [`store`] - Key-value storage backends, the credential store, and the
//!   order ledger
//! - [`models`] - Persisted record types (users, session, orders)
//! - [`services`] - Auth, cart, and checkout business rules
//! - [`catalog`] - Read-only product catalog client
//! - [`error`] / [`messages`] - Unified error taxonomy and the localized
//!   user-facing message catalog
//!
//! The view layer (page rendering, admin tables, the QRIS modal) is an
//! external collaborator: it calls these services and re-renders from
//! freshly re-read state. Every read here is a fresh deserialization; there
//! is no in-process cache to invalidate.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod messages;
pub mod models;
pub mod services;
pub mod store;
