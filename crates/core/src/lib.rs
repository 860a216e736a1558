//! Uwinfly Core - Shared types library.
//!
//! This crate provides common types used across all Uwinfly storefront
//! components:
//! - `storefront` - Session, cart, and checkout services backed by the
//!   local key-value store
//! - `integration-tests` - Cross-service scenario tests
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails,
//!   statuses, and stored passwords

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
