//! Integration tests for the Uwinfly storefront core.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p uwinfly-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `auth_flow` - Registration, login, session, and admin bootstrap
//! - `cart_checkout` - The full catalog -> cart -> order -> payment path
//! - `user_admin` - Admin-zone edit/delete flows and session reconciliation
//! - `storage_consistency` - File-store persistence and the documented
//!   lost-update race
//!
//! Everything runs against in-process storage backends; no server and no
//! network access are required.

use secrecy::SecretString;

use uwinfly_core::{Email, ProductId, Rupiah, StockStatus};
use uwinfly_storefront::catalog::{Catalog, Product};
use uwinfly_storefront::services::auth::AdminSeed;

/// The seed admin used across scenarios, mirroring the deployed demo's
/// built-in credentials.
#[must_use]
pub fn demo_admin_seed() -> AdminSeed {
    AdminSeed {
        name: "admin".to_owned(),
        email: Email::parse("admin@uwinfly.id").unwrap_or_else(|_| unreachable!()),
        password: SecretString::from("admin"),
    }
}

/// A small fixture catalog: product 7 in stock, product 8 sold out.
#[must_use]
pub fn fixture_catalog() -> Catalog {
    Catalog::from_products(vec![
        Product {
            id: ProductId::new(7),
            name: "Uwinfly T3 Pro".to_owned(),
            category: "Sepeda Listrik".to_owned(),
            description: "Sepeda listrik harian".to_owned(),
            price: Rupiah::new(4_500_000),
            image: "assets/image/t3.jpg".to_owned(),
            stock: StockStatus::Available,
            rating: 4.8,
            sold: 1200,
            link: String::new(),
        },
        Product {
            id: ProductId::new(8),
            name: "Uwinfly DF9".to_owned(),
            category: "Sepeda Listrik".to_owned(),
            description: "Stok habis".to_owned(),
            price: Rupiah::new(6_000_000),
            image: "assets/image/df9.jpg".to_owned(),
            stock: StockStatus::OutOfStock,
            rating: 4.6,
            sold: 300,
            link: String::new(),
        },
    ])
}
