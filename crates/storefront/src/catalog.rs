//! Read-only product catalog.
//!
//! The catalog is an external JSON document (`{ "products": [...] }`)
//! fetched once per page load over plain HTTP GET. This system never writes
//! it. The one deliberate deviation from the source: the fetch carries a
//! timeout, so an unreachable catalog degrades to a non-fatal "catalog
//! unavailable" state instead of stalling the caller indefinitely.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

use uwinfly_core::{ProductId, Rupiah, StockStatus};

/// Errors from loading the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The document could not be fetched (network failure or timeout).
    ///
    /// Non-fatal: callers render a "catalog unavailable" state and carry on.
    #[error("catalog unavailable: {0}")]
    Unavailable(String),

    /// The document was fetched but is not a valid catalog.
    #[error("catalog document is invalid: {0}")]
    Invalid(String),
}

/// One product in the catalog document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: String,
    pub description: String,
    /// Whole-Rupiah price, displayed with no decimal places.
    pub price: Rupiah,
    /// Relative image path within the site assets.
    pub image: String,
    pub stock: StockStatus,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub sold: u64,
    /// External marketplace link for the product.
    #[serde(default)]
    pub link: String,
}

/// Wire shape of the catalog document.
#[derive(Debug, Deserialize)]
struct CatalogDocument {
    #[serde(default)]
    products: Vec<Product>,
}

/// The parsed, read-only product list.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Parse a catalog from the raw JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Invalid`] if the document does not parse.
    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let doc: CatalogDocument =
            serde_json::from_str(raw).map_err(|e| CatalogError::Invalid(e.to_string()))?;
        Ok(Self {
            products: doc.products,
        })
    }

    /// Build a catalog from an in-memory product list (tests, fixtures).
    #[must_use]
    pub const fn from_products(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// All products, in document order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Look up a product by ID.
    #[must_use]
    pub fn find(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Whether the product exists and is in stock.
    #[must_use]
    pub fn is_available(&self, id: ProductId) -> bool {
        self.find(id).is_some_and(|p| p.stock.is_available())
    }

    /// Price lookup for total computation.
    #[must_use]
    pub fn price_of(&self, id: ProductId) -> Option<Rupiah> {
        self.find(id).map(|p| p.price)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

/// HTTP client for the catalog document.
pub struct CatalogClient {
    http: reqwest::Client,
    url: String,
}

impl CatalogClient {
    /// Build a client for `url` with the given fetch timeout.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Unavailable`] if the HTTP client cannot be
    /// constructed.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, CatalogError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CatalogError::Unavailable(e.to_string()))?;
        Ok(Self {
            http,
            url: url.into(),
        })
    }

    /// Fetch and parse the catalog document.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Unavailable`] on network failure or timeout,
    /// [`CatalogError::Invalid`] if the body is not a catalog document.
    #[instrument(skip(self), fields(url = %self.url))]
    pub async fn fetch(&self) -> Result<Catalog, CatalogError> {
        let response = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(|e| CatalogError::Unavailable(e.to_string()))?
            .error_for_status()
            .map_err(|e| CatalogError::Unavailable(e.to_string()))?;

        let body = response
            .text()
            .await
            .map_err(|e| CatalogError::Unavailable(e.to_string()))?;

        let catalog = Catalog::from_json(&body)?;
        tracing::info!(products = catalog.len(), "catalog loaded");
        Ok(catalog)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "products": [
            {
                "id": 7,
                "name": "Uwinfly T3 Pro",
                "category": "Sepeda Listrik",
                "description": "Sepeda listrik harian",
                "price": 4500000,
                "image": "assets/image/t3.jpg",
                "stock": "available",
                "rating": 4.8,
                "sold": 1200,
                "link": "https://example.com/t3"
            },
            {
                "id": 8,
                "name": "Uwinfly DF9",
                "category": "Sepeda Listrik",
                "description": "Stok habis",
                "price": 6000000,
                "image": "assets/image/df9.jpg",
                "stock": "out_of_stock",
                "rating": 4.6,
                "sold": 300,
                "link": ""
            }
        ]
    }"#;

    #[test]
    fn test_parse_document() {
        let catalog = Catalog::from_json(SAMPLE).unwrap();
        assert_eq!(catalog.len(), 2);

        let p = catalog.find(ProductId::new(7)).unwrap();
        assert_eq!(p.price, Rupiah::new(4_500_000));
        assert_eq!(p.price.to_string(), "Rp 4.500.000");
    }

    #[test]
    fn test_availability() {
        let catalog = Catalog::from_json(SAMPLE).unwrap();
        assert!(catalog.is_available(ProductId::new(7)));
        assert!(!catalog.is_available(ProductId::new(8)));
        // unknown product is simply unavailable
        assert!(!catalog.is_available(ProductId::new(999)));
    }

    #[test]
    fn test_empty_document_defaults() {
        let catalog = Catalog::from_json("{}").unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_invalid_document() {
        assert!(matches!(
            Catalog::from_json("not json"),
            Err(CatalogError::Invalid(_))
        ));
    }

    #[tokio::test]
    async fn test_fetch_failure_is_unavailable() {
        // port 9 (discard) is not listening; the fetch fails fast
        let client =
            CatalogClient::new("http://127.0.0.1:9/products.json", Duration::from_millis(500))
                .unwrap();
        assert!(matches!(
            client.fetch().await,
            Err(CatalogError::Unavailable(_))
        ));
    }
}
