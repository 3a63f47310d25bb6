//! Product catalog trait and in-memory implementation.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use common::ProductId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart::{Product, StockEntry};

/// Errors returned by a product catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog could not be reached or refused the request.
    #[error("Catalog unavailable: {0}")]
    Unavailable(String),

    /// Catalog data could not be parsed.
    #[error("Invalid catalog data: {0}")]
    InvalidData(#[from] serde_json::Error),

    /// A catalog fixture could not be read.
    #[error("Failed to read catalog fixture {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Read-only lookup of products and their stock levels.
///
/// `Ok(None)` means the catalog answered but has no data for the id.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// Looks up a product by id.
    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, CatalogError>;

    /// Looks up the current stock level of a product.
    async fn get_stock(&self, id: ProductId) -> Result<Option<StockEntry>, CatalogError>;
}

#[async_trait]
impl<T: ProductCatalog + ?Sized> ProductCatalog for Arc<T> {
    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, CatalogError> {
        (**self).get_product(id).await
    }

    async fn get_stock(&self, id: ProductId) -> Result<Option<StockEntry>, CatalogError> {
        (**self).get_stock(id).await
    }
}

/// Catalog contents in the storefront's mock database shape:
/// `{ "products": [...], "stock": [...] }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogFixture {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub stock: Vec<StockEntry>,
}

#[derive(Debug, Default)]
struct InMemoryCatalogState {
    products: HashMap<ProductId, Product>,
    stock: HashMap<ProductId, u32>,
}

/// In-memory product catalog for tests and local serving.
///
/// Clones share the same data, so a test can adjust stock after handing
/// the catalog to a service.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProductCatalog {
    state: Arc<RwLock<InMemoryCatalogState>>,
    fail_on_lookup: Arc<AtomicBool>,
    product_lookups: Arc<AtomicUsize>,
    stock_lookups: Arc<AtomicUsize>,
}

impl InMemoryProductCatalog {
    /// Creates a new empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a catalog seeded from a fixture.
    pub fn from_fixture(fixture: CatalogFixture) -> Self {
        let catalog = Self::new();
        for product in fixture.products {
            catalog.insert_product(product);
        }
        for entry in fixture.stock {
            catalog.set_stock(entry.id, entry.amount);
        }
        catalog
    }

    /// Creates a catalog from fixture JSON.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        Ok(Self::from_fixture(serde_json::from_str(json)?))
    }

    /// Creates a catalog from a fixture file.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let json = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| CatalogError::Io {
                path: path.display().to_string(),
                source,
            })?;
        Self::from_json(&json)
    }

    /// Adds or replaces a product.
    pub fn insert_product(&self, product: Product) {
        self.write().products.insert(product.id, product);
    }

    /// Sets the units available for a product.
    pub fn set_stock(&self, id: impl Into<ProductId>, amount: u32) {
        self.write().stock.insert(id.into(), amount);
    }

    /// Removes a product and its stock entry.
    pub fn remove_product(&self, id: impl Into<ProductId>) {
        let id = id.into();
        let mut state = self.write();
        state.products.remove(&id);
        state.stock.remove(&id);
    }

    /// Configures every lookup to fail.
    pub fn set_fail_on_lookup(&self, fail: bool) {
        self.fail_on_lookup.store(fail, Ordering::SeqCst);
    }

    /// Returns the number of products in the catalog.
    pub fn product_count(&self) -> usize {
        self.read().products.len()
    }

    /// Returns how many product lookups have been served.
    pub fn product_lookups(&self) -> usize {
        self.product_lookups.load(Ordering::SeqCst)
    }

    /// Returns how many stock lookups have been served.
    pub fn stock_lookups(&self) -> usize {
        self.stock_lookups.load(Ordering::SeqCst)
    }

    fn check_available(&self) -> Result<(), CatalogError> {
        if self.fail_on_lookup.load(Ordering::SeqCst) {
            return Err(CatalogError::Unavailable(
                "catalog lookup failed".to_string(),
            ));
        }
        Ok(())
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, InMemoryCatalogState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, InMemoryCatalogState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl ProductCatalog for InMemoryProductCatalog {
    async fn get_product(&self, id: ProductId) -> Result<Option<Product>, CatalogError> {
        self.product_lookups.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        Ok(self.read().products.get(&id).cloned())
    }

    async fn get_stock(&self, id: ProductId) -> Result<Option<StockEntry>, CatalogError> {
        self.stock_lookups.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        Ok(self
            .read()
            .stock
            .get(&id)
            .map(|&amount| StockEntry { id, amount }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::Money;

    fn sneaker() -> Product {
        Product::new(1u64, "Sneaker", Money::from_cents(17990), "sneaker.jpg")
    }

    #[tokio::test]
    async fn test_lookup_product_and_stock() {
        let catalog = InMemoryProductCatalog::new();
        catalog.insert_product(sneaker());
        catalog.set_stock(1u64, 3);

        let product = catalog.get_product(ProductId::new(1)).await.unwrap();
        assert_eq!(product, Some(sneaker()));

        let stock = catalog.get_stock(ProductId::new(1)).await.unwrap();
        assert_eq!(stock, Some(StockEntry::new(1u64, 3)));

        assert_eq!(catalog.product_lookups(), 1);
        assert_eq!(catalog.stock_lookups(), 1);
    }

    #[tokio::test]
    async fn test_unknown_id_returns_none() {
        let catalog = InMemoryProductCatalog::new();
        assert!(catalog.get_product(ProductId::new(9)).await.unwrap().is_none());
        assert!(catalog.get_stock(ProductId::new(9)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_fail_on_lookup() {
        let catalog = InMemoryProductCatalog::new();
        catalog.insert_product(sneaker());
        catalog.set_fail_on_lookup(true);

        assert!(matches!(
            catalog.get_product(ProductId::new(1)).await,
            Err(CatalogError::Unavailable(_))
        ));
        assert!(catalog.get_stock(ProductId::new(1)).await.is_err());
    }

    #[tokio::test]
    async fn test_clones_share_stock() {
        let catalog = InMemoryProductCatalog::new();
        let handle = catalog.clone();

        handle.set_stock(1u64, 7);

        let stock = catalog.get_stock(ProductId::new(1)).await.unwrap();
        assert_eq!(stock.map(|s| s.amount), Some(7));
    }

    #[tokio::test]
    async fn test_remove_product() {
        let catalog = InMemoryProductCatalog::new();
        catalog.insert_product(sneaker());
        catalog.set_stock(1u64, 2);

        catalog.remove_product(1u64);

        assert_eq!(catalog.product_count(), 0);
        assert!(catalog.get_stock(ProductId::new(1)).await.unwrap().is_none());
    }

    #[test]
    fn test_from_json_fixture() {
        let catalog = InMemoryProductCatalog::from_json(
            r#"{
                "products": [
                    {"id": 1, "title": "Sneaker", "price": 179.9, "image": "sneaker.jpg"},
                    {"id": 2, "title": "Boot", "price": 139.9, "image": "boot.jpg"}
                ],
                "stock": [{"id": 1, "amount": 3}, {"id": 2, "amount": 5}]
            }"#,
        )
        .unwrap();

        assert_eq!(catalog.product_count(), 2);
    }

    #[test]
    fn test_from_json_rejects_malformed_fixture() {
        assert!(matches!(
            InMemoryProductCatalog::from_json("{\"products\": 3}"),
            Err(CatalogError::InvalidData(_))
        ));
    }
}
