//! Domain layer for the shopping cart.
//!
//! This crate provides:
//! - `Cart`, the ordered set of line items with its pure transition rules
//! - `ProductCatalog` for product and stock lookups
//! - `Notifier` for user-facing failure messages
//! - `CartService`, which ties these to a persistent slot

pub mod cart;
pub mod catalog;
pub mod notify;

pub use cart::{
    CART_STORAGE_KEY, Cart, CartError, CartErrorKind, CartEvent, CartOperation, CartOutcome,
    CartService, LineItem, Money, Product, StockEntry, UpdateProductAmount,
};
pub use catalog::{CatalogError, CatalogFixture, InMemoryProductCatalog, ProductCatalog};
pub use notify::{NoopNotifier, Notification, Notifier, RecordingNotifier, TracingNotifier};
