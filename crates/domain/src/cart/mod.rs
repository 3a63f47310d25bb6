//! Cart aggregate and related types.

mod aggregate;
mod commands;
mod events;
mod service;
mod value_objects;

pub use aggregate::Cart;
pub use commands::{CartOperation, UpdateProductAmount};
pub use events::CartEvent;
pub use service::{CART_STORAGE_KEY, CartOutcome, CartService};
pub use value_objects::{LineItem, Money, Product, StockEntry};

use common::ProductId;
use kv_store::StorageError;
use thiserror::Error;

/// Errors that can occur during cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// The catalog lookup failed or returned no data.
    #[error("Failed to fetch product {product_id}: {reason}")]
    ProductFetch {
        product_id: ProductId,
        reason: String,
    },

    /// The operation referenced a product that is not in the cart.
    #[error("Product not in cart: {product_id}")]
    ProductNotFound { product_id: ProductId },

    /// The requested amount is zero or negative.
    #[error("Invalid quantity: {amount} (must be greater than 0)")]
    InvalidQuantity { amount: i64 },

    /// The requested amount exceeds the units in stock.
    #[error("Insufficient stock for product {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: ProductId,
        requested: i64,
        available: u32,
    },

    /// A line item for this product already exists.
    ///
    /// Only [`Cart::add_new`] produces this. `CartService::add_product`
    /// increments a present product instead of appending it.
    #[error("Product already in cart: {product_id}")]
    AlreadyInCart { product_id: ProductId },

    /// A line item sequence breaks the cart invariants.
    #[error("Corrupt cart: {0}")]
    CorruptCart(String),

    /// The cart could not be written to persistent storage.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl CartError {
    /// Returns the fieldless kind of this error.
    pub fn kind(&self) -> CartErrorKind {
        match self {
            CartError::ProductFetch { .. } => CartErrorKind::ProductFetch,
            CartError::ProductNotFound { .. } => CartErrorKind::ProductNotFound,
            CartError::InvalidQuantity { .. } => CartErrorKind::InvalidQuantity,
            CartError::InsufficientStock { .. } => CartErrorKind::InsufficientStock,
            CartError::AlreadyInCart { .. } => CartErrorKind::AlreadyInCart,
            CartError::CorruptCart(_) => CartErrorKind::CorruptCart,
            CartError::Storage(_) => CartErrorKind::Storage,
        }
    }
}

/// Distinguishes failure kinds without their details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CartErrorKind {
    ProductFetch,
    ProductNotFound,
    InvalidQuantity,
    InsufficientStock,
    AlreadyInCart,
    CorruptCart,
    Storage,
}

impl CartErrorKind {
    /// Returns the kind name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            CartErrorKind::ProductFetch => "product_fetch",
            CartErrorKind::ProductNotFound => "product_not_found",
            CartErrorKind::InvalidQuantity => "invalid_quantity",
            CartErrorKind::InsufficientStock => "insufficient_stock",
            CartErrorKind::AlreadyInCart => "already_in_cart",
            CartErrorKind::CorruptCart => "corrupt_cart",
            CartErrorKind::Storage => "storage",
        }
    }
}

impl std::fmt::Display for CartErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
