//! Cart aggregate implementation.

use std::collections::HashSet;

use common::ProductId;
use serde::{Deserialize, Serialize};

use super::{CartError, CartEvent, LineItem, Money, Product, StockEntry};

/// The shopper's cart: an ordered sequence of line items, unique by
/// product id, kept in insertion order.
///
/// Command methods validate a change against the current state and return
/// the event describing it without touching `self`; [`Cart::apply`] then
/// commits the event. Nothing here performs I/O.
///
/// Serializes as a bare JSON array of line items. Deserialization rejects
/// sequences with duplicate ids or zero amounts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<LineItem>", into = "Vec<LineItem>")]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Creates an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a cart from an existing sequence of line items.
    pub fn from_items(items: Vec<LineItem>) -> Result<Self, CartError> {
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if item.amount == 0 {
                return Err(CartError::CorruptCart(format!(
                    "product {} has amount 0",
                    item.id
                )));
            }
            if !seen.insert(item.id) {
                return Err(CartError::CorruptCart(format!(
                    "product {} appears more than once",
                    item.id
                )));
            }
        }
        Ok(Self { items })
    }

    /// Applies an event to the cart.
    pub fn apply(&mut self, event: CartEvent) {
        match event {
            CartEvent::ProductAdded(item) => self.items.push(item),
            CartEvent::ProductRemoved { product_id } => {
                self.items.retain(|item| item.id != product_id);
            }
            CartEvent::ProductAmountUpdated {
                product_id, amount, ..
            } => {
                if let Some(item) = self.items.iter_mut().find(|item| item.id == product_id) {
                    item.amount = amount;
                }
            }
        }
    }
}

impl TryFrom<Vec<LineItem>> for Cart {
    type Error = CartError;

    fn try_from(items: Vec<LineItem>) -> Result<Self, Self::Error> {
        Self::from_items(items)
    }
}

impl From<Cart> for Vec<LineItem> {
    fn from(cart: Cart) -> Self {
        cart.items
    }
}

// Query methods
impl Cart {
    /// Returns the line items in insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Returns the line item for a product.
    pub fn get(&self, product_id: ProductId) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id == product_id)
    }

    /// Returns true if the product is in the cart.
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.get(product_id).is_some()
    }

    /// Returns the number of distinct products.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the cart has no line items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the total number of units across all line items.
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.amount)).sum()
    }

    /// Returns the sum of all line subtotals.
    pub fn subtotal(&self) -> Money {
        self.items.iter().map(LineItem::subtotal).sum()
    }
}

// Command methods (return events)
impl Cart {
    /// Appends `product` as a new line item with amount 1.
    pub fn add_new(&self, product: Product) -> Result<CartEvent, CartError> {
        if self.contains(product.id) {
            return Err(CartError::AlreadyInCart {
                product_id: product.id,
            });
        }

        Ok(CartEvent::ProductAdded(LineItem::from_product(product, 1)))
    }

    /// Returns the amount one above the current amount of a line item.
    pub fn incremented_amount(&self, product_id: ProductId) -> Result<i64, CartError> {
        self.get(product_id)
            .map(|item| i64::from(item.amount) + 1)
            .ok_or(CartError::ProductNotFound { product_id })
    }

    /// Removes the line item for a product.
    pub fn remove(&self, product_id: ProductId) -> Result<CartEvent, CartError> {
        if !self.contains(product_id) {
            return Err(CartError::ProductNotFound { product_id });
        }

        Ok(CartEvent::ProductRemoved { product_id })
    }

    /// Runs the checks that precede a stock lookup for an amount change.
    ///
    /// A non-positive amount is rejected before the product is looked up,
    /// so it fails even for products not in the cart.
    pub fn validate_amount(
        &self,
        product_id: ProductId,
        amount: i64,
    ) -> Result<&LineItem, CartError> {
        if amount <= 0 {
            return Err(CartError::InvalidQuantity { amount });
        }

        self.get(product_id)
            .ok_or(CartError::ProductNotFound { product_id })
    }

    /// Sets the amount of a line item, checked against current stock.
    pub fn update_amount(
        &self,
        product_id: ProductId,
        amount: i64,
        stock: &StockEntry,
    ) -> Result<CartEvent, CartError> {
        let item = self.validate_amount(product_id, amount)?;

        let amount = match u32::try_from(amount) {
            Ok(amount) if amount <= stock.amount => amount,
            _ => {
                return Err(CartError::InsufficientStock {
                    product_id,
                    requested: amount,
                    available: stock.amount,
                });
            }
        };

        Ok(CartEvent::ProductAmountUpdated {
            product_id,
            previous_amount: item.amount,
            amount,
        })
    }
}
