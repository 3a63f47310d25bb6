//! Cart events.

use common::ProductId;
use serde::{Deserialize, Serialize};

use super::LineItem;

/// A committed change to the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CartEvent {
    /// A new line item was appended.
    ProductAdded(LineItem),

    /// A line item was removed.
    ProductRemoved { product_id: ProductId },

    /// A line item's amount changed.
    ProductAmountUpdated {
        product_id: ProductId,
        previous_amount: u32,
        amount: u32,
    },
}

impl CartEvent {
    /// Returns the event type name.
    pub fn event_type(&self) -> &'static str {
        match self {
            CartEvent::ProductAdded(_) => "ProductAdded",
            CartEvent::ProductRemoved { .. } => "ProductRemoved",
            CartEvent::ProductAmountUpdated { .. } => "ProductAmountUpdated",
        }
    }

    /// Returns the product this event concerns.
    pub fn product_id(&self) -> ProductId {
        match self {
            CartEvent::ProductAdded(item) => item.id,
            CartEvent::ProductRemoved { product_id }
            | CartEvent::ProductAmountUpdated { product_id, .. } => *product_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::{Money, Product};

    #[test]
    fn event_type_and_product_id() {
        let added = CartEvent::ProductAdded(LineItem::from_product(
            Product::new(4u64, "Sneaker", Money::from_cents(100), "s.jpg"),
            1,
        ));
        assert_eq!(added.event_type(), "ProductAdded");
        assert_eq!(added.product_id(), ProductId::new(4));

        let removed = CartEvent::ProductRemoved {
            product_id: ProductId::new(5),
        };
        assert_eq!(removed.event_type(), "ProductRemoved");
        assert_eq!(removed.product_id(), ProductId::new(5));
    }

    #[test]
    fn events_are_tagged_by_type() {
        let event = CartEvent::ProductAmountUpdated {
            product_id: ProductId::new(1),
            previous_amount: 1,
            amount: 3,
        };
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["type"], "ProductAmountUpdated");
        assert_eq!(json["amount"], 3);
    }
}
