//! Cart command inputs.

use common::ProductId;

/// Request to set the amount of a product already in the cart.
///
/// `amount` is signed: callers may pass zero or negative values, which the
/// cart rejects as an invalid quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateProductAmount {
    /// The product to update.
    pub product_id: ProductId,

    /// The requested amount.
    pub amount: i64,
}

impl UpdateProductAmount {
    /// Creates a new UpdateProductAmount command.
    pub fn new(product_id: impl Into<ProductId>, amount: i64) -> Self {
        Self {
            product_id: product_id.into(),
            amount,
        }
    }
}

/// The consumer-facing cart mutators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CartOperation {
    AddProduct,
    RemoveProduct,
    UpdateProductAmount,
}

impl CartOperation {
    /// Returns the operation name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            CartOperation::AddProduct => "add_product",
            CartOperation::RemoveProduct => "remove_product",
            CartOperation::UpdateProductAmount => "update_product_amount",
        }
    }
}

impl std::fmt::Display for CartOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
