//! Shared identifier types used across the cart workspace.

pub mod types;

pub use types::ProductId;
