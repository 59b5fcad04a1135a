//! Cart error types.

use crate::ids::ProductId;
use thiserror::Error;

/// Errors reported by a catalog/stock service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// The catalog has no such product or stock entry.
    #[error("Product not found in catalog: {0}")]
    NotFound(ProductId),

    /// The catalog could not be reached or answered with an error.
    #[error("Catalog unavailable: {0}")]
    Unavailable(String),

    /// The catalog answered with something that isn't a product or stock record.
    #[error("Invalid catalog response: {0}")]
    InvalidResponse(String),
}

/// Errors that can occur in cart operations.
///
/// These never escape a [`CartManager`](crate::CartManager) operation; they
/// are turned into a [`Notice`](crate::Notice) at the operation boundary.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CartError {
    /// Requested amount is above the available stock.
    #[error("Insufficient stock for {product_id}: requested {requested}, available {available}")]
    StockExceeded {
        product_id: ProductId,
        requested: i64,
        available: i64,
    },

    /// Product is not in the cart.
    #[error("Product not in cart: {0}")]
    NotInCart(ProductId),

    /// Amount below one.
    #[error("Invalid amount: {0}")]
    InvalidAmount(i64),

    /// Product already has a line item.
    #[error("Duplicate line item for product {0}")]
    DuplicateProduct(ProductId),

    /// Catalog lookup failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Arithmetic overflow in a money or amount calculation.
    #[error("Arithmetic overflow in cart calculation")]
    Overflow,
}
