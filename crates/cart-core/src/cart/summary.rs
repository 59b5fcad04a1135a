//! Cart pricing summary.

use serde::Serialize;

use crate::cart::Cart;
use crate::error::CartError;
use crate::ids::ProductId;
use crate::money::{Currency, Money};

/// Pricing breakdown for one line item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineSummary {
    pub product_id: ProductId,
    pub title: String,
    pub unit_price: Money,
    pub amount: i64,
    /// Unit price times amount.
    pub subtotal: Money,
}

/// What a cart page or header badge shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartSummary {
    /// Number of distinct products.
    pub size: usize,
    /// Sum of amounts.
    pub item_count: i64,
    pub lines: Vec<LineSummary>,
    pub total: Money,
}

impl CartSummary {
    /// Price a cart in the given currency.
    ///
    /// Returns [`CartError::Overflow`] if any subtotal, the total, or the
    /// item count overflows.
    pub fn from_cart(cart: &Cart, currency: Currency) -> Result<Self, CartError> {
        let lines = cart
            .items()
            .iter()
            .map(|item| {
                let unit_price = Money::from_decimal(item.product.price, currency);
                let subtotal = unit_price
                    .try_multiply(item.amount)
                    .ok_or(CartError::Overflow)?;
                Ok(LineSummary {
                    product_id: item.id(),
                    title: item.product.title.clone(),
                    unit_price,
                    amount: item.amount,
                    subtotal,
                })
            })
            .collect::<Result<Vec<_>, CartError>>()?;

        let total = Money::try_sum(lines.iter().map(|l| &l.subtotal), currency)
            .ok_or(CartError::Overflow)?;

        let item_count = cart.item_count().ok_or(CartError::Overflow)?;

        Ok(Self {
            size: cart.len(),
            item_count,
            lines,
            total,
        })
    }
}
