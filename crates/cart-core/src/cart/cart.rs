//! Cart and line item types.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::error::CartError;
use crate::ids::ProductId;

/// A shopping cart.
///
/// An ordered list of line items, first added first. Every operation keeps
/// two invariants: at most one line item per product, and every amount is
/// at least one. Deserialization checks both, so a persisted cart that
/// breaks them is rejected rather than loaded.
///
/// Serialized as a bare JSON array of line items.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<LineItem>", into = "Vec<LineItem>")]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cart from line items, checking the cart invariants.
    pub fn from_items(items: Vec<LineItem>) -> Result<Self, CartError> {
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if item.amount < 1 {
                return Err(CartError::InvalidAmount(item.amount));
            }
            if !seen.insert(item.id()) {
                return Err(CartError::DuplicateProduct(item.id()));
            }
        }
        Ok(Self { items })
    }

    /// Line items in insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Get the line item for a product.
    pub fn get(&self, product_id: ProductId) -> Option<&LineItem> {
        self.items.iter().find(|i| i.id() == product_id)
    }

    /// Check if the cart holds a product.
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.get(product_id).is_some()
    }

    /// Amount of a product in the cart, zero if absent.
    pub fn amount_of(&self, product_id: ProductId) -> i64 {
        self.get(product_id).map(|i| i.amount).unwrap_or(0)
    }

    /// Number of distinct products.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total item count (sum of amounts), `None` on overflow.
    pub fn item_count(&self) -> Option<i64> {
        self.items
            .iter()
            .try_fold(0i64, |count, i| count.checked_add(i.amount))
    }

    /// Amount per product, for marking products already in the cart.
    pub fn amount_by_product(&self) -> HashMap<ProductId, i64> {
        self.items.iter().map(|i| (i.id(), i.amount)).collect()
    }

    /// Append a new line item.
    pub fn push(&mut self, item: LineItem) -> Result<(), CartError> {
        if item.amount < 1 {
            return Err(CartError::InvalidAmount(item.amount));
        }
        if self.contains(item.id()) {
            return Err(CartError::DuplicateProduct(item.id()));
        }
        self.items.push(item);
        Ok(())
    }

    /// Set the amount of an existing line item.
    pub fn set_amount(&mut self, product_id: ProductId, amount: i64) -> Result<(), CartError> {
        if amount < 1 {
            return Err(CartError::InvalidAmount(amount));
        }
        let item = self
            .items
            .iter_mut()
            .find(|i| i.id() == product_id)
            .ok_or(CartError::NotInCart(product_id))?;
        item.amount = amount;
        Ok(())
    }

    /// Remove a line item, returning it.
    pub fn remove(&mut self, product_id: ProductId) -> Result<LineItem, CartError> {
        let index = self
            .items
            .iter()
            .position(|i| i.id() == product_id)
            .ok_or(CartError::NotInCart(product_id))?;
        Ok(self.items.remove(index))
    }

    /// Serialize to the persisted JSON form.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.items)
    }

    /// Parse the persisted JSON form.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
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

/// A line item in the cart: catalog metadata plus the chosen amount.
///
/// Serialized flat, e.g. `{"id":1,"title":"…","price":179.9,"image":"…","amount":2}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItem {
    /// Product metadata as fetched from the catalog.
    #[serde(flatten)]
    pub product: Product,
    /// Quantity, at least one.
    pub amount: i64,
}

impl LineItem {
    /// Create a line item.
    ///
    /// A catalog field named `amount` is dropped from the product extras,
    /// since the line item's own amount takes its place in the flat form.
    pub fn new(mut product: Product, amount: i64) -> Self {
        product.extra.remove("amount");
        Self { product, amount }
    }

    /// Product identifier.
    pub fn id(&self) -> ProductId {
        self.product.id
    }
}
