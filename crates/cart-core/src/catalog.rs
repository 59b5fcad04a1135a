//! Catalog types and the stock/product lookup port.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::ids::ProductId;

/// Product metadata as published by the catalog.
///
/// Fields the cart doesn't know about are kept in `extra` and written back
/// verbatim when the cart is persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Catalog identifier.
    pub id: ProductId,
    /// Display name.
    pub title: String,
    /// Unit price as a decimal in the storefront currency.
    pub price: f64,
    /// Image URL.
    #[serde(default)]
    pub image: String,
    /// Any further catalog fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Product {
    /// Create a product with no extra fields.
    pub fn new(id: impl Into<ProductId>, title: impl Into<String>, price: f64) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            price,
            image: String::new(),
            extra: serde_json::Map::new(),
        }
    }

    /// Set the image URL.
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }
}

/// Stock level for a product.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Stock {
    /// Catalog identifier, when the stock record carries one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ProductId>,
    /// Maximum purchasable quantity.
    pub amount: i64,
}

/// Authoritative source of stock levels and product metadata.
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Get the stock level of a product.
    async fn stock(&self, product_id: ProductId) -> Result<Stock, CatalogError>;

    /// Get the metadata of a product.
    async fn product(&self, product_id: ProductId) -> Result<Product, CatalogError>;
}

#[async_trait]
impl<C: CatalogService + ?Sized> CatalogService for std::sync::Arc<C> {
    async fn stock(&self, product_id: ProductId) -> Result<Stock, CatalogError> {
        (**self).stock(product_id).await
    }

    async fn product(&self, product_id: ProductId) -> Result<Product, CatalogError> {
        (**self).product(product_id).await
    }
}

/// Catalog held in memory.
///
/// Useful for tests, demos, and offline previews. Can be switched into an
/// unavailable state to exercise failure handling.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    products: HashMap<ProductId, Product>,
    stock: HashMap<ProductId, i64>,
    unavailable: AtomicBool,
    stock_lookups: AtomicU64,
    product_lookups: AtomicU64,
}

impl InMemoryCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a product with its stock amount.
    pub fn with_product(mut self, product: Product, stock: i64) -> Self {
        self.stock.insert(product.id, stock);
        self.products.insert(product.id, product);
        self
    }

    /// Add a stock entry with no product metadata.
    pub fn with_stock_only(mut self, product_id: impl Into<ProductId>, stock: i64) -> Self {
        self.stock.insert(product_id.into(), stock);
        self
    }

    /// Make every lookup fail with [`CatalogError::Unavailable`].
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of stock lookups served so far.
    pub fn stock_lookups(&self) -> u64 {
        self.stock_lookups.load(Ordering::SeqCst)
    }

    /// Number of product lookups served so far.
    pub fn product_lookups(&self) -> u64 {
        self.product_lookups.load(Ordering::SeqCst)
    }

    fn check_available(&self) -> Result<(), CatalogError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(CatalogError::Unavailable("catalog offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogService for InMemoryCatalog {
    async fn stock(&self, product_id: ProductId) -> Result<Stock, CatalogError> {
        self.stock_lookups.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        self.stock
            .get(&product_id)
            .map(|&amount| Stock {
                id: Some(product_id),
                amount,
            })
            .ok_or(CatalogError::NotFound(product_id))
    }

    async fn product(&self, product_id: ProductId) -> Result<Product, CatalogError> {
        self.product_lookups.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        self.products
            .get(&product_id)
            .cloned()
            .ok_or(CatalogError::NotFound(product_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_keeps_unknown_fields() {
        let json = r#"{"id":2,"title":"Tênis","price":139.9,"image":"a.jpg","brand":"Acme"}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, ProductId::new(2));
        assert_eq!(product.extra.get("brand"), Some(&serde_json::json!("Acme")));

        let back = serde_json::to_value(&product).unwrap();
        assert_eq!(back["brand"], "Acme");
    }

    #[test]
    fn test_stock_without_id() {
        let stock: Stock = serde_json::from_str(r#"{"amount":3}"#).unwrap();
        assert_eq!(stock.id, None);
        assert_eq!(stock.amount, 3);
    }

    #[test]
    fn test_product_image_defaults_to_empty() {
        let product: Product = serde_json::from_str(r#"{"id":1,"title":"x","price":1}"#).unwrap();
        assert_eq!(product.image, "");
    }

    #[tokio::test]
    async fn test_in_memory_lookups() {
        let catalog = InMemoryCatalog::new()
            .with_product(Product::new(1, "Sneaker", 99.5), 4)
            .with_stock_only(2, 1);

        assert_eq!(catalog.stock(ProductId::new(1)).await.unwrap().amount, 4);
        assert_eq!(catalog.product(ProductId::new(1)).await.unwrap().title, "Sneaker");
        assert_eq!(
            catalog.product(ProductId::new(2)).await,
            Err(CatalogError::NotFound(ProductId::new(2)))
        );
        assert_eq!(catalog.stock_lookups(), 1);
        assert_eq!(catalog.product_lookups(), 2);
    }

    #[tokio::test]
    async fn test_in_memory_unavailable() {
        let catalog = InMemoryCatalog::new().with_stock_only(1, 3);
        catalog.set_unavailable(true);
        assert!(matches!(
            catalog.stock(ProductId::new(1)).await,
            Err(CatalogError::Unavailable(_))
        ));
    }
}
