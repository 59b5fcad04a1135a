//! Storefront cart domain types and the cart manager.
//!
//! This crate owns the client-side cart of a web storefront:
//!
//! - **Catalog**: products, stock levels, and the [`CatalogService`] port
//! - **Cart**: ordered line items, one per product, plus pricing summaries
//! - **Manager**: [`CartManager`] validates operations against stock,
//!   commits new snapshots, and mirrors them to a key-value store
//! - **Notices**: user-facing failure signals delivered to a [`Notifier`]
//!
//! # Example
//!
//! ```rust,ignore
//! use cart_core::prelude::*;
//! use cart_store::MemoryStore;
//!
//! let catalog = InMemoryCatalog::new().with_product(sneaker, 5);
//! let mut manager = CartManager::new(catalog, MemoryStore::new(), TracingNotifier);
//!
//! manager.add_product(ProductId::new(1)).await;
//! manager.update_product_amount(UpdateProductAmount::new(1, 3)).await;
//!
//! let summary = manager.summary(Currency::BRL)?;
//! println!("Total: {}", summary.total);
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod cart;
pub mod catalog;
pub mod manager;
pub mod notify;
pub mod persistence;

pub use error::{CartError, CatalogError};
pub use ids::ProductId;
pub use money::{Currency, Money};

pub use cart::{Cart, CartSummary, LineItem, LineSummary};
pub use catalog::{CatalogService, InMemoryCatalog, Product, Stock};
pub use manager::{CartManager, Operation, UpdateProductAmount};
pub use notify::{Notice, NoticeLog, Notifier, TracingNotifier};
pub use persistence::{CartPersistence, DEFAULT_STORAGE_KEY};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{CartError, CatalogError};
    pub use crate::ids::ProductId;
    pub use crate::money::{Currency, Money};

    pub use crate::cart::{Cart, CartSummary, LineItem, LineSummary};
    pub use crate::catalog::{CatalogService, InMemoryCatalog, Product, Stock};
    pub use crate::manager::{CartManager, Operation, UpdateProductAmount};
    pub use crate::notify::{Notice, NoticeLog, Notifier, TracingNotifier};
    pub use crate::persistence::{CartPersistence, DEFAULT_STORAGE_KEY};
}
