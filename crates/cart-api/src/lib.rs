//! HTTP stock and product catalog client for the storefront cart.
//!
//! This crate provides:
//! - `HttpCatalog` - [`CatalogService`](cart_core::CatalogService) over a
//!   REST API exposing `/stock/{id}` and `/products/{id}`
//! - `FetchPolicy` - per-request timeouts and retries
//! - `RetryPolicy` - retry strategies

mod client;
mod retry;
mod timeout;

pub use client::*;
pub use retry::*;
pub use timeout::*;
