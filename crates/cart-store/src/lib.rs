//! Key-value persistence for storefront cart state.
//!
//! The cart core only needs a scoped string-to-string store: one key is
//! read at startup and written whenever the cart changes. This crate
//! provides that contract as [`KeyValueStore`] plus a few backends:
//!
//! - [`MemoryStore`] for tests and ephemeral sessions
//! - [`FileStore`] for a directory on local disk
//! - `SpinStore` for Spin's Key-Value Store (`wasm32` only)
//!
//! # Example
//!
//! ```rust
//! use cart_store::{KeyValueStore, MemoryStore};
//!
//! let store = MemoryStore::new();
//! store.set_json("@RocketShoes:cart", &vec![1, 2, 3]).unwrap();
//!
//! let items: Option<Vec<u32>> = store.get_json("@RocketShoes:cart").unwrap();
//! assert_eq!(items, Some(vec![1, 2, 3]));
//! ```

mod error;
mod file;
mod kv;
mod memory;
#[cfg(target_arch = "wasm32")]
mod spin;

pub use error::StoreError;
pub use file::FileStore;
pub use kv::KeyValueStore;
pub use memory::MemoryStore;
#[cfg(target_arch = "wasm32")]
pub use spin::SpinStore;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{FileStore, KeyValueStore, MemoryStore, StoreError};
}
