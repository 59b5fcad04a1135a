//! Mirrors cart snapshots to a key-value store.

use cart_store::KeyValueStore;

use crate::cart::Cart;

/// Key the cart is stored under.
pub const DEFAULT_STORAGE_KEY: &str = "@RocketShoes:cart";

/// Loads the cart at startup and writes it back when it changes.
///
/// Change detection compares the serialized cart with the last text that
/// was successfully written (or loaded). Write failures are logged and
/// dropped; the stale `last_persisted` makes the next commit try again.
#[derive(Debug)]
pub struct CartPersistence<S> {
    store: S,
    key: String,
    last_persisted: Option<String>,
}

impl<S: KeyValueStore> CartPersistence<S> {
    /// Persist under [`DEFAULT_STORAGE_KEY`].
    pub fn new(store: S) -> Self {
        Self::with_key(store, DEFAULT_STORAGE_KEY)
    }

    /// Persist under a custom key.
    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            last_persisted: None,
        }
    }

    /// Storage key in use.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The store backing this cart.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Give the store back.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Read the persisted cart.
    ///
    /// A missing key yields an empty cart. So does an unreadable store or
    /// a value that doesn't parse as a valid cart; both are logged.
    pub fn load(&mut self) -> Cart {
        let text = match self.store.get(&self.key) {
            Ok(Some(text)) => text,
            Ok(None) => {
                tracing::debug!(key = %self.key, "no stored cart, starting empty");
                return Cart::new();
            }
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "failed to read stored cart");
                return Cart::new();
            }
        };

        match Cart::from_json(&text) {
            Ok(cart) => {
                self.last_persisted = cart.to_json().ok();
                tracing::debug!(key = %self.key, items = cart.len(), "restored cart");
                cart
            }
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "discarding unreadable stored cart");
                Cart::new()
            }
        }
    }

    /// Write the cart if it differs from the last persisted snapshot.
    ///
    /// Returns `true` if a write happened.
    pub fn sync(&mut self, cart: &Cart) -> bool {
        let text = match cart.to_json() {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "failed to serialize cart");
                return false;
            }
        };

        if self.last_persisted.as_deref() == Some(text.as_str()) {
            tracing::debug!(key = %self.key, "cart unchanged, skipping write");
            return false;
        }

        match self.store.set(&self.key, &text) {
            Ok(()) => {
                tracing::debug!(key = %self.key, bytes = text.len(), "persisted cart");
                self.last_persisted = Some(text);
                true
            }
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "failed to persist cart");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::LineItem;
    use crate::catalog::Product;
    use cart_store::MemoryStore;

    fn sample_cart() -> Cart {
        let mut cart = Cart::new();
        cart.push(LineItem::new(Product::new(2, "B", 20.0), 1)).unwrap();
        cart.push(LineItem::new(Product::new(1, "A", 10.0), 3)).unwrap();
        cart
    }

    #[test]
    fn test_missing_key_loads_empty() {
        let mut persistence = CartPersistence::new(MemoryStore::new());
        assert!(persistence.load().is_empty());
    }

    #[test]
    fn test_round_trip_across_restart() {
        let store = MemoryStore::new();
        let cart = sample_cart();

        let mut first = CartPersistence::new(store.clone());
        assert!(first.sync(&cart));

        let mut restarted = CartPersistence::new(store);
        assert_eq!(restarted.load(), cart);
    }

    #[test]
    fn test_unchanged_cart_not_rewritten() {
        let store = MemoryStore::new();
        let mut persistence = CartPersistence::new(store.clone());
        let cart = sample_cart();

        assert!(persistence.sync(&cart));
        assert!(!persistence.sync(&cart.clone()));
        assert_eq!(store.writes(), 1);
    }

    #[test]
    fn test_loaded_cart_not_rewritten() {
        let store = MemoryStore::with_entry(DEFAULT_STORAGE_KEY, sample_cart().to_json().unwrap());
        let mut persistence = CartPersistence::new(store.clone());
        let cart = persistence.load();

        assert!(!persistence.sync(&cart));
        assert_eq!(store.writes(), 0);
    }

    #[test]
    fn test_corrupt_value_loads_empty() {
        let store = MemoryStore::with_entry(DEFAULT_STORAGE_KEY, "{not json");
        let mut persistence = CartPersistence::new(store);
        assert!(persistence.load().is_empty());
    }

    #[test]
    fn test_failed_write_retried_on_next_sync() {
        let store = MemoryStore::new();
        let mut persistence = CartPersistence::new(store.clone());
        let cart = sample_cart();

        store.fail_writes(true);
        assert!(!persistence.sync(&cart));

        store.fail_writes(false);
        assert!(persistence.sync(&cart));
        assert_eq!(store.writes(), 1);
    }

    #[test]
    fn test_custom_key() {
        let store = MemoryStore::new();
        let mut persistence = CartPersistence::with_key(store.clone(), "shop:cart");
        persistence.sync(&sample_cart());
        assert!(store.exists("shop:cart").unwrap());
        assert!(!store.exists(DEFAULT_STORAGE_KEY).unwrap());
    }
}
