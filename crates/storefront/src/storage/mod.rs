//! Persisted key-value slots and the cart store.
//!
//! Persistence is a handful of named string slots behind the
//! [`KeyValueStore`] trait, mirroring the web storage the cart lives in
//! when embedded in a browser. Two backends ship: [`MemoryStore`] for
//! tests and [`JsonFileStore`] for a durable file on disk.
//!
//! The slot is shared and unguarded. Every mutation is load-modify-save
//! with the narrowest possible window, and concurrent writers resolve as
//! last-writer-wins.

mod file;
mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

use clementine_core::Cart;
use clementine_core::ProductId;
use thiserror::Error;
use tracing::warn;

/// Names of the persisted slots.
pub mod slots {
    /// The cart multiset, serialized as a JSON array of product ids.
    pub const CART: &str = "cart";

    /// The submitter's name, captured on successful checkout.
    pub const CUSTOMER_NAME: &str = "customerName";
}

/// A named-slot string store.
///
/// Implementations are infallible on the surface, like web local
/// storage: an unreadable backend behaves as empty and a failed write is
/// logged by the backend rather than surfaced.
pub trait KeyValueStore: Send + Sync {
    /// Read a slot. `None` when absent.
    fn get(&self, key: &str) -> Option<String>;

    /// Overwrite a slot.
    fn set(&self, key: &str, value: &str);

    /// Delete a slot. No-op when absent.
    fn remove(&self, key: &str);
}

/// Errors raised while decoding a persisted slot.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The slot content does not parse as a cart.
    #[error("persisted cart is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Owner of the persisted cart multiset.
///
/// All cart mutations in the application go through this type (via the
/// controller); it never caches the cart in memory, so every operation
/// sees whatever the slot holds right now.
pub struct CartStore<S> {
    backend: S,
}

impl<S: KeyValueStore> CartStore<S> {
    /// Create a store over `backend`.
    #[must_use]
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    /// Read the persisted cart.
    ///
    /// An absent slot is an empty cart. A malformed slot never raises:
    /// it is logged and degrades to an empty cart.
    #[must_use]
    pub fn load(&self) -> Cart {
        match self.backend.get(slots::CART) {
            None => Cart::new(),
            Some(raw) => match parse_cart(&raw) {
                Ok(cart) => cart,
                Err(err) => {
                    warn!(error = %err, "discarding corrupt cart slot");
                    Cart::new()
                }
            },
        }
    }

    /// Overwrite the persisted cart with `cart`.
    pub fn save(&self, cart: &Cart) {
        match serde_json::to_string(cart) {
            Ok(json) => self.backend.set(slots::CART, &json),
            Err(err) => warn!(error = %err, "failed to serialize cart"),
        }
    }

    /// Append one unit of `id`.
    pub fn add(&self, id: ProductId) {
        let mut cart = self.load();
        cart.push(id);
        self.save(&cart);
    }

    /// Delete every occurrence of `id`.
    pub fn remove_all(&self, id: ProductId) {
        let mut cart = self.load();
        cart.remove_all(id);
        self.save(&cart);
    }

    /// Delete the first occurrence of `id`; no-op if absent.
    pub fn decrement_one(&self, id: ProductId) {
        let mut cart = self.load();
        cart.decrement_one(id);
        self.save(&cart);
    }

    /// Empty the persisted cart slot.
    pub fn clear(&self) {
        self.backend.remove(slots::CART);
    }

    /// Record the submitter's name for the confirmation message.
    pub fn set_customer_name(&self, name: &str) {
        self.backend.set(slots::CUSTOMER_NAME, name);
    }

    /// Read back the submitter's name.
    #[must_use]
    pub fn customer_name(&self) -> Option<String> {
        self.backend.get(slots::CUSTOMER_NAME)
    }
}

fn parse_cart(raw: &str) -> Result<Cart, StorageError> {
    Ok(serde_json::from_str(raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cart(ids: &[i64]) -> Cart {
        ids.iter().copied().map(ProductId::new).collect()
    }

    #[test]
    fn test_load_of_saved_cart_round_trips() {
        let store = CartStore::new(MemoryStore::new());
        let original = cart(&[1, 1, 2]);

        store.save(&original);
        assert_eq!(store.load(), original);

        // Saving an unmodified load leaves the slot byte-identical
        let before = store.backend.get(slots::CART);
        store.save(&store.load());
        assert_eq!(store.backend.get(slots::CART), before);
    }

    #[test]
    fn test_absent_slot_loads_as_empty() {
        let store = CartStore::new(MemoryStore::new());
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_malformed_slot_degrades_to_empty() {
        let store = CartStore::new(MemoryStore::new());
        store.backend.set(slots::CART, "{not json");
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_mutations_write_through() {
        let store = CartStore::new(MemoryStore::new());
        let one = ProductId::new(1);
        let two = ProductId::new(2);

        store.add(one);
        store.add(one);
        store.add(two);
        assert_eq!(store.load(), cart(&[1, 1, 2]));

        store.decrement_one(one);
        assert_eq!(store.load(), cart(&[1, 2]));

        store.remove_all(two);
        assert_eq!(store.load(), cart(&[1]));

        store.clear();
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_remove_all_twice_equals_once() {
        let store = CartStore::new(MemoryStore::new());
        store.save(&cart(&[1, 2, 2, 3]));

        store.remove_all(ProductId::new(2));
        let once = store.load();
        store.remove_all(ProductId::new(2));
        assert_eq!(store.load(), once);
        assert_eq!(once, cart(&[1, 3]));
    }

    #[test]
    fn test_customer_name_slot() {
        let store = CartStore::new(MemoryStore::new());
        assert_eq!(store.customer_name(), None);

        store.set_customer_name("Ada Lovelace");
        assert_eq!(store.customer_name(), Some("Ada Lovelace".to_string()));
    }
}
