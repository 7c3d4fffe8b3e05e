//! Observable, persisted cart.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use comanda_core::{Price, ProductId};

use super::{Cart, CartLine, CartModifiers, CartStorage, LineKey, StorageError};

/// Storage key holding the cart snapshot.
pub const CART_STORAGE_KEY: &str = "comanda-cart-v1";

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Serialized form of the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedCart {
    pub version: u32,
    pub saved_at: DateTime<Utc>,
    pub items: Vec<CartLine>,
}

/// Handle returned by [`CartStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&Cart)>;

/// Cart state holder.
///
/// Loads the last snapshot on open, rewrites it after every mutation that
/// changes the cart, and notifies subscribers with the new state. Operations
/// that change nothing (unknown line, clearing an empty cart) neither persist
/// nor notify.
///
/// A failed write is returned to the caller, but the in-memory cart and the
/// subscribers already reflect the mutation.
pub struct CartStore<S> {
    cart: Cart,
    storage: S,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl<S: fmt::Debug> fmt::Debug for CartStore<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("cart", &self.cart)
            .field("storage", &self.storage)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl<S: CartStorage> CartStore<S> {
    /// Open the store, restoring the persisted cart if there is one.
    ///
    /// An unreadable or incompatible snapshot is logged and replaced by an
    /// empty cart.
    pub fn open(storage: S) -> Self {
        let cart = load_snapshot(&storage).unwrap_or_default();
        debug!(lines = cart.len(), "Opened cart store");

        Self {
            cart,
            storage,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        self.cart.lines()
    }

    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.cart.subtotal()
    }

    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.cart.item_count()
    }

    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Add one unit of a product; see [`Cart::add_item`].
    ///
    /// # Errors
    ///
    /// Returns error if the snapshot cannot be written.
    pub fn add_item(
        &mut self,
        product_id: ProductId,
        name: impl Into<String>,
        unit_price_cents: Price,
        modifiers: Option<CartModifiers>,
    ) -> Result<LineKey, StorageError> {
        let key = self
            .cart
            .add_item(product_id, name, unit_price_cents, modifiers);
        self.commit()?;
        Ok(key)
    }

    /// # Errors
    ///
    /// Returns error if the snapshot cannot be written.
    pub fn increment(&mut self, key: &LineKey) -> Result<(), StorageError> {
        if self.cart.increment(key) {
            self.commit()?;
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Returns error if the snapshot cannot be written.
    pub fn decrement(&mut self, key: &LineKey) -> Result<(), StorageError> {
        if self.cart.decrement(key) {
            self.commit()?;
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Returns error if the snapshot cannot be written.
    pub fn remove(&mut self, key: &LineKey) -> Result<(), StorageError> {
        if self.cart.remove(key) {
            self.commit()?;
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Returns error if the snapshot cannot be written.
    pub fn clear(&mut self) -> Result<(), StorageError> {
        if self.cart.clear() {
            self.commit()?;
        }
        Ok(())
    }

    /// Register a listener called with the cart after every change.
    pub fn subscribe(&mut self, listener: impl FnMut(&Cart) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    fn commit(&mut self) -> Result<(), StorageError> {
        for (_, listener) in &mut self.listeners {
            listener(&self.cart);
        }

        let snapshot = PersistedCart {
            version: SNAPSHOT_VERSION,
            saved_at: Utc::now(),
            items: self.cart.lines().to_vec(),
        };
        let json = serde_json::to_string(&snapshot)?;
        self.storage.set_item(CART_STORAGE_KEY, &json)
    }
}

fn load_snapshot(storage: &impl CartStorage) -> Option<Cart> {
    let raw = match storage.get_item(CART_STORAGE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            warn!(error = %e, "Failed to read cart snapshot, starting empty");
            return None;
        }
    };

    let snapshot: PersistedCart = match serde_json::from_str(&raw) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            warn!(error = %e, "Discarding unreadable cart snapshot");
            return None;
        }
    };

    if snapshot.version != SNAPSHOT_VERSION {
        warn!(
            version = snapshot.version,
            expected = SNAPSHOT_VERSION,
            "Discarding cart snapshot with unsupported version"
        );
        return None;
    }

    Some(Cart::from_lines(snapshot.items))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::cart::{FileStorage, MemoryStorage};

    /// Storage whose writes always fail.
    #[derive(Debug, Default)]
    struct BrokenStorage;

    impl CartStorage for BrokenStorage {
        fn get_item(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        fn set_item(&mut self, key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::InvalidKey(key.to_string()))
        }
    }

    fn boniato() -> CartModifiers {
        CartModifiers::new(Some("Tradicional"), Some("Boniato"), Price::from_cents(120))
    }

    #[test]
    fn test_cart_survives_reload() {
        let tmp = tempfile::tempdir().unwrap();
        let p1 = ProductId::generate();

        let key = {
            let mut store = CartStore::open(FileStorage::new(tmp.path()));
            store.add_item(p1, "P1", Price::from_cents(500), None).unwrap();
            store.add_item(p1, "P1", Price::from_cents(620), Some(boniato())).unwrap();
            store.add_item(p1, "P1", Price::from_cents(500), None).unwrap()
        };

        let store = CartStore::open(FileStorage::new(tmp.path()));
        assert_eq!(store.lines().len(), 2);
        assert_eq!(store.cart().line(&key).unwrap().quantity, 2);
        assert_eq!(store.subtotal(), Price::from_cents(1620));
    }

    #[test]
    fn test_snapshot_format() {
        let mut store = CartStore::open(MemoryStorage::new());
        store
            .add_item(
                ProductId::generate(),
                "P1",
                Price::from_cents(620),
                Some(boniato()),
            )
            .unwrap();

        let raw = store.storage().get_item(CART_STORAGE_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();

        assert_eq!(value["version"], 1);
        assert!(value["savedAt"].is_string());
        assert_eq!(value["items"][0]["unitPriceCents"], 620);
        assert_eq!(value["items"][0]["quantity"], 1);
        assert_eq!(value["items"][0]["modifiers"]["side"], "Boniato");
        assert_eq!(value["items"][0]["modifiers"]["sidePriceCents"], 120);
    }

    #[test]
    fn test_clear_persists_empty_cart() {
        let tmp = tempfile::tempdir().unwrap();

        let mut store = CartStore::open(FileStorage::new(tmp.path()));
        store
            .add_item(ProductId::generate(), "P1", Price::from_cents(500), None)
            .unwrap();
        store.clear().unwrap();

        let reopened = CartStore::open(FileStorage::new(tmp.path()));
        assert!(reopened.cart().is_empty());
        assert_eq!(reopened.subtotal(), Price::ZERO);
    }

    #[test]
    fn test_corrupt_snapshot_starts_empty() {
        let mut storage = MemoryStorage::new();
        storage.set_item(CART_STORAGE_KEY, "{ not json").unwrap();

        let store = CartStore::open(storage);
        assert!(store.cart().is_empty());
    }

    #[test]
    fn test_unknown_version_starts_empty() {
        let mut storage = MemoryStorage::new();
        storage
            .set_item(
                CART_STORAGE_KEY,
                r#"{"version":2,"savedAt":"2026-01-01T00:00:00Z","items":[]}"#,
            )
            .unwrap();

        let store = CartStore::open(storage);
        assert!(store.cart().is_empty());
    }

    #[test]
    fn test_subscribers_see_each_change() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut store = CartStore::open(MemoryStorage::new());

        let sink = Rc::clone(&seen);
        let id = store.subscribe(move |cart| sink.borrow_mut().push(cart.subtotal()));

        let key = store
            .add_item(ProductId::generate(), "P1", Price::from_cents(500), None)
            .unwrap();
        store.increment(&key).unwrap();
        store.decrement(&key).unwrap();

        assert!(store.unsubscribe(id));
        store.clear().unwrap();

        assert_eq!(
            *seen.borrow(),
            vec![
                Price::from_cents(500),
                Price::from_cents(1000),
                Price::from_cents(500)
            ]
        );
        assert!(!store.unsubscribe(id));
    }

    #[test]
    fn test_noop_does_not_notify() {
        let calls = Rc::new(RefCell::new(0));
        let mut store = CartStore::open(MemoryStorage::new());

        let counter = Rc::clone(&calls);
        store.subscribe(move |_| *counter.borrow_mut() += 1);

        let missing = LineKey::new(ProductId::generate(), &CartModifiers::default());
        store.increment(&missing).unwrap();
        store.remove(&missing).unwrap();
        store.clear().unwrap();

        assert_eq!(*calls.borrow(), 0);
        assert!(store.storage().get_item(CART_STORAGE_KEY).unwrap().is_none());
    }

    #[test]
    fn test_write_failure_keeps_in_memory_change() {
        let mut store = CartStore::open(BrokenStorage);

        let result = store.add_item(ProductId::generate(), "P1", Price::from_cents(500), None);

        assert!(result.is_err());
        assert_eq!(store.item_count(), 1);
        assert_eq!(store.subtotal(), Price::from_cents(500));
    }
}
