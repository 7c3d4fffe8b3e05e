//! Shopping cart.
//!
//! [`Cart`] is the plain model: an ordered list of lines, at most one per
//! [`LineKey`]. [`CartStore`] wraps it with persistence and change
//! notification.

mod line;
mod storage;
mod store;

pub use line::{CartLine, CartModifiers, LineKey};
pub use storage::{CartStorage, FileStorage, MemoryStorage, StorageError};
pub use store::{CART_STORAGE_KEY, CartStore, PersistedCart, SNAPSHOT_VERSION, SubscriptionId};

use comanda_core::{Price, ProductId};

/// Ordered collection of cart lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a cart from stored lines.
    ///
    /// Lines with quantity 0 are dropped and lines sharing a key are merged
    /// into the first one, so the result always satisfies the cart
    /// invariants even if the input did not.
    #[must_use]
    pub fn from_lines(lines: impl IntoIterator<Item = CartLine>) -> Self {
        let mut cart = Self::new();
        for line in lines {
            if line.quantity == 0 {
                continue;
            }
            let key = line.key();
            match cart.position(&key) {
                Some(index) => {
                    if let Some(existing) = cart.lines.get_mut(index) {
                        existing.quantity = existing.quantity.saturating_add(line.quantity);
                    }
                }
                None => cart.lines.push(line),
            }
        }
        cart
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn line(&self, key: &LineKey) -> Option<&CartLine> {
        self.lines.iter().find(|l| &l.key() == key)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0u32, |acc, l| acc.saturating_add(l.quantity))
    }

    /// Sum of unit price times quantity over all lines.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Add one unit of a product with the given selections.
    ///
    /// If a line with the same key exists its quantity goes up by one and its
    /// stored name and price are kept. Otherwise a new line is appended.
    pub fn add_item(
        &mut self,
        product_id: ProductId,
        name: impl Into<String>,
        unit_price_cents: Price,
        modifiers: Option<CartModifiers>,
    ) -> LineKey {
        let line = CartLine::new(
            product_id,
            name,
            unit_price_cents,
            modifiers.unwrap_or_default(),
        );
        let key = line.key();

        if let Some(existing) = self.line_mut(&key) {
            existing.quantity = existing.quantity.saturating_add(1);
        } else {
            self.lines.push(line);
        }

        key
    }

    /// Add one unit to a line. Returns `false` if the line does not exist.
    pub fn increment(&mut self, key: &LineKey) -> bool {
        self.line_mut(key).is_some_and(|line| {
            line.quantity = line.quantity.saturating_add(1);
            true
        })
    }

    /// Take one unit off a line, removing it when it reaches zero.
    /// Returns `false` if the line does not exist.
    pub fn decrement(&mut self, key: &LineKey) -> bool {
        let Some(index) = self.position(key) else {
            return false;
        };

        let emptied = self.lines.get_mut(index).is_some_and(|line| {
            line.quantity = line.quantity.saturating_sub(1);
            line.quantity == 0
        });

        if emptied {
            self.lines.remove(index);
        }
        true
    }

    /// Remove a line entirely. Returns `false` if the line does not exist.
    pub fn remove(&mut self, key: &LineKey) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| &l.key() != key);
        self.lines.len() != before
    }

    /// Remove every line. Returns `false` if the cart was already empty.
    pub fn clear(&mut self) -> bool {
        let had_lines = !self.lines.is_empty();
        self.lines.clear();
        had_lines
    }

    fn position(&self, key: &LineKey) -> Option<usize> {
        self.lines.iter().position(|l| &l.key() == key)
    }

    fn line_mut(&mut self, key: &LineKey) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|l| &l.key() == key)
    }
}
