//! Cart line items and their identity.

use serde::{Deserialize, Serialize};

use comanda_core::{Price, ProductId};

/// Selections attached to a line: bread, side and the side's price delta.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartModifiers {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bread: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<String>,
    #[serde(default)]
    pub side_price_cents: Price,
}

impl CartModifiers {
    /// Build modifiers, treating empty names as "not selected".
    #[must_use]
    pub fn new(bread: Option<&str>, side: Option<&str>, side_price_cents: Price) -> Self {
        Self {
            bread: non_empty(bread),
            side: non_empty(side),
            side_price_cents,
        }
        .normalized()
    }

    /// `true` when nothing was selected and there is no price delta.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bread.is_none() && self.side.is_none() && self.side_price_cents == Price::ZERO
    }

    fn normalized(self) -> Self {
        Self {
            bread: non_empty(self.bread.as_deref()),
            side: non_empty(self.side.as_deref()),
            side_price_cents: self.side_price_cents,
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|s| !s.is_empty()).map(str::to_string)
}

/// Identity of a cart line.
///
/// Two additions with the same product and the same selections land on the
/// same line. The key is compared field by field, so modifier names can
/// contain any characters without colliding.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LineKey {
    pub product_id: ProductId,
    pub bread: Option<String>,
    pub side: Option<String>,
    pub side_price_cents: Price,
}

impl LineKey {
    #[must_use]
    pub fn new(product_id: ProductId, modifiers: &CartModifiers) -> Self {
        let modifiers = modifiers.clone().normalized();
        Self {
            product_id,
            bread: modifiers.bread,
            side: modifiers.side,
            side_price_cents: modifiers.side_price_cents,
        }
    }
}

/// One line of the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: ProductId,
    /// Product name at the time it was added.
    pub name: String,
    /// Final unit price, base plus modifier deltas.
    pub unit_price_cents: Price,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "CartModifiers::is_empty")]
    pub modifiers: CartModifiers,
}

impl CartLine {
    /// New line with quantity 1.
    #[must_use]
    pub fn new(
        product_id: ProductId,
        name: impl Into<String>,
        unit_price_cents: Price,
        modifiers: CartModifiers,
    ) -> Self {
        Self {
            product_id,
            name: name.into(),
            unit_price_cents,
            quantity: 1,
            modifiers: modifiers.normalized(),
        }
    }

    #[must_use]
    pub fn key(&self) -> LineKey {
        LineKey::new(self.product_id, &self.modifiers)
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price_cents * self.quantity
    }
}
