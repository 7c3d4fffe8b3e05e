//! Product modifier groups (bread choice, side dish, ...).

use serde::{Deserialize, Serialize};

use super::Price;

/// One selectable option inside a modifier group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifierOption {
    pub name: String,
    /// Price added to the product when this option is chosen.
    #[serde(default)]
    pub price_cents: Price,
}

impl ModifierOption {
    /// Create an option with a price delta.
    #[must_use]
    pub fn new(name: impl Into<String>, price_cents: Price) -> Self {
        Self {
            name: name.into(),
            price_cents,
        }
    }

    /// Create an option that does not change the price.
    #[must_use]
    pub fn included(name: impl Into<String>) -> Self {
        Self::new(name, Price::ZERO)
    }
}

/// A single-select group of options, as described in the seed document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifierGroup {
    pub name: String,
    #[serde(default)]
    pub required: bool,
    pub options: Vec<ModifierOption>,
}

impl ModifierGroup {
    /// Find an option by exact name.
    #[must_use]
    pub fn option(&self, name: &str) -> Option<&ModifierOption> {
        self.options.iter().find(|o| o.name == name)
    }
}
