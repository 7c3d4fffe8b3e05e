//! Product customization before it goes into the cart.
//!
//! A [`ProductCustomization`] holds a transient bread and side selection for
//! one product. Nothing touches the cart until [`ProductCustomization::confirm`]
//! succeeds, and both selections are required for that.

use thiserror::Error;
use tracing::debug;

use comanda_core::{MenuProduct, ModifierGroup, ModifierOption, Price};

use crate::cart::{CartModifiers, CartStorage, CartStore, LineKey, StorageError};

/// Name of the bread group in seed documents.
pub const BREAD_GROUP: &str = "Pan";

/// Name of the side group in seed documents.
pub const SIDE_GROUP: &str = "Guarnición";

const DEFAULT_BREADS: [&str; 8] = [
    "Tradicional",
    "Queso cheddar",
    "Mantequilla",
    "Lechuga de mar y aceitunas",
    "Cúrcuma y jengibre",
    "Tomate y pesto picante",
    "Alga nori y sésamo",
    "Tomate y pesto",
];

/// Errors from the customization flow.
#[derive(Debug, Error)]
pub enum CustomizeError {
    #[error("unknown bread '{0}'")]
    UnknownBread(String),

    #[error("unknown side '{0}'")]
    UnknownSide(String),

    /// A required group has no selection yet.
    #[error("missing required selection: {0}")]
    MissingSelection(&'static str),

    /// A modifier group needed to build the catalog is absent.
    #[error("modifier group '{0}' not found")]
    MissingGroup(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Why the customization was dismissed without adding anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissReason {
    CloseButton,
    Overlay,
    Escape,
}

/// Options offered for breads and sides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModifierCatalog {
    breads: Vec<ModifierOption>,
    sides: Vec<ModifierOption>,
}

impl Default for ModifierCatalog {
    fn default() -> Self {
        Self {
            breads: DEFAULT_BREADS
                .iter()
                .map(|name| ModifierOption::included(*name))
                .collect(),
            sides: vec![
                ModifierOption::included("Patatas fritas (incluido)"),
                ModifierOption::new("Boniato", Price::from_cents(120)),
            ],
        }
    }
}

impl ModifierCatalog {
    #[must_use]
    pub const fn new(breads: Vec<ModifierOption>, sides: Vec<ModifierOption>) -> Self {
        Self { breads, sides }
    }

    /// Build a catalog from seed modifier groups named [`BREAD_GROUP`] and
    /// [`SIDE_GROUP`] (matched case-insensitively).
    ///
    /// # Errors
    ///
    /// Returns `CustomizeError::MissingGroup` if either group is absent.
    pub fn from_groups(groups: &[ModifierGroup]) -> Result<Self, CustomizeError> {
        let find = |wanted: &str| {
            groups
                .iter()
                .find(|g| g.name.to_lowercase() == wanted.to_lowercase())
                .map(|g| g.options.clone())
                .ok_or_else(|| CustomizeError::MissingGroup(wanted.to_string()))
        };

        Ok(Self {
            breads: find(BREAD_GROUP)?,
            sides: find(SIDE_GROUP)?,
        })
    }

    #[must_use]
    pub fn breads(&self) -> &[ModifierOption] {
        &self.breads
    }

    #[must_use]
    pub fn sides(&self) -> &[ModifierOption] {
        &self.sides
    }
}

/// In-progress customization of one product.
#[derive(Debug, Clone)]
pub struct ProductCustomization<'c> {
    product: MenuProduct,
    catalog: &'c ModifierCatalog,
    bread: Option<&'c ModifierOption>,
    side: Option<&'c ModifierOption>,
}

impl<'c> ProductCustomization<'c> {
    /// Start customizing `product` with nothing selected.
    #[must_use]
    pub fn open(product: &MenuProduct, catalog: &'c ModifierCatalog) -> Self {
        Self {
            product: product.clone(),
            catalog,
            bread: None,
            side: None,
        }
    }

    #[must_use]
    pub const fn product(&self) -> &MenuProduct {
        &self.product
    }

    /// # Errors
    ///
    /// Returns `CustomizeError::UnknownBread` if the catalog has no such bread.
    pub fn select_bread(&mut self, name: &str) -> Result<(), CustomizeError> {
        let catalog = self.catalog;
        let option = find_option(&catalog.breads, name)
            .ok_or_else(|| CustomizeError::UnknownBread(name.to_string()))?;
        self.bread = Some(option);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `CustomizeError::UnknownSide` if the catalog has no such side.
    pub fn select_side(&mut self, name: &str) -> Result<(), CustomizeError> {
        let catalog = self.catalog;
        let option = find_option(&catalog.sides, name)
            .ok_or_else(|| CustomizeError::UnknownSide(name.to_string()))?;
        self.side = Some(option);
        Ok(())
    }

    #[must_use]
    pub fn bread(&self) -> Option<&str> {
        self.bread.map(|o| o.name.as_str())
    }

    #[must_use]
    pub fn side(&self) -> Option<&str> {
        self.side.map(|o| o.name.as_str())
    }

    /// Both required selections are made.
    #[must_use]
    pub const fn can_add(&self) -> bool {
        self.bread.is_some() && self.side.is_some()
    }

    /// Price delta of the selected side, zero when none is selected.
    #[must_use]
    pub fn side_price(&self) -> Price {
        self.side.map_or(Price::ZERO, |o| o.price_cents)
    }

    /// Base price plus side delta.
    #[must_use]
    pub fn total(&self) -> Price {
        self.product.base_price_cents + self.side_price()
    }

    /// Add the customized product to the cart.
    ///
    /// # Errors
    ///
    /// Returns `CustomizeError::MissingSelection` without touching the cart if
    /// a required selection is missing, or the storage error if the cart
    /// could not be persisted.
    pub fn confirm<S: CartStorage>(
        &self,
        store: &mut CartStore<S>,
    ) -> Result<LineKey, CustomizeError> {
        let Some(bread) = self.bread else {
            return Err(CustomizeError::MissingSelection("bread"));
        };
        let Some(side) = self.side else {
            return Err(CustomizeError::MissingSelection("side"));
        };

        let modifiers = CartModifiers::new(Some(&bread.name), Some(&side.name), side.price_cents);
        let key = store.add_item(
            self.product.id,
            self.product.name.clone(),
            self.total(),
            Some(modifiers),
        )?;

        debug!(product = %self.product.name, total = %self.total(), "Added customized product");
        Ok(key)
    }

    /// Discard the selection.
    pub fn cancel(self, reason: DismissReason) {
        debug!(product = %self.product.name, ?reason, "Customization dismissed");
    }
}

fn find_option<'a>(options: &'a [ModifierOption], name: &str) -> Option<&'a ModifierOption> {
    options.iter().find(|o| o.name == name)
}
