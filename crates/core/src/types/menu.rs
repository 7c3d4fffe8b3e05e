//! Menu wire format returned by `GET /api/menu/{tenant}`.
//!
//! The storefront serializes these types and the client deserializes them,
//! so field names are fixed to the camelCase JSON contract.

use serde::{Deserialize, Serialize};

use super::{CategoryId, Price, ProductId, Slug, TenantId};

/// Tenant identity and branding as exposed to the ordering page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantSummary {
    pub id: TenantId,
    pub slug: Slug,
    pub name: String,
    /// Free-form branding document (colors, logo, ...), `null` when unset.
    pub branding: Option<serde_json::Value>,
    /// Free-form tenant settings, `null` when unset.
    pub settings: Option<serde_json::Value>,
}

/// An orderable product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuProduct {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub base_price_cents: Price,
}

/// A menu section with its active products, already sorted by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuCategory {
    pub id: CategoryId,
    pub name: String,
    pub slug: Slug,
    pub sort_order: i32,
    pub is_featured: bool,
    pub products: Vec<MenuProduct>,
}

/// Full menu payload for one tenant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuResponse {
    pub tenant: TenantSummary,
    pub categories: Vec<MenuCategory>,
}

impl MenuResponse {
    /// Iterate over every product in menu order.
    pub fn products(&self) -> impl Iterator<Item = &MenuProduct> {
        self.categories.iter().flat_map(|c| c.products.iter())
    }

    /// Look up a product by ID.
    #[must_use]
    pub fn product(&self, id: ProductId) -> Option<&MenuProduct> {
        self.products().find(|p| p.id == id)
    }

    /// Look up a product by its display name, ignoring case.
    #[must_use]
    pub fn product_named(&self, name: &str) -> Option<&MenuProduct> {
        self.products().find(|p| p.name.eq_ignore_ascii_case(name))
    }
}
