//! Seed document format and validation.
//!
//! ## JSON Format
//!
//! ```json
//! {
//!   "tenant": { "name": "Estafeten", "slug": "estafeten" },
//!   "store": {
//!     "name": "Estafeten Centro",
//!     "address": "Calle Mayor 1",
//!     "city": "Pamplona",
//!     "postalCode": "31001"
//!   },
//!   "modifierGroups": [
//!     { "name": "Pan", "required": true, "options": [{ "name": "Tradicional" }] }
//!   ],
//!   "categories": [
//!     {
//!       "name": "Bocadillos",
//!       "slug": "bocadillos",
//!       "sortOrder": 1,
//!       "products": [
//!         { "name": "Lomo con queso", "slug": "lomo-con-queso", "priceCents": 650 }
//!       ]
//!     }
//!   ]
//! }
//! ```

use std::collections::HashSet;

use serde::Deserialize;

use comanda_core::{ModifierGroup, Slug};

/// Full seed file structure.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedDocument {
    pub tenant: TenantSeed,
    pub store: StoreSeed,
    /// Customization groups offered on products. Validated here, consumed by
    /// ordering clients; not stored in the database.
    #[serde(default)]
    pub modifier_groups: Vec<ModifierGroup>,
    pub categories: Vec<CategorySeed>,
}

/// Tenant section of the seed file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantSeed {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub branding: Option<serde_json::Value>,
    #[serde(default)]
    pub settings: Option<serde_json::Value>,
}

/// Store section of the seed file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSeed {
    pub name: String,
    pub address: String,
    pub city: String,
    pub postal_code: String,
}

/// A category and its products.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySeed {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub products: Vec<ProductSeed>,
}

/// A product inside a category.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSeed {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
    pub price_cents: i64,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

const fn default_active() -> bool {
    true
}

impl SeedDocument {
    /// Parse a seed document from JSON text.
    ///
    /// # Errors
    ///
    /// Returns `serde_json::Error` if the text is not a valid seed document.
    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Total number of products across all categories.
    #[must_use]
    pub fn product_count(&self) -> usize {
        self.categories.iter().map(|c| c.products.len()).sum()
    }
}

/// Validate a seed document.
///
/// Returns a list of validation errors (empty if valid).
#[must_use]
pub fn validate_document(doc: &SeedDocument) -> Vec<String> {
    let mut errors = Vec::new();

    if doc.tenant.name.trim().is_empty() {
        errors.push("tenant: name is empty".to_string());
    }
    if let Err(e) = Slug::parse(&doc.tenant.slug) {
        errors.push(format!("tenant: slug '{}': {e}", doc.tenant.slug));
    }

    if doc.store.name.trim().is_empty() {
        errors.push("store: name is empty".to_string());
    }

    validate_modifier_groups(&doc.modifier_groups, &mut errors);

    let mut category_slugs = HashSet::new();
    let mut product_slugs = HashSet::new();

    for category in &doc.categories {
        let ctx = format!("category '{}'", category.slug);

        if category.name.trim().is_empty() {
            errors.push(format!("{ctx}: name is empty"));
        }
        if let Err(e) = Slug::parse(&category.slug) {
            errors.push(format!("{ctx}: {e}"));
        }
        if !category_slugs.insert(category.slug.as_str()) {
            errors.push(format!("{ctx}: duplicate category slug"));
        }

        for product in &category.products {
            let ctx = format!("{ctx} / product '{}'", product.slug);

            if product.name.trim().is_empty() {
                errors.push(format!("{ctx}: name is empty"));
            }
            if let Err(e) = Slug::parse(&product.slug) {
                errors.push(format!("{ctx}: {e}"));
            }
            if !product_slugs.insert(product.slug.as_str()) {
                errors.push(format!("{ctx}: duplicate product slug"));
            }
            if product.price_cents < 0 {
                errors.push(format!("{ctx}: priceCents must not be negative"));
            } else if i32::try_from(product.price_cents).is_err() {
                errors.push(format!("{ctx}: priceCents is too large"));
            }
        }
    }

    errors
}

fn validate_modifier_groups(groups: &[ModifierGroup], errors: &mut Vec<String>) {
    for group in groups {
        let ctx = format!("modifier group '{}'", group.name);

        if group.name.trim().is_empty() {
            errors.push("modifier group: name is empty".to_string());
        }
        if group.options.is_empty() {
            errors.push(format!("{ctx}: has no options"));
        }

        let mut names = HashSet::new();
        for option in &group.options {
            if option.name.trim().is_empty() {
                errors.push(format!("{ctx}: option name is empty"));
            }
            if !names.insert(option.name.as_str()) {
                errors.push(format!("{ctx}: duplicate option '{}'", option.name));
            }
            if option.price_cents.is_negative() {
                errors.push(format!(
                    "{ctx}: option '{}' has a negative price",
                    option.name
                ));
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn valid_json() -> serde_json::Value {
        serde_json::json!({
            "tenant": { "name": "Estafeten", "slug": "estafeten" },
            "store": {
                "name": "Estafeten Centro",
                "address": "Calle Estafeta 1",
                "city": "Pamplona",
                "postalCode": "31001"
            },
            "modifierGroups": [
                {
                    "name": "Guarnición",
                    "required": true,
                    "options": [
                        { "name": "Patatas fritas (incluido)" },
                        { "name": "Boniato", "priceCents": 120 }
                    ]
                }
            ],
            "categories": [
                {
                    "name": "Bocadillos",
                    "slug": "bocadillos",
                    "sortOrder": 1,
                    "products": [
                        { "name": "Lomo con queso", "slug": "lomo-con-queso", "priceCents": 650 },
                        { "name": "Vegetal", "slug": "vegetal", "priceCents": 500, "isActive": false }
                    ]
                },
                { "name": "Bebidas", "slug": "bebidas" }
            ]
        })
    }

    fn parse(value: serde_json::Value) -> SeedDocument {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_parse_applies_defaults() {
        let doc = parse(valid_json());
        assert_eq!(doc.product_count(), 2);

        let bebidas = doc.categories.get(1).unwrap();
        assert_eq!(bebidas.sort_order, 0);
        assert!(!bebidas.is_featured);
        assert!(bebidas.products.is_empty());

        let lomo = doc.categories.first().unwrap().products.first().unwrap();
        assert!(lomo.is_active);
        assert_eq!(lomo.description, "");

        let side = doc.modifier_groups.first().unwrap();
        assert_eq!(side.option("Patatas fritas (incluido)").unwrap().price_cents.cents(), 0);
    }

    #[test]
    fn test_valid_document_has_no_errors() {
        let doc = parse(valid_json());
        assert!(validate_document(&doc).is_empty());
    }

    #[test]
    fn test_duplicate_slugs_are_reported() {
        let mut value = valid_json();
        value["categories"][1]["slug"] = "bocadillos".into();
        value["categories"][1]["products"] = serde_json::json!([
            { "name": "Vegetal otra vez", "slug": "vegetal", "priceCents": 500 }
        ]);

        let errors = validate_document(&parse(value));
        assert_eq!(errors.len(), 2, "{errors:?}");
        assert!(errors.iter().any(|e| e.contains("duplicate category slug")));
        assert!(errors.iter().any(|e| e.contains("duplicate product slug")));
    }

    #[test]
    fn test_bad_slugs_and_prices_are_reported() {
        let mut value = valid_json();
        value["tenant"]["slug"] = "Estafeten".into();
        value["categories"][0]["products"][0]["priceCents"] = (-1).into();

        let errors = validate_document(&parse(value));
        assert!(errors.iter().any(|e| e.starts_with("tenant: slug")));
        assert!(errors.iter().any(|e| e.contains("must not be negative")));
    }

    #[test]
    fn test_modifier_group_problems_are_reported() {
        let mut value = valid_json();
        value["modifierGroups"][0]["options"] = serde_json::json!([
            { "name": "Boniato", "priceCents": 120 },
            { "name": "Boniato", "priceCents": -5 }
        ]);

        let errors = validate_document(&parse(value));
        assert!(errors.iter().any(|e| e.contains("duplicate option")));
        assert!(errors.iter().any(|e| e.contains("negative price")));
    }

    #[test]
    fn test_missing_required_field_fails_to_parse() {
        let mut value = valid_json();
        value["store"].as_object_mut().unwrap().remove("postalCode");
        assert!(serde_json::from_value::<SeedDocument>(value).is_err());
    }
}
