//! Menu repository: tenant lookup and category/product listing.
//!
//! Queries use runtime `query_as` with `FromRow` types so the crate builds
//! without an offline query cache.

use std::collections::HashMap;

use sqlx::PgPool;
use tracing::{debug, instrument};

use comanda_core::{
    CategoryId, MenuCategory, MenuProduct, MenuResponse, Price, ProductId, Slug, TenantId,
    TenantSummary,
};

use super::RepositoryError;

/// Internal row type for the tenant lookup.
#[derive(Debug, sqlx::FromRow)]
struct TenantRow {
    id: TenantId,
    slug: Slug,
    name: String,
    branding: Option<serde_json::Value>,
    settings: Option<serde_json::Value>,
}

/// Category row as stored, before products are attached.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CategoryRow {
    pub id: CategoryId,
    pub name: String,
    pub slug: Slug,
    pub sort_order: i32,
    pub is_featured: bool,
}

/// Active product row with its owning category.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductRow {
    pub id: ProductId,
    pub category_id: CategoryId,
    pub name: String,
    pub description: String,
    pub base_price_cents: i32,
}

/// Repository for menu reads.
pub struct MenuRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> MenuRepository<'a> {
    /// Create a new menu repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a tenant by slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self), fields(tenant = %slug))]
    pub async fn find_tenant(&self, slug: &str) -> Result<Option<TenantSummary>, RepositoryError> {
        let row = sqlx::query_as::<_, TenantRow>(
            r"
            SELECT id, slug, name, branding, settings
            FROM storefront.tenant
            WHERE slug = $1
            ",
        )
        .bind(slug)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|r| TenantSummary {
            id: r.id,
            slug: r.slug,
            name: r.name,
            branding: r.branding,
            settings: r.settings,
        }))
    }

    /// List a tenant's categories ordered by sort order, then name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn categories(&self, tenant_id: TenantId) -> Result<Vec<CategoryRow>, RepositoryError> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            r"
            SELECT id, name, slug, sort_order, is_featured
            FROM storefront.category
            WHERE tenant_id = $1
            ORDER BY sort_order ASC, name ASC, id ASC
            ",
        )
        .bind(tenant_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// List a tenant's active products ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn active_products(
        &self,
        tenant_id: TenantId,
    ) -> Result<Vec<ProductRow>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT id, category_id, name, description, base_price_cents
            FROM storefront.product
            WHERE tenant_id = $1 AND is_active = TRUE
            ORDER BY name ASC, id ASC
            ",
        )
        .bind(tenant_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Build the full menu for a tenant that has already been resolved.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if either query fails.
    #[instrument(skip(self, tenant), fields(tenant = %tenant.slug))]
    pub async fn menu_for(&self, tenant: TenantSummary) -> Result<MenuResponse, RepositoryError> {
        let categories = self.categories(tenant.id).await?;
        let products = self.active_products(tenant.id).await?;

        debug!(
            categories = categories.len(),
            products = products.len(),
            "Loaded menu rows"
        );

        Ok(MenuResponse {
            tenant,
            categories: group_products(categories, products),
        })
    }
}

/// Attach products to their categories.
///
/// Category order and per-category product order are both taken from the
/// input slices. Categories without products are kept.
#[must_use]
pub fn group_products(categories: Vec<CategoryRow>, products: Vec<ProductRow>) -> Vec<MenuCategory> {
    let mut by_category: HashMap<CategoryId, Vec<MenuProduct>> = HashMap::new();
    for p in products {
        by_category.entry(p.category_id).or_default().push(MenuProduct {
            id: p.id,
            name: p.name,
            description: p.description,
            base_price_cents: Price::from_cents(i64::from(p.base_price_cents)),
        });
    }

    categories
        .into_iter()
        .map(|c| MenuCategory {
            products: by_category.remove(&c.id).unwrap_or_default(),
            id: c.id,
            name: c.name,
            slug: c.slug,
            sort_order: c.sort_order,
            is_featured: c.is_featured,
        })
        .collect()
}
