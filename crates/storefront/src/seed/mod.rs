//! Tenant seeding from a JSON document.
//!
//! Seeding is idempotent: the tenant is upserted by slug, then its stores,
//! categories and products are deleted and recreated from the document. The
//! whole sequence runs in one transaction, so a failed reseed leaves the
//! previous menu untouched.

mod document;
mod error;

pub use document::{
    CategorySeed, ProductSeed, SeedDocument, StoreSeed, TenantSeed, validate_document,
};
pub use error::SeedError;

use std::path::Path;

use sqlx::PgPool;
use tracing::{info, instrument};

use comanda_core::{Slug, TenantId};

use crate::db::tenants::{
    CreateCategory, CreateProduct, CreateStore, DeletedRows, UpsertTenant, delete_subtree,
    insert_category, insert_product, insert_store, upsert_tenant,
};

/// Outcome of a successful seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedResult {
    pub tenant_id: TenantId,
    /// Rows removed before recreating the menu.
    pub deleted: DeletedRows,
    pub categories: usize,
    pub products: usize,
}

/// Read a seed document from disk.
///
/// # Errors
///
/// Returns `SeedError::Io` if the file cannot be read and `SeedError::Parse`
/// if it is not a valid seed document.
pub async fn load_document(path: &Path) -> Result<SeedDocument, SeedError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| SeedError::Io(format!("failed to read {}: {e}", path.display())))?;

    Ok(SeedDocument::from_json(&content)?)
}

/// Seed a tenant from a JSON file.
///
/// # Errors
///
/// Returns error if the file cannot be read, does not validate, or the
/// database writes fail.
pub async fn seed_from_file(pool: &PgPool, path: &Path) -> Result<SeedResult, SeedError> {
    let doc = load_document(path).await?;
    seed_document(pool, &doc).await
}

/// Seed a tenant from an already parsed document.
///
/// # Errors
///
/// Returns `SeedError::Invalid` with every validation problem found, or a
/// database error. Nothing is written unless the whole document applies.
#[instrument(skip(pool, doc), fields(tenant = %doc.tenant.slug))]
pub async fn seed_document(pool: &PgPool, doc: &SeedDocument) -> Result<SeedResult, SeedError> {
    let errors = validate_document(doc);
    if !errors.is_empty() {
        return Err(SeedError::Invalid(errors));
    }

    let tenant_slug = parse_slug(&doc.tenant.slug)?;

    let mut tx = pool.begin().await?;

    let tenant_id = upsert_tenant(
        &mut *tx,
        &UpsertTenant {
            slug: &tenant_slug,
            name: &doc.tenant.name,
            branding: doc.tenant.branding.as_ref(),
            settings: doc.tenant.settings.as_ref(),
        },
    )
    .await?;

    let deleted = delete_subtree(&mut *tx, tenant_id).await?;

    insert_store(
        &mut *tx,
        tenant_id,
        &CreateStore {
            name: &doc.store.name,
            address: &doc.store.address,
            city: &doc.store.city,
            postal_code: &doc.store.postal_code,
        },
    )
    .await?;

    let mut products = 0;
    for category in &doc.categories {
        let category_slug = parse_slug(&category.slug)?;
        let category_id = insert_category(
            &mut *tx,
            tenant_id,
            &CreateCategory {
                name: &category.name,
                slug: &category_slug,
                sort_order: category.sort_order,
                is_featured: category.is_featured,
            },
        )
        .await?;

        for product in &category.products {
            let product_slug = parse_slug(&product.slug)?;
            let base_price_cents = i32::try_from(product.price_cents).map_err(|_| {
                SeedError::Invalid(vec![format!(
                    "product '{}': priceCents out of range",
                    product.slug
                )])
            })?;

            insert_product(
                &mut *tx,
                tenant_id,
                category_id,
                &CreateProduct {
                    name: &product.name,
                    slug: &product_slug,
                    description: &product.description,
                    base_price_cents,
                    is_active: product.is_active,
                },
            )
            .await?;
            products += 1;
        }
    }

    tx.commit().await?;

    let result = SeedResult {
        tenant_id,
        deleted,
        categories: doc.categories.len(),
        products,
    };

    info!(
        %tenant_id,
        categories = result.categories,
        products = result.products,
        deleted_products = deleted.products,
        "Seeded tenant"
    );

    Ok(result)
}

fn parse_slug(raw: &str) -> Result<Slug, SeedError> {
    Slug::parse(raw).map_err(|e| SeedError::Invalid(vec![format!("slug '{raw}': {e}")]))
}
