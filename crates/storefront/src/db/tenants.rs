//! Write operations on a tenant's subtree, used by the seed procedure.
//!
//! Every function takes a `PgConnection` so callers can run the whole
//! sequence inside one transaction.

use sqlx::PgConnection;
use tracing::{debug, instrument};

use comanda_core::{CategoryId, ProductId, Slug, StoreId, TenantId};

use super::{RepositoryError, map_unique_violation};

/// Parameters for creating or refreshing a tenant.
#[derive(Debug)]
pub struct UpsertTenant<'a> {
    pub slug: &'a Slug,
    pub name: &'a str,
    pub branding: Option<&'a serde_json::Value>,
    pub settings: Option<&'a serde_json::Value>,
}

/// Parameters for creating a store.
#[derive(Debug)]
pub struct CreateStore<'a> {
    pub name: &'a str,
    pub address: &'a str,
    pub city: &'a str,
    pub postal_code: &'a str,
}

/// Parameters for creating a category.
#[derive(Debug)]
pub struct CreateCategory<'a> {
    pub name: &'a str,
    pub slug: &'a Slug,
    pub sort_order: i32,
    pub is_featured: bool,
}

/// Parameters for creating a product.
#[derive(Debug)]
pub struct CreateProduct<'a> {
    pub name: &'a str,
    pub slug: &'a Slug,
    pub description: &'a str,
    pub base_price_cents: i32,
    pub is_active: bool,
}

/// Rows removed by [`delete_subtree`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DeletedRows {
    pub products: u64,
    pub categories: u64,
    pub stores: u64,
}

/// Insert a tenant, or refresh name/branding/settings if the slug exists.
///
/// # Errors
///
/// Returns error if the database upsert fails.
#[instrument(skip(conn, params), fields(tenant = %params.slug))]
pub async fn upsert_tenant(
    conn: &mut PgConnection,
    params: &UpsertTenant<'_>,
) -> Result<TenantId, RepositoryError> {
    let (id,): (TenantId,) = sqlx::query_as(
        r"
        INSERT INTO storefront.tenant (slug, name, branding, settings)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (slug) DO UPDATE
        SET name = EXCLUDED.name,
            branding = EXCLUDED.branding,
            settings = EXCLUDED.settings,
            updated_at = now()
        RETURNING id
        ",
    )
    .bind(params.slug)
    .bind(params.name)
    .bind(params.branding)
    .bind(params.settings)
    .fetch_one(&mut *conn)
    .await?;

    debug!(%id, "Upserted tenant");
    Ok(id)
}

/// Delete all products, categories and stores belonging to a tenant.
///
/// The tenant row itself is kept so its ID stays stable across reseeds.
///
/// # Errors
///
/// Returns error if any delete fails.
#[instrument(skip(conn))]
pub async fn delete_subtree(
    conn: &mut PgConnection,
    tenant_id: TenantId,
) -> Result<DeletedRows, RepositoryError> {
    let products = sqlx::query("DELETE FROM storefront.product WHERE tenant_id = $1")
        .bind(tenant_id)
        .execute(&mut *conn)
        .await?
        .rows_affected();

    let categories = sqlx::query("DELETE FROM storefront.category WHERE tenant_id = $1")
        .bind(tenant_id)
        .execute(&mut *conn)
        .await?
        .rows_affected();

    let stores = sqlx::query("DELETE FROM storefront.store WHERE tenant_id = $1")
        .bind(tenant_id)
        .execute(&mut *conn)
        .await?
        .rows_affected();

    Ok(DeletedRows {
        products,
        categories,
        stores,
    })
}

/// Insert a store for a tenant.
///
/// # Errors
///
/// Returns error if the insert fails.
pub async fn insert_store(
    conn: &mut PgConnection,
    tenant_id: TenantId,
    params: &CreateStore<'_>,
) -> Result<StoreId, RepositoryError> {
    let (id,): (StoreId,) = sqlx::query_as(
        r"
        INSERT INTO storefront.store (tenant_id, name, address, city, postal_code)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id
        ",
    )
    .bind(tenant_id)
    .bind(params.name)
    .bind(params.address)
    .bind(params.city)
    .bind(params.postal_code)
    .fetch_one(&mut *conn)
    .await?;

    Ok(id)
}

/// Insert a category for a tenant.
///
/// # Errors
///
/// Returns `RepositoryError::Conflict` if the slug is already used by the tenant.
pub async fn insert_category(
    conn: &mut PgConnection,
    tenant_id: TenantId,
    params: &CreateCategory<'_>,
) -> Result<CategoryId, RepositoryError> {
    let (id,): (CategoryId,) = sqlx::query_as(
        r"
        INSERT INTO storefront.category (tenant_id, name, slug, sort_order, is_featured)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id
        ",
    )
    .bind(tenant_id)
    .bind(params.name)
    .bind(params.slug)
    .bind(params.sort_order)
    .bind(params.is_featured)
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| map_unique_violation(e, &format!("category '{}'", params.slug)))?;

    Ok(id)
}

/// Insert a product into a category.
///
/// # Errors
///
/// Returns `RepositoryError::Conflict` if the slug is already used by the tenant.
pub async fn insert_product(
    conn: &mut PgConnection,
    tenant_id: TenantId,
    category_id: CategoryId,
    params: &CreateProduct<'_>,
) -> Result<ProductId, RepositoryError> {
    let (id,): (ProductId,) = sqlx::query_as(
        r"
        INSERT INTO storefront.product
            (tenant_id, category_id, name, slug, description, base_price_cents, is_active)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id
        ",
    )
    .bind(tenant_id)
    .bind(category_id)
    .bind(params.name)
    .bind(params.slug)
    .bind(params.description)
    .bind(params.base_price_cents)
    .bind(params.is_active)
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| map_unique_violation(e, &format!("product '{}'", params.slug)))?;

    Ok(id)
}
