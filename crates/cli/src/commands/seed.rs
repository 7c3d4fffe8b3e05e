//! Seed a tenant's menu from a JSON document.
//!
//! Validation runs before any database connection is opened, so a broken
//! file never touches the database. Re-running with the same file replaces
//! the tenant's stores, categories and products and leaves one copy of each.

use std::path::Path;

use tracing::{error, info};

use comanda_storefront::config::get_database_url;
use comanda_storefront::db;
use comanda_storefront::seed::{self, SeedError, validate_document};

/// Seed a tenant from a JSON file.
///
/// # Errors
///
/// Returns an error if the database URL is missing, the file cannot be read
/// or fails validation, or the database writes fail.
pub async fn tenant(file_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let database_url = get_database_url("STOREFRONT_DATABASE_URL")?;

    info!(path = %file_path.display(), "Loading seed document");
    let doc = seed::load_document(file_path).await?;
    info!(
        tenant = %doc.tenant.slug,
        categories = doc.categories.len(),
        products = doc.product_count(),
        "Parsed seed document"
    );

    let errors = validate_document(&doc);
    if !errors.is_empty() {
        error!("Seed document validation failed:");
        for err in &errors {
            error!("  - {err}");
        }
        return Err(SeedError::Invalid(errors).into());
    }

    let pool = db::create_pool(&database_url).await?;
    info!("Connected to database");

    let result = seed::seed_document(&pool, &doc).await?;

    #[allow(clippy::print_stdout)]
    {
        println!("Seeded tenant '{}' ({})", doc.tenant.slug, result.tenant_id);
        println!("  Categories: {}", result.categories);
        println!("  Products:   {}", result.products);
        println!(
            "  Replaced:   {} products, {} categories, {} stores",
            result.deleted.products, result.deleted.categories, result.deleted.stores
        );
    }

    Ok(())
}
