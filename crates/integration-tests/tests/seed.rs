//! Seed procedure against a real database.
//!
//! Require `COMANDA_TEST_DATABASE_URL`; run with `-- --ignored`.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use comanda_integration_tests::{TestContext, fixture_document, unique_slug};
use comanda_storefront::db::MenuRepository;
use comanda_storefront::seed::{SeedError, seed_document};

async fn count(ctx: &TestContext, table: &str, slug: &str) -> i64 {
    let sql = format!(
        "SELECT COUNT(*) FROM storefront.{table} t \
         JOIN storefront.tenant tn ON tn.id = t.tenant_id WHERE tn.slug = $1"
    );
    let (n,): (i64,) = sqlx::query_as(&sql)
        .bind(slug)
        .fetch_one(&ctx.pool)
        .await
        .unwrap();
    n
}

#[tokio::test]
#[ignore = "requires a PostgreSQL database"]
async fn test_reseeding_is_idempotent() {
    let ctx = TestContext::new().await;
    let slug = unique_slug("estafeten");
    let doc = fixture_document(&slug);

    let first = seed_document(&ctx.pool, &doc).await.unwrap();
    assert_eq!(first.categories, 3);
    assert_eq!(first.products, 5);
    assert_eq!(first.deleted.products, 0);

    let second = seed_document(&ctx.pool, &doc).await.unwrap();
    assert_eq!(second.tenant_id, first.tenant_id);
    assert_eq!(second.deleted.products, 5);
    assert_eq!(second.deleted.categories, 3);
    assert_eq!(second.deleted.stores, 1);

    assert_eq!(count(&ctx, "store", &slug).await, 1);
    assert_eq!(count(&ctx, "category", &slug).await, 3);
    assert_eq!(count(&ctx, "product", &slug).await, 5);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL database"]
async fn test_reseed_refreshes_tenant_and_replaces_menu() {
    let ctx = TestContext::new().await;
    let slug = unique_slug("estafeten");

    seed_document(&ctx.pool, &fixture_document(&slug))
        .await
        .unwrap();

    let mut doc = fixture_document(&slug);
    doc.tenant.name = "Estafeten Renovado".to_string();
    doc.categories.truncate(1);
    seed_document(&ctx.pool, &doc).await.unwrap();

    let repo = MenuRepository::new(&ctx.pool);
    let tenant = repo.find_tenant(&slug).await.unwrap().unwrap();
    assert_eq!(tenant.name, "Estafeten Renovado");

    let menu = repo.menu_for(tenant).await.unwrap();
    assert_eq!(menu.categories.len(), 1);
    assert_eq!(count(&ctx, "product", &slug).await, 1);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL database"]
async fn test_invalid_document_writes_nothing() {
    let ctx = TestContext::new().await;
    let slug = unique_slug("estafeten");

    let mut doc = fixture_document(&slug);
    doc.categories[0].slug = "bocadillos".to_string();

    let err = seed_document(&ctx.pool, &doc).await.unwrap_err();
    assert!(matches!(err, SeedError::Invalid(_)));

    let repo = MenuRepository::new(&ctx.pool);
    assert!(repo.find_tenant(&slug).await.unwrap().is_none());
}
