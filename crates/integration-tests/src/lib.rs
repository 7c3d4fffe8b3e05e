//! Integration tests for Comanda.
//!
//! # Running Tests
//!
//! ```bash
//! # Point at a disposable database
//! export COMANDA_TEST_DATABASE_URL=postgres://localhost/comanda_test
//!
//! # Run integration tests (ignored by default)
//! cargo test -p comanda-integration-tests -- --ignored
//! ```
//!
//! Each test seeds its own tenant under a random slug and serves the
//! storefront router in-process on an ephemeral port, so tests can share one
//! database and run in parallel.

use std::net::SocketAddr;

use secrecy::SecretString;
use sqlx::PgPool;

use comanda_storefront::config::StorefrontConfig;
use comanda_storefront::routes;
use comanda_storefront::seed::SeedDocument;
use comanda_storefront::state::AppState;

/// Environment variable holding the test database URL.
pub const TEST_DATABASE_URL: &str = "COMANDA_TEST_DATABASE_URL";

/// Shared handles for one integration test.
pub struct TestContext {
    pub client: reqwest::Client,
    pub storefront_url: String,
    pub pool: PgPool,
}

impl TestContext {
    /// Connect to the test database, apply migrations and start a storefront
    /// on an ephemeral port.
    ///
    /// # Panics
    ///
    /// Panics if the database URL is not set or the database is unreachable.
    pub async fn new() -> Self {
        let database_url =
            std::env::var(TEST_DATABASE_URL).expect("COMANDA_TEST_DATABASE_URL must be set");

        let pool = PgPool::connect(&database_url)
            .await
            .expect("test database should be reachable");

        sqlx::migrate!("../storefront/migrations")
            .run(&pool)
            .await
            .expect("migrations should apply");

        let addr = spawn_storefront(&database_url, pool.clone()).await;

        Self {
            client: reqwest::Client::new(),
            storefront_url: format!("http://{addr}"),
            pool,
        }
    }

    /// URL for a path on the in-process storefront.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.storefront_url)
    }
}

#[allow(clippy::print_stderr)]
async fn spawn_storefront(database_url: &str, pool: PgPool) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("ephemeral port should bind");
    let addr = listener.local_addr().expect("listener has an address");

    let config = StorefrontConfig {
        database_url: SecretString::from(database_url.to_string()),
        host: addr.ip(),
        port: addr.port(),
        cors_origins: Vec::new(),
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    };

    let app = routes::app(AppState::new(config, pool));
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("test storefront stopped: {e}");
        }
    });

    addr
}

/// A random slug so concurrent tests never share a tenant.
#[must_use]
pub fn unique_slug(prefix: &str) -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("{prefix}-{}", suffix.get(..12).unwrap_or(&suffix))
}

/// Seed document with out-of-order categories and an inactive product.
///
/// # Panics
///
/// Panics if the built-in fixture does not deserialize.
#[must_use]
pub fn fixture_document(tenant_slug: &str) -> SeedDocument {
    serde_json::from_value(serde_json::json!({
        "tenant": {
            "name": "Estafeten Test",
            "slug": tenant_slug,
            "branding": { "primaryColor": "#b91c1c" }
        },
        "store": {
            "name": "Estafeten Centro",
            "address": "Calle Estafeta 1",
            "city": "Pamplona",
            "postalCode": "31001"
        },
        "categories": [
            {
                "name": "Bebidas",
                "slug": "bebidas",
                "sortOrder": 2,
                "products": [
                    { "name": "Agua", "slug": "agua", "priceCents": 150 }
                ]
            },
            {
                "name": "Postres",
                "slug": "postres",
                "sortOrder": 1
            },
            {
                "name": "Bocadillos",
                "slug": "bocadillos",
                "sortOrder": 1,
                "isFeatured": true,
                "products": [
                    { "name": "Vegetal", "slug": "vegetal", "priceCents": 500 },
                    { "name": "Calamares", "slug": "calamares", "priceCents": 700 },
                    { "name": "Lomo con queso", "slug": "lomo-con-queso", "priceCents": 650 },
                    { "name": "Anchoas", "slug": "anchoas", "priceCents": 800, "isActive": false }
                ]
            }
        ]
    }))
    .expect("fixture document should deserialize")
}
