//! Shared handler state.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::StorefrontConfig;
use crate::db::MenuRepository;

/// Handles shared by every request.
///
/// `PgPool` is already reference-counted, so only the configuration sits
/// behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    config: Arc<StorefrontConfig>,
    pool: PgPool,
}

impl AppState {
    #[must_use]
    pub fn new(config: StorefrontConfig, pool: PgPool) -> Self {
        Self {
            config: Arc::new(config),
            pool,
        }
    }

    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Menu reads against this state's pool.
    #[must_use]
    pub const fn menu(&self) -> MenuRepository<'_> {
        MenuRepository::new(&self.pool)
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("pool_size", &self.pool.size())
            .finish()
    }
}
