//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::AppConfig;
use crate::i18n::Translator;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources: configuration, the database pool, and the
/// translation tables. All of it is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AppConfig,
    pool: PgPool,
    translator: Arc<Translator>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: AppConfig, pool: PgPool, translator: Translator) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                translator: Arc::new(translator),
            }),
        }
    }

    /// Get a reference to the application configuration.
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the translation tables.
    #[must_use]
    pub fn translator(&self) -> &Translator {
        &self.inner.translator
    }

    /// Get a cloneable handle to the translation tables.
    #[must_use]
    pub fn translator_arc(&self) -> Arc<Translator> {
        Arc::clone(&self.inner.translator)
    }
}
