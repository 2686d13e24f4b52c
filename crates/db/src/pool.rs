use std::time::Duration;

use async_trait::async_trait;
use bookstore_kernel::settings::{DatabaseSettings, PoolSettings, SslMode};
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions, PgSslMode};
use tracing::{debug, info};

use crate::error::Result;
use crate::probe::Probe;
use crate::retry::{wait_until_ready, RetryPolicy};

/// Owner of the store connection pool.
///
/// Built once at startup and released exactly once through
/// [`Database::shutdown`]. Repositories and probes receive clones of the
/// inner pool, which share the same connections.
#[derive(Debug)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Open the pool and block until the store answers a ping, or the retry
    /// budget from `settings.retry` runs out.
    pub async fn connect(settings: &DatabaseSettings) -> Result<Self> {
        Self::connect_with_policy(settings, &RetryPolicy::from(&settings.retry)).await
    }

    /// Same as [`Database::connect`] with an explicit retry budget.
    pub async fn connect_with_policy(
        settings: &DatabaseSettings,
        policy: &RetryPolicy,
    ) -> Result<Self> {
        log_pool_settings(settings);

        let pool = pool_options(&settings.pool).connect_lazy_with(connect_options(settings));
        let database = Self { pool };

        match wait_until_ready(&database, policy).await {
            Ok(attempt) => {
                info!(
                    host = %settings.host,
                    database = %settings.name,
                    attempt,
                    "successfully connected to database"
                );
                Ok(database)
            }
            Err(err) => {
                database.pool.close().await;
                Err(err)
            }
        }
    }

    /// Pool handle for repositories and probes.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Close every pooled connection. Waits for checked-out connections to be
    /// returned first.
    pub async fn shutdown(self) {
        info!(open_connections = self.pool.size(), "closing database pool");
        self.pool.close().await;
        info!("database pool closed");
    }
}

#[async_trait]
impl Probe for Database {
    async fn ping(&self) -> Result<()> {
        Probe::ping(&self.pool).await
    }
}

/// Connection parameters for a single store connection.
pub fn connect_options(settings: &DatabaseSettings) -> PgConnectOptions {
    PgConnectOptions::new()
        .host(&settings.host)
        .port(settings.port)
        .username(&settings.user)
        .password(&settings.password)
        .database(&settings.name)
        .ssl_mode(ssl_mode(settings.ssl_mode))
}

/// Pool bounds.
///
/// sqlx has no separate cap on idle connections; idle connections are reaped
/// after `idle_timeout_secs` instead.
pub fn pool_options(settings: &PoolSettings) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(settings.max_open_connections)
        .min_connections(0)
        .max_lifetime(Duration::from_secs(settings.max_lifetime_secs))
        .idle_timeout(Duration::from_secs(settings.idle_timeout_secs))
        .acquire_timeout(Duration::from_secs(settings.acquire_timeout_secs))
}

fn ssl_mode(mode: SslMode) -> PgSslMode {
    match mode {
        SslMode::Disable => PgSslMode::Disable,
        SslMode::Prefer => PgSslMode::Prefer,
        SslMode::Require => PgSslMode::Require,
    }
}

fn log_pool_settings(settings: &DatabaseSettings) {
    debug!(
        host = %settings.host,
        port = settings.port,
        database = %settings.name,
        max_open_connections = settings.pool.max_open_connections,
        max_idle_connections = settings.pool.max_idle_connections,
        max_lifetime_secs = settings.pool.max_lifetime_secs,
        idle_timeout_secs = settings.pool.idle_timeout_secs,
        retry_attempts = settings.retry.attempts,
        retry_delay_ms = settings.retry.delay_ms,
        "opening database pool"
    );
}
