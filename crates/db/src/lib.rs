//! PostgreSQL connection management for the bookstore service.
//!
//! Owns the pool lifecycle (bounded startup retry, liveness probe, shutdown)
//! and the closed error enumeration repositories report through.

mod error;
mod pool;
mod probe;
mod retry;

pub use error::{DbError, Result};
pub use pool::{connect_options, pool_options, Database};
pub use probe::Probe;
pub use retry::{wait_until_ready, RetryPolicy};

/// Re-exported so dependants name the same pool type.
pub use sqlx::PgPool;
