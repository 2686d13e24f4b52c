use async_trait::async_trait;
use sqlx::{Connection, PgPool};

use crate::error::Result;

/// Lightweight round-trip used to confirm the store is reachable.
#[async_trait]
pub trait Probe: Send + Sync {
    async fn ping(&self) -> Result<()>;
}

#[async_trait]
impl Probe for PgPool {
    async fn ping(&self) -> Result<()> {
        let mut conn = self.acquire().await?;
        conn.ping().await?;
        Ok(())
    }
}
