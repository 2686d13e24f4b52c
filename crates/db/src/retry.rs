use std::time::Duration;

use bookstore_kernel::settings::RetrySettings;
use tracing::{info, warn};

use crate::error::{DbError, Result};
use crate::probe::Probe;

/// Fixed-interval retry budget for the startup ping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    attempts: u32,
    delay: Duration,
}

impl RetryPolicy {
    /// A budget of zero attempts is clamped to a single attempt.
    pub fn new(attempts: u32, delay: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            delay,
        }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(10, Duration::from_secs(3))
    }
}

impl From<&RetrySettings> for RetryPolicy {
    fn from(settings: &RetrySettings) -> Self {
        Self::new(settings.attempts, Duration::from_millis(settings.delay_ms))
    }
}

/// Ping `probe` until it answers or the budget runs out.
///
/// Returns the attempt number that succeeded. Exhausting the budget yields
/// [`DbError::FatalStartup`] carrying the last failure.
pub async fn wait_until_ready<P>(probe: &P, policy: &RetryPolicy) -> Result<u32>
where
    P: Probe + ?Sized,
{
    let max_attempts = policy.attempts();
    let mut attempt = 1;

    loop {
        match probe.ping().await {
            Ok(()) => {
                info!(attempt, max_attempts, "database is reachable");
                return Ok(attempt);
            }
            Err(err) if attempt >= max_attempts => {
                return Err(DbError::FatalStartup {
                    attempts: max_attempts,
                    source: Box::new(err),
                });
            }
            Err(err) => {
                warn!(
                    attempt,
                    max_attempts,
                    error = %err,
                    retry_in_ms = policy.delay().as_millis() as u64,
                    "failed to ping database"
                );
                tokio::time::sleep(policy.delay()).await;
                attempt += 1;
            }
        }
    }
}
