use std::time::Duration;

use anyhow::Context;
use bookstore_db::{wait_until_ready, RetryPolicy};
use bookstore_kernel::settings::Settings;
use clap::{Parser, Subcommand};

/// Operator entrypoint for the bookstore service
#[derive(Debug, Parser)]
#[command(name = "bookstore", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Connect to the store and serve the HTTP API (default)
    Serve,
    /// Check that the store answers a ping, retrying on failure
    Ping {
        /// Number of ping attempts before giving up
        #[arg(long)]
        attempts: Option<u32>,
        /// Delay between attempts, in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,
    },
    /// Print the effective settings with secrets redacted
    Settings,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load().with_context(|| "failed to load bookstore settings")?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            bookstore_telemetry::init(&settings.telemetry)?;
            tracing::info!(env = ?settings.environment, "bookstore serve starting");
            bookstore_app::run(settings).await
        }
        Command::Ping { attempts, delay_ms } => {
            bookstore_telemetry::init(&settings.telemetry)?;
            ping(&settings, attempts, delay_ms).await
        }
        Command::Settings => {
            println!("{settings:#?}");
            Ok(())
        }
    }
}

async fn ping(
    settings: &Settings,
    attempts: Option<u32>,
    delay_ms: Option<u64>,
) -> anyhow::Result<()> {
    let retry = &settings.database.retry;
    let policy = RetryPolicy::new(
        attempts.unwrap_or(retry.attempts),
        Duration::from_millis(delay_ms.unwrap_or(retry.delay_ms)),
    );

    let pool = bookstore_db::pool_options(&settings.database.pool)
        .connect_lazy_with(bookstore_db::connect_options(&settings.database));
    let outcome = wait_until_ready(&pool, &policy).await;
    pool.close().await;

    let attempt = outcome.with_context(|| {
        format!(
            "database at {}:{} did not answer",
            settings.database.host, settings.database.port
        )
    })?;
    println!(
        "database {} at {}:{} is reachable (attempt {attempt})",
        settings.database.name, settings.database.host, settings.database.port
    );
    Ok(())
}
