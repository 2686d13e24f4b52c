use anyhow::Context;
use bookstore_kernel::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load bookstore settings")?;
    bookstore_telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = ?settings.environment,
        db_host = %settings.database.host,
        db_name = %settings.database.name,
        "bookstore-app bootstrap starting"
    );

    bookstore_app::run(settings).await
}
