use std::path::PathBuf;

use booking_notifier::{
    appwrite::AppwriteClient,
    import::{import_jobs, load_records, DEFAULT_IMPORT_FILE},
    state::Config,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    if config.api_key.is_none() {
        tracing::warn!("APPWRITE_API_KEY is not set, document creation may be rejected");
    }

    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_IMPORT_FILE));

    let records = load_records(&path).await?;
    tracing::info!("Importing {} jobs from {}", records.len(), path.display());

    let client = AppwriteClient::new(&config);
    let report = import_jobs(
        &client,
        &config.database_id,
        &config.collections.bookings,
        records,
    )
    .await;

    tracing::info!(
        "{} added, {} failed",
        report.added,
        report.failed.len()
    );

    Ok(())
}
