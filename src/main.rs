mod app;
mod config;
mod models;
mod platform;
mod providers;
mod services;
mod ui;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use app::{App, AppParts};
use config::{AppConfig, APP_ID, APP_NAME};
use services::settings::PersistPolicy;
use services::{Database, PreferenceStore};

#[tokio::main]
async fn main() -> Result<()> {
    // stdout belongs to the chat screen.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting {} ({})", APP_NAME, APP_ID);

    let config = AppConfig::from_env()?;
    let db = Database::open(&config.database_path()).await?;
    let policy = PersistPolicy {
        animations: config.persist_animations,
        ..PersistPolicy::default()
    };
    let preferences = PreferenceStore::load(db, policy).await?;

    let parts = AppParts::native(&config, preferences)?;
    app::run(App::new(parts)).await
}
