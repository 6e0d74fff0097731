mod app;
mod detail;

use anyhow::Result;
use std::fs::{self, OpenOptions};

use chrono::Local;
use tracing::{info, warn};
use tracing_subscriber::{prelude::*, EnvFilter};

use bgcodex_core::{
    config::{self, AppConfig},
    CatalogSource, CatalogStore,
};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging()?;

    config::ensure_default_config()?;
    let config = AppConfig::load()?;

    let source = CatalogSource::parse(&config.source);
    info!(source = %source.label(), "starting board games codex");

    let store = CatalogStore::new(source, config.cache_root.clone());
    let load_error = match store.load().await {
        Ok(count) => {
            info!(count, "catalog ready");
            None
        }
        Err(err) => {
            warn!(error = %err, "initial catalog load failed");
            let mut message = format!("Load failed: {err}");
            if let Some(fetched_at) = store.manifest().and_then(|manifest| manifest.fetched_at) {
                let local = fetched_at.with_timezone(&Local);
                message.push_str(&format!(
                    " • last successful fetch {}",
                    local.format("%Y-%m-%d %H:%M")
                ));
            }
            Some(message)
        }
    };

    let mut app = app::CodexApp::new(store, load_error);
    app.run().await
}

fn init_logging() -> Result<()> {
    let log_dir = std::env::current_dir()?.join("logs");
    fs::create_dir_all(&log_dir)?;
    let log_path = log_dir.join("bgcodex.log");

    let env_filter = EnvFilter::from_default_env();

    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .compact()
        .with_writer(std::io::stdout);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .compact()
        .with_writer(move || {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(&log_path)
                .expect("failed to open log file")
        });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    Ok(())
}
