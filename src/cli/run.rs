use crate::config::load_config;
use crate::notify::DiscordWebhook;
use crate::poller::{Poller, PollerConfig};
use crate::source::P4ChangeSource;
use crate::watermark::WatermarkStore;
use std::path::PathBuf;
use thiserror::Error;
use tokio::signal;
use tokio::sync::watch;
use tracing::info;

#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("task join error: {0}")]
    Join(#[from] tokio::task::JoinError),
}

pub async fn run(config_path: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let config_path = match config_path {
        Some(path) => path,
        None => {
            eprintln!("Error: config not found");
            eprintln!("Searched locations:");
            eprintln!("  ~/.config/p4relay/config.yml");
            eprintln!("  /etc/p4relay/config.yml");
            eprintln!("\nUse --config <path> to specify a config file, or run 'p4relay config init' to generate one.");
            std::process::exit(1);
        }
    };

    run_poller(&config_path).await.map_err(|e| e.into())
}

async fn run_poller(config_path: &PathBuf) -> Result<(), RunError> {
    info!(config_path = %config_path.display(), "Loading configuration");
    let config = load_config(config_path)?;

    info!(depot = %config.perforce.depot, "Watching depot");
    let source = P4ChangeSource::new(
        config.perforce.binary.as_str(),
        config.perforce.depot.as_str(),
    );
    let notifier = DiscordWebhook::new(config.webhook.url.as_str());
    let store = WatermarkStore::new(&config.watermark.path);
    info!(path = %store.path().display(), "Watermark store ready");

    let poller = Poller::new(source, notifier, store, PollerConfig::from(&config));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let poller_handle = tokio::spawn(async move { poller.run(shutdown_rx).await });

    info!("p4relay started, press Ctrl+C to shutdown");
    if signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
        let _ = shutdown_tx.send(true);
    }

    poller_handle.await?;
    info!("p4relay shutdown complete");

    Ok(())
}
