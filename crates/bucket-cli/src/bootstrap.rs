use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::Context;
use bucket_server::{BucketServer, ServerConfig};
use bucket_store::ensure_root;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;

/// Start-up sequence. Any failure here is fatal: the server cannot run
/// without its log sink, config or storage root.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    init_logging(&cli)?;
    let result = start(cli).await;
    if let Err(e) = &result {
        tracing::error!("fatal: {e:#}");
    }
    result
}

async fn start(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(&cli)?;
    tracing::info!(?config, "configuration loaded");

    ensure_root(&config.storage_root).with_context(|| {
        format!("failed to create storage root {}", config.storage_root.display())
    })?;

    BucketServer::new(config)?.serve().await?;
    Ok(())
}

fn init_logging(cli: &Cli) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if cli.stderr {
        builder.with_writer(std::io::stderr).init();
    } else {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&cli.log_file)
            .with_context(|| format!("failed to open log file {}", cli.log_file.display()))?;
        builder.with_ansi(false).with_writer(Mutex::new(file)).init();
    }
    Ok(())
}

/// Load the config file and apply command-line overrides.
fn load_config(cli: &Cli) -> anyhow::Result<ServerConfig> {
    let mut config = ServerConfig::load(&cli.config)
        .with_context(|| format!("failed to load config {}", cli.config.display()))?;
    if let Some(dir) = &cli.data_dir {
        config.storage_root = dir.clone();
    }
    Ok(config)
}
