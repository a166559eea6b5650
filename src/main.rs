mod config;
mod error;
mod filter;
mod forwarder;
mod platform;
mod relay;
mod resolver;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::Config;
use crate::forwarder::Forwarder;
use crate::platform::telegram::TelegramPlatform;
use crate::platform::ChatPlatform;

const LOG_FILE: &str = "forwarder.log";

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before anything reads the environment, RUST_LOG included.
    let _ = dotenvy::dotenv();

    init_tracing(LOG_FILE)?;

    let config = Config::from_env()?;
    match &config.proxy {
        Some(proxy) => info!(host = %proxy.host, port = proxy.port, "proxy enabled"),
        None => info!("proxy disabled"),
    }

    let platform = TelegramPlatform::connect(&config).await?;
    let account = platform.self_name().await?;
    info!(account = %account, "authorized");

    let forwarder = Forwarder::new(&platform, config.mode);

    tokio::select! {
        result = forwarder.run(&config.sources, &config.targets) => result,
        _ = tokio::signal::ctrl_c() => {
            info!("stopped by operator");
            Ok(())
        }
    }
}

/// Timestamped, level-tagged lines to stdout and the log file alike.
fn init_tracing(log_file_path: &str) -> Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)
        .with_context(|| format!("failed to open log file {log_file_path}"))?;
    let writer = std::io::stdout.and(Arc::new(file));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false),
        )
        .init();

    Ok(())
}
