use anyhow::Result;
use std::sync::Arc;

mod auth;
mod config;
mod error;
mod signal;
mod source;
mod supervisor;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (for log level)
    let config = config::Config::load()?;
    config.validate()?;

    // Initialize logging with the configured level
    let log_level = config.log_level.to_lowercase();
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();

    tracing::info!(
        pid = std::process::id(),
        authority = %config.base_url,
        "vakio agent starting"
    );

    let token_manager = Arc::new(auth::TokenManager::new(&config)?);
    let device_source = Arc::new(source::DeviceSource::new(
        token_manager.clone(),
        config.poll_interval,
    ));

    let mut supervisor = supervisor::Supervisor::new(config.shutdown_timeout);
    supervisor.add_task(token_manager);
    supervisor.add_task(device_source);

    let outcome = supervisor.wait().await;
    tracing::info!("vakio agent shutdown complete");

    Ok(outcome?)
}
