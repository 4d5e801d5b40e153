//! presence-bot binary: connect through the bridge daemon and stay online.

use presence_bot::{BotConfig, BotError, ConnectionSupervisor};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "presence_bot=info,command_dispatcher=info,game_bridge=info";

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), BotError> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let config = BotConfig::from_env()?;
    info!(
        "Allowed users: {}",
        config.allowed_users.iter().collect::<Vec<_>>().join(", ")
    );
    info!("Bridge: {}", config.bridge.base_url);

    let supervisor = ConnectionSupervisor::from_config(&config)?;
    supervisor
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Could not listen for Ctrl+C: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await?;

    info!("Stopped.");
    Ok(())
}
