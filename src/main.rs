use dotenvy::dotenv;
use helpdesk_bot::{bot, config, errors::Result};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file, env vars can also be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load and validate config.toml
    let app_config = Arc::new(config::load_app_configuration()?);

    // 4. Token is read right before use, never stored in AppConfig
    let token = config::env::bot_token()?;

    bot::run_bot(token, app_config).await
}
