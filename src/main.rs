//! nsq-auth-vault - NSQ auth server backed by Vault
//!
#![doc = "Main entry point for the nsq-auth-vault service."]

use anyhow::{Context, Result};

use nsq_auth_vault::cli::Cli;
use nsq_auth_vault::config::Config;
use nsq_auth_vault::{logging, server, vault};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    let config = Config::load(&cli)?;
    logging::init_logging(&config.logging)?;
    config.validate()?;

    if let Err(e) = vault::lookup_self_url(&config.vault.address) {
        tracing::warn!(error = %e, "vault address is invalid, every auth request will fail");
    }

    let state = server::AppState::from_config(&config)?;

    let bind_address = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;

    tracing::info!(
        address = %bind_address,
        vault = %config.vault.address,
        "nsq-auth-vault listening"
    );

    server::serve(listener, state, server::shutdown_signal()).await?;

    tracing::info!("nsq-auth-vault stopped");
    Ok(())
}
