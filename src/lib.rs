//! nsq-auth-vault - NSQ auth server backed by Vault
//!
//! nsqd delegates client authentication to an HTTP endpoint
//! (`--auth-http-address`). This library implements that endpoint on top of
//! Vault: the client's secret is a Vault token, and the token's metadata
//! describes which topic and channels it may use.
//!
//! # Architecture
//!
//! - `server`: axum router for `GET /auth` and the serve loop
//! - `vault`: lookup-self client and response types
//! - `grant`: translation of token metadata into the nsqd grant document
//! - `config`: configuration loading and validation
//! - `error`: error type and its HTTP status mapping
//! - `logging`: tracing subscriber setup
//! - `cli`: command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use nsq_auth_vault::{cli::Cli, server, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load(&Cli::default())?;
//!     config.validate()?;
//!
//!     let state = server::AppState::from_config(&config)?;
//!     let listener = tokio::net::TcpListener::bind(config.server.bind_address()).await?;
//!     server::serve(listener, state, server::shutdown_signal()).await
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod grant;
pub mod logging;
pub mod server;
pub mod vault;

// Re-export commonly used types
pub use config::Config;
pub use error::{NsqAuthError, Result};
pub use grant::{Authorization, AuthorizationGrant};
pub use server::{router, AppState};
pub use vault::{LookupSelfResponse, TokenData, TokenMeta, VaultClient};
