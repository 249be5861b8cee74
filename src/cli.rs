//! Command-line interface definition for nsq-auth-vault
//!
//! Every setting is optional on the command line. Values given here take
//! precedence over environment variables and the configuration file; see
//! [`crate::config::Config::load`].

use clap::Parser;

/// nsq-auth-vault - NSQ auth endpoint backed by Vault
///
/// Serves `GET /auth?auth_secret=<token>` for nsqd's `--auth-http-address`
/// and answers with the grant stored in the token's Vault metadata.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "nsq-auth-vault")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to a YAML configuration file
    #[arg(short, long, env = "NSQ_AUTH_VAULT_CONFIG")]
    pub config: Option<String>,

    /// HTTP host to listen on
    #[arg(long)]
    pub host: Option<String>,

    /// HTTP port to listen on
    #[arg(long)]
    pub port: Option<u16>,

    /// Vault address (e.g. http://127.0.0.1:8200)
    #[arg(long)]
    pub vault: Option<String>,

    /// Timeout in seconds for the Vault lookup-self call
    #[arg(long = "vault-timeout")]
    pub vault_timeout: Option<u64>,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
