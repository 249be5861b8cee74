//! HTTP server exposing the nsqd auth endpoint
//!
//! nsqd calls `GET /auth?auth_secret=<secret>` (plus `remote_ip`, `tls`,
//! `common_name` which are ignored) whenever a client sends `AUTH`. The
//! secret is looked up in Vault and the token metadata is returned as an
//! [`AuthorizationGrant`].
//!
//! When nsqd disconnects mid-request the server drops the handler future,
//! which drops the in-flight Vault request with it.

use std::future::Future;
use std::sync::Arc;

use axum::extract::{RawQuery, State};
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::{Json, Router};
use tokio::net::TcpListener;

use crate::config::Config;
use crate::error::{NsqAuthError, Result};
use crate::grant::AuthorizationGrant;
use crate::vault::VaultClient;

/// Path nsqd is configured to call
pub const AUTH_PATH: &str = "/auth";

/// Query parameter carrying the client's secret
pub const AUTH_SECRET_PARAM: &str = "auth_secret";

/// Shared, read-only state handed to every request
#[derive(Debug, Clone)]
pub struct AppState {
    vault: Arc<VaultClient>,
}

impl AppState {
    /// Wrap a Vault client for use by the router
    pub fn new(vault: VaultClient) -> Self {
        Self {
            vault: Arc::new(vault),
        }
    }

    /// Build state from the startup configuration
    ///
    /// # Errors
    ///
    /// Returns error if the Vault HTTP client cannot be built
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(VaultClient::new(&config.vault)?))
    }
}

/// Build the axum router serving [`AUTH_PATH`]
///
/// Every other path, and every method other than `GET` on the auth path,
/// answers `404 Not Found`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(AUTH_PATH, any(handle_auth))
        .with_state(state)
}

#[tracing::instrument(name = "auth", skip_all, fields(method = %method))]
async fn handle_auth(
    State(state): State<AppState>,
    method: Method,
    RawQuery(query): RawQuery,
) -> std::result::Result<Response, NsqAuthError> {
    if method != Method::GET {
        return Ok(StatusCode::NOT_FOUND.into_response());
    }

    let token = auth_secret(query.as_deref());
    if token.is_empty() {
        tracing::debug!("request carries no auth_secret");
    }

    let data = state.vault.lookup_self(&token).await?;
    let grant = AuthorizationGrant::from_token(&data);

    tracing::info!(
        identity = %grant.identity,
        topic = %grant.authorizations[0].topic,
        "token authorized"
    );

    Ok((StatusCode::OK, Json(grant)).into_response())
}

/// First `auth_secret` value of a raw query string, or `""` when absent
///
/// # Examples
///
/// ```
/// use nsq_auth_vault::server::auth_secret;
///
/// assert_eq!(auth_secret(Some("auth_secret=s3cr%2Ft&tls=true")), "s3cr/t");
/// assert_eq!(auth_secret(None), "");
/// ```
pub fn auth_secret(query: Option<&str>) -> String {
    query
        .and_then(|q| {
            url::form_urlencoded::parse(q.as_bytes())
                .find(|(key, _)| key == AUTH_SECRET_PARAM)
                .map(|(_, value)| value.into_owned())
        })
        .unwrap_or_default()
}

/// Serve `router` on `listener` until `shutdown` resolves
///
/// In-flight requests are allowed to finish after `shutdown` fires.
///
/// # Errors
///
/// Returns error if the server fails while accepting connections
pub async fn serve(
    listener: TcpListener,
    state: AppState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let app = router(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

/// Resolves on SIGINT or, on unix, SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for SIGINT");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => (),
        _ = terminate => (),
    }

    tracing::info!("shutdown signal received");
}
