//! Error types for nsq-auth-vault
//!
//! This module defines the error type shared by configuration loading and
//! request handling, using `thiserror` for ergonomic error handling.
//!
//! Request errors carry their own HTTP status: the broker only needs an
//! allow/deny answer, so every failure to confirm a token collapses to
//! `401 Unauthorized`. The one exception is a backend address that cannot be
//! parsed, which is an operator mistake and surfaces as `500`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Main error type for nsq-auth-vault operations
#[derive(Error, Debug)]
pub enum NsqAuthError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// The configured Vault address cannot be turned into a URL
    #[error("invalid vault address {address:?}: {message}")]
    InvalidVaultAddress {
        /// Address as configured
        address: String,
        /// Parser error description
        message: String,
    },

    /// The lookup-self request could not be completed
    #[error("vault request failed: {0}")]
    VaultRequest(String),

    /// The lookup-self response body could not be read
    #[error("failed to read vault response: {0}")]
    VaultResponseBody(String),

    /// The lookup-self response body is not the expected JSON document
    #[error("failed to decode vault response: {0}")]
    VaultResponseDecode(String),

    /// Vault answered with a non-empty `errors` array
    #[error("{}", .0.join("\n"))]
    VaultDenied(Vec<String>),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl NsqAuthError {
    /// HTTP status reported to the broker for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::VaultRequest(_)
            | Self::VaultResponseBody(_)
            | Self::VaultResponseDecode(_)
            | Self::VaultDenied(_) => StatusCode::UNAUTHORIZED,
            Self::InvalidVaultAddress { .. }
            | Self::Config(_)
            | Self::Io(_)
            | Self::Yaml(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for NsqAuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "auth request failed");
        } else {
            tracing::warn!(error = %self, "auth request rejected");
        }
        (status, self.to_string()).into_response()
    }
}

/// Result type alias for nsq-auth-vault operations
///
/// Uses `anyhow::Error` so startup code can attach context while request
/// handling keeps the typed [`NsqAuthError`].
pub type Result<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let error = NsqAuthError::Config("port must be set".to_string());
        assert_eq!(error.to_string(), "Configuration error: port must be set");
    }

    #[test]
    fn test_vault_denied_single_message_is_verbatim() {
        let error = NsqAuthError::VaultDenied(vec!["permission denied".to_string()]);
        assert_eq!(error.to_string(), "permission denied");
    }

    #[test]
    fn test_vault_denied_joins_messages_with_newline() {
        let error = NsqAuthError::VaultDenied(vec![
            "permission denied".to_string(),
            "token expired".to_string(),
        ]);
        assert_eq!(error.to_string(), "permission denied\ntoken expired");
    }

    #[test]
    fn test_invalid_vault_address_display() {
        let error = NsqAuthError::InvalidVaultAddress {
            address: "http://[::1".to_string(),
            message: "invalid IPv6 address".to_string(),
        };
        let s = error.to_string();
        assert!(s.contains("http://[::1"));
        assert!(s.contains("invalid IPv6 address"));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            NsqAuthError::InvalidVaultAddress {
                address: String::new(),
                message: String::new(),
            }
            .status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            NsqAuthError::VaultRequest("connection refused".to_string()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            NsqAuthError::VaultResponseBody("eof".to_string()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            NsqAuthError::VaultResponseDecode("expected value".to_string()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            NsqAuthError::VaultDenied(vec![]).status_code(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_into_response_uses_status_code() {
        let response =
            NsqAuthError::VaultDenied(vec!["permission denied".to_string()]).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: NsqAuthError = io_error.into();
        assert!(matches!(error, NsqAuthError::Io(_)));
    }

    #[test]
    fn test_yaml_error_conversion() {
        let yaml_str = "invalid: : yaml";
        let yaml_error = serde_yaml::from_str::<serde_yaml::Value>(yaml_str).unwrap_err();
        let error: NsqAuthError = yaml_error.into();
        assert!(matches!(error, NsqAuthError::Yaml(_)));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<NsqAuthError>();
    }
}
