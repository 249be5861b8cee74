//! Vault token lookup-self client
//!
//! Resolves an opaque token into the identity and metadata Vault stores for
//! it by calling `GET /v1/auth/token/lookup-self` with the token in the
//! `X-Vault-Token` header.
//!
//! Only the response body decides the outcome. Vault reports an invalid
//! token as `403` with an `errors` array, and that array is what callers
//! see as [`NsqAuthError::VaultDenied`].

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Deserializer, Serialize};
use url::Url;

use crate::config::VaultConfig;
use crate::error::NsqAuthError;

/// Path of the token introspection endpoint
pub const LOOKUP_SELF_PATH: &str = "/v1/auth/token/lookup-self";

/// Header carrying the token being introspected
pub const VAULT_TOKEN_HEADER: &str = "X-Vault-Token";

/// Body of a `lookup-self` response
///
/// Every field is optional; `null` and missing values decode to defaults.
///
/// # Examples
///
/// ```
/// use nsq_auth_vault::vault::LookupSelfResponse;
///
/// let json = r#"{
///     "data": {
///         "display_name": "token-producer",
///         "meta": { "permissions": "publish", "topic": "events", "channels": "" }
///     }
/// }"#;
///
/// let response: LookupSelfResponse = serde_json::from_str(json).unwrap();
/// assert!(response.errors.is_empty());
/// assert_eq!(response.data.display_name, "token-producer");
/// assert_eq!(response.data.meta.topic, "events");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupSelfResponse {
    /// Error messages; non-empty means the lookup failed
    #[serde(default, deserialize_with = "null_as_default")]
    pub errors: Vec<String>,

    /// Token details, present on success
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: TokenData,
}

/// `data` object of a lookup-self response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenData {
    /// Token accessor id
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,

    /// Human-readable token name, used as the NSQ identity
    #[serde(default, deserialize_with = "null_as_default")]
    pub display_name: String,

    /// Metadata attached when the token was created
    #[serde(default, deserialize_with = "null_as_default")]
    pub meta: TokenMeta,
}

/// Token metadata describing the NSQ grant
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMeta {
    /// Comma-separated NSQ permissions (`subscribe`, `publish`)
    #[serde(default, deserialize_with = "null_as_default")]
    pub permissions: String,

    /// Topic the grant applies to
    #[serde(default, deserialize_with = "null_as_default")]
    pub topic: String,

    /// Comma-separated channel names
    #[serde(default, deserialize_with = "null_as_default")]
    pub channels: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Build the lookup-self URL from a configured Vault address
///
/// An address that does not start with `<scheme>://` is read as `http://`.
/// The address path is replaced; its query string is kept. A URL that
/// parses but cannot be requested (unknown scheme, no host) is returned as
/// is and fails later as a transport error.
///
/// # Errors
///
/// Returns [`NsqAuthError::InvalidVaultAddress`] if the address cannot be
/// parsed as a URL.
///
/// # Examples
///
/// ```
/// use nsq_auth_vault::vault::lookup_self_url;
///
/// let url = lookup_self_url("localhost:8200").unwrap();
/// assert_eq!(url.as_str(), "http://localhost:8200/v1/auth/token/lookup-self");
/// ```
pub fn lookup_self_url(address: &str) -> Result<Url, NsqAuthError> {
    let candidate = if has_scheme(address) {
        address.to_string()
    } else {
        format!("http://{}", address)
    };

    let mut url = Url::parse(&candidate).map_err(|e| NsqAuthError::InvalidVaultAddress {
        address: address.to_string(),
        message: e.to_string(),
    })?;
    url.set_path(LOOKUP_SELF_PATH);
    Ok(url)
}

/// Whether `address` starts with `<scheme>://` (RFC 3986 scheme characters)
fn has_scheme(address: &str) -> bool {
    let Some(end) = address.find("://") else {
        return false;
    };
    let mut chars = address[..end].chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Client for Vault's token lookup-self endpoint
///
/// Cheap to clone; the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct VaultClient {
    http: Client,
    address: String,
}

impl VaultClient {
    /// Create a client for the configured Vault
    ///
    /// The address is checked per request, not here.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built
    pub fn new(config: &VaultConfig) -> crate::error::Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self::with_client(http, config.address.clone()))
    }

    /// Create a client around an existing [`reqwest::Client`]
    pub fn with_client(http: Client, address: impl Into<String>) -> Self {
        Self {
            http,
            address: address.into(),
        }
    }

    /// Configured Vault address
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Look up `token` and return its details
    ///
    /// Dropping the returned future aborts the in-flight request.
    ///
    /// # Errors
    ///
    /// - [`NsqAuthError::InvalidVaultAddress`] if the address is malformed
    /// - [`NsqAuthError::VaultRequest`] on transport failure or timeout
    /// - [`NsqAuthError::VaultResponseBody`] if the body cannot be read
    /// - [`NsqAuthError::VaultResponseDecode`] if the body is not the
    ///   expected JSON document
    /// - [`NsqAuthError::VaultDenied`] if Vault reports errors
    pub async fn lookup_self(&self, token: &str) -> Result<TokenData, NsqAuthError> {
        let url = lookup_self_url(&self.address)?;

        let response = self
            .http
            .get(url)
            .header(VAULT_TOKEN_HEADER, token)
            .send()
            .await
            .map_err(|e| NsqAuthError::VaultRequest(e.to_string()))?;

        tracing::debug!(status = %response.status(), "vault lookup-self responded");

        let body = response
            .bytes()
            .await
            .map_err(|e| NsqAuthError::VaultResponseBody(e.to_string()))?;

        let lookup: LookupSelfResponse = serde_json::from_slice::<Option<_>>(&body)
            .map_err(|e| NsqAuthError::VaultResponseDecode(e.to_string()))?
            .unwrap_or_default();

        if !lookup.errors.is_empty() {
            return Err(NsqAuthError::VaultDenied(lookup.errors));
        }

        Ok(lookup.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_self_url_adds_missing_scheme() {
        let url = lookup_self_url("localhost:8200").unwrap();
        assert_eq!(url.scheme(), "http");
        assert_eq!(url.host_str(), Some("localhost"));
        assert_eq!(url.port(), Some(8200));
        assert_eq!(url.path(), LOOKUP_SELF_PATH);
    }

    #[test]
    fn test_lookup_self_url_replaces_path() {
        let url = lookup_self_url("https://vault.internal:8200/ui/").unwrap();
        assert_eq!(
            url.as_str(),
            "https://vault.internal:8200/v1/auth/token/lookup-self"
        );
    }

    #[test]
    fn test_lookup_self_url_keeps_query() {
        let url = lookup_self_url("http://127.0.0.1:8200?namespace=nsq").unwrap();
        assert_eq!(url.query(), Some("namespace=nsq"));
        assert_eq!(url.path(), LOOKUP_SELF_PATH);
    }

    #[test]
    fn test_lookup_self_url_rejects_malformed_address() {
        let err = lookup_self_url("http://[::1").unwrap_err();
        assert!(matches!(err, NsqAuthError::InvalidVaultAddress { .. }));
    }

    #[test]
    fn test_lookup_self_url_ignores_scheme_separator_in_query() {
        let url = lookup_self_url("localhost:1/?x=http://y").unwrap();
        assert_eq!(url.scheme(), "http");
        assert_eq!(url.host_str(), Some("localhost"));
        assert_eq!(url.port(), Some(1));
        assert_eq!(url.query(), Some("x=http://y"));
    }

    #[test]
    fn test_lookup_self_url_keeps_unknown_scheme() {
        let url = lookup_self_url("vault://127.0.0.1:8200").unwrap();
        assert_eq!(url.scheme(), "vault");
        assert_eq!(url.path(), LOOKUP_SELF_PATH);
    }

    #[test]
    fn test_has_scheme() {
        assert!(has_scheme("http://127.0.0.1:8200"));
        assert!(has_scheme("vault+tls://vault"));
        assert!(!has_scheme("localhost:8200"));
        assert!(!has_scheme("localhost:1/?x=http://y"));
        assert!(!has_scheme("://vault"));
        assert!(!has_scheme("1http://vault"));
    }

    #[test]
    fn test_decode_full_response() {
        let json = r#"{
            "request_id": "8a6c1e2f",
            "data": {
                "id": "hvs.accessor",
                "display_name": "token-consumer",
                "policies": ["default"],
                "meta": {
                    "permissions": "subscribe,publish",
                    "topic": "events",
                    "channels": "ch1,ch2"
                },
                "ttl": 2764800
            },
            "warnings": null
        }"#;
        let response: LookupSelfResponse = serde_json::from_str(json).unwrap();
        assert!(response.errors.is_empty());
        assert_eq!(response.data.id, "hvs.accessor");
        assert_eq!(response.data.display_name, "token-consumer");
        assert_eq!(response.data.meta.permissions, "subscribe,publish");
        assert_eq!(response.data.meta.topic, "events");
        assert_eq!(response.data.meta.channels, "ch1,ch2");
    }

    #[test]
    fn test_decode_error_response() {
        let json = r#"{"errors": ["permission denied"]}"#;
        let response: LookupSelfResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.errors, vec!["permission denied".to_string()]);
        assert_eq!(response.data, TokenData::default());
    }

    #[test]
    fn test_decode_null_data_and_meta() {
        let response: LookupSelfResponse =
            serde_json::from_str(r#"{"errors": null, "data": null}"#).unwrap();
        assert!(response.errors.is_empty());
        assert_eq!(response.data, TokenData::default());

        let response: LookupSelfResponse =
            serde_json::from_str(r#"{"data": {"display_name": "t", "meta": null}}"#).unwrap();
        assert_eq!(response.data.display_name, "t");
        assert_eq!(response.data.meta, TokenMeta::default());
    }

    #[test]
    fn test_decode_rejects_wrong_types() {
        let result = serde_json::from_str::<LookupSelfResponse>(r#"{"errors": "nope"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_vault_client_keeps_address() {
        let client = VaultClient::new(&VaultConfig::default()).unwrap();
        assert_eq!(client.address(), "localhost:8200");
    }
}
