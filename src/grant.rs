//! NSQ authorization grant
//!
//! nsqd expects the auth server to answer with a document of this shape:
//!
//! ```json
//! {
//!   "ttl": 3600,
//!   "identity": "token-consumer",
//!   "authorizations": [
//!     { "permissions": ["subscribe"], "topic": "events", "channels": ["ch1"] }
//!   ]
//! }
//! ```
//!
//! The grant is derived entirely from the token's Vault metadata.

use serde::{Deserialize, Serialize};

use crate::vault::TokenData;

/// Lifetime nsqd caches a grant for, in seconds
pub const GRANT_TTL_SECONDS: u64 = 3600;

/// Separator used by the `permissions` and `channels` metadata values
pub const LIST_SEPARATOR: char = ',';

/// Authorization document returned to nsqd
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationGrant {
    /// Seconds nsqd may cache this grant
    pub ttl: u64,
    /// Identity reported by nsqd for the connection
    pub identity: String,
    /// Granted topic/channel permissions; always exactly one entry
    pub authorizations: Vec<Authorization>,
}

/// Single topic authorization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Authorization {
    /// Allowed operations, as listed in the token metadata
    pub permissions: Vec<String>,
    /// Topic name, verbatim
    pub topic: String,
    /// Channels the permissions apply to
    pub channels: Vec<String>,
}

impl AuthorizationGrant {
    /// Translate Vault token details into an nsqd grant
    ///
    /// # Examples
    ///
    /// ```
    /// use nsq_auth_vault::grant::AuthorizationGrant;
    /// use nsq_auth_vault::vault::{TokenData, TokenMeta};
    ///
    /// let data = TokenData {
    ///     display_name: "token-app".to_string(),
    ///     meta: TokenMeta {
    ///         permissions: "subscribe,publish".to_string(),
    ///         topic: "events".to_string(),
    ///         channels: "ch1".to_string(),
    ///     },
    ///     ..Default::default()
    /// };
    ///
    /// let grant = AuthorizationGrant::from_token(&data);
    /// assert_eq!(grant.ttl, 3600);
    /// assert_eq!(grant.authorizations[0].permissions, vec!["subscribe", "publish"]);
    /// ```
    pub fn from_token(data: &TokenData) -> Self {
        Self {
            ttl: GRANT_TTL_SECONDS,
            identity: data.display_name.clone(),
            authorizations: vec![Authorization {
                permissions: split_list(&data.meta.permissions),
                topic: data.meta.topic.clone(),
                channels: split_list(&data.meta.channels),
            }],
        }
    }
}

impl From<&TokenData> for AuthorizationGrant {
    fn from(data: &TokenData) -> Self {
        Self::from_token(data)
    }
}

/// Split a comma-separated metadata value
///
/// Items are kept verbatim, without trimming. An empty input yields a single
/// empty item, which nsqd has always received for tokens without
/// permissions or channels.
pub fn split_list(value: &str) -> Vec<String> {
    value.split(LIST_SEPARATOR).map(str::to_string).collect()
}
