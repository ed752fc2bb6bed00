//! Credentials and client configuration.
//!
//! # Design
//! Configuration is resolved once, when the client is built, and then passed
//! by value. Nothing below this module reads the environment: the
//! authenticator receives a finished `Credentials` value. An explicit override
//! always wins over the environment.

use std::fmt;
use std::time::Duration;

use crate::error::ApiError;

pub const CLIENT_ID_ENV: &str = "ONELOGIN_CLIENT_ID";
pub const CLIENT_SECRET_ENV: &str = "ONELOGIN_CLIENT_SECRET";
pub const SUBDOMAIN_ENV: &str = "ONELOGIN_SUBDOMAIN";
pub const TIMEOUT_ENV: &str = "ONELOGIN_TIMEOUT";

/// OAuth2 client credentials and the account subdomain they belong to.
///
/// Empty values are allowed here; the authenticator rejects them when a
/// token is requested.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    client_id: String,
    client_secret: String,
    subdomain: String,
}

impl Credentials {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        subdomain: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            subdomain: subdomain.into(),
        }
    }

    /// Read credentials from `ONELOGIN_CLIENT_ID`, `ONELOGIN_CLIENT_SECRET`
    /// and `ONELOGIN_SUBDOMAIN`. Unset variables become empty strings.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Use `explicit` when given, otherwise fall back to the environment.
    pub fn resolve(explicit: Option<Credentials>) -> Self {
        explicit.unwrap_or_else(Self::from_env)
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            client_id: lookup(CLIENT_ID_ENV).unwrap_or_default(),
            client_secret: lookup(CLIENT_SECRET_ENV).unwrap_or_default(),
            subdomain: lookup(SUBDOMAIN_ENV).unwrap_or_default(),
        }
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }

    pub fn subdomain(&self) -> &str {
        &self.subdomain
    }
}

// Keeps the secret out of logs and panic messages.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("subdomain", &self.subdomain)
            .finish()
    }
}

/// Everything needed to build a `OneLoginClient`.
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    pub credentials: Credentials,
    /// Replaces `https://{subdomain}.onelogin.com`, e.g. to target a mock.
    pub base_url: Option<String>,
    /// Global per-request timeout; the transport default applies when unset.
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            base_url: None,
            timeout: None,
        }
    }

    /// Build a config entirely from `ONELOGIN_*` environment variables.
    ///
    /// Fails only when `ONELOGIN_TIMEOUT` is set and is not a whole number of
    /// seconds; missing credentials surface later, at token generation.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ApiError> {
        let timeout = match lookup(TIMEOUT_ENV) {
            Some(raw) => {
                let secs = raw.trim().parse::<u64>().map_err(|e| {
                    ApiError::Configuration(format!("invalid {TIMEOUT_ENV} value {raw:?}: {e}"))
                })?;
                Some(Duration::from_secs(secs))
            }
            None => None,
        };
        Ok(Self {
            credentials: Credentials::from_lookup(&lookup),
            base_url: None,
            timeout,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Root URL for both the OAuth2 and the resource endpoints, without a
    /// trailing slash.
    pub fn base_url(&self) -> String {
        match &self.base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("https://{}.onelogin.com", self.credentials.subdomain),
        }
    }
}
