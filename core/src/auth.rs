//! OAuth2 client-credentials authentication.
//!
//! # Design
//! `Authenticator` owns the resolved credentials and the last issued token.
//! Each network operation is split the same way the rest of the crate is: a
//! `build_*` method produces an `HttpRequest`, a `parse_*` method consumes
//! the `HttpResponse`, and a convenience method runs both through a
//! `Transport`.
//!
//! The cached token is only replaced after a response has been fully
//! validated, so a failed `generate_token` leaves the previous token usable.
//! Nothing refreshes the token automatically.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::config::{ClientConfig, Credentials, CLIENT_ID_ENV, CLIENT_SECRET_ENV};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport};

pub const TOKEN_PATH: &str = "/auth/oauth2/v2/token";
pub const REVOKE_PATH: &str = "/auth/oauth2/revoke";

/// Source of the bearer token injected into every resource request.
pub trait TokenProvider {
    /// The current token. Must not perform I/O.
    fn token(&self) -> &str;
}

/// A token obtained elsewhere and handed to the client as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticToken(pub String);

impl TokenProvider for StaticToken {
    fn token(&self) -> &str {
        &self.0
    }
}

/// Exchanges client credentials for a bearer token and caches it.
#[derive(Debug, Clone)]
pub struct Authenticator {
    base_url: String,
    credentials: Credentials,
    access_token: String,
    expires_in: i64,
    account_id: String,
}

impl Authenticator {
    pub fn new(base_url: &str, credentials: Credentials) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
            access_token: String::new(),
            expires_in: 0,
            account_id: String::new(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(&config.base_url(), config.credentials.clone())
    }

    /// The cached access token, or an empty string if none was generated.
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Lifetime in seconds declared by the last token response, or 0.
    pub fn expires_in(&self) -> i64 {
        self.expires_in
    }

    /// Account id from the last token response, or an empty string.
    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    pub fn build_token_request(&self) -> Result<HttpRequest, ApiError> {
        let authorization = self.basic_authorization()?;
        let body = serde_json::to_string(&json!({ "grant_type": "client_credentials" }))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: format!("{}{TOKEN_PATH}", self.base_url),
            headers: vec![
                ("authorization".to_string(), authorization),
                ("content-type".to_string(), "application/json".to_string()),
            ],
            body: Some(body),
        })
    }

    /// Validate a token endpoint response and, on success, replace the
    /// cached token, expiry and account id.
    pub fn parse_token_response(&mut self, response: HttpResponse) -> Result<(), ApiError> {
        if response.status != 200 {
            debug!(status = response.status, "token endpoint rejected credentials");
            return Err(ApiError::Authentication("Authentication failed".to_string()));
        }

        let payload: Value = serde_json::from_slice(&response.body)
            .map_err(|e| ApiError::Serialization(format!("failed to read authentication response: {e}")))?;

        let access_token = payload
            .get("access_token")
            .and_then(Value::as_str)
            .ok_or_else(|| ApiError::Authentication("Authentication Failed at Endpoint".to_string()))?;

        if let Some(account_id) = payload.get("account_id").and_then(as_whole_number) {
            self.account_id = account_id.to_string();
        }
        if let Some(expires_in) = payload.get("expires_in").and_then(as_whole_number) {
            self.expires_in = expires_in;
        }
        self.access_token = access_token.to_string();

        info!(
            account_id = %self.account_id,
            expires_in = self.expires_in,
            "generated access token"
        );
        Ok(())
    }

    /// Request a new token and cache it.
    pub fn generate_token(&mut self, transport: &impl Transport) -> Result<(), ApiError> {
        let request = self.build_token_request()?;
        let response = transport.send(request)?;
        self.parse_token_response(response)
    }

    pub fn build_revoke_request(&self, token: &str) -> Result<HttpRequest, ApiError> {
        let authorization = self.basic_authorization()?;
        let body = serde_json::to_string(&json!({ "access_token": token }))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: format!("{}{REVOKE_PATH}", self.base_url),
            headers: vec![
                ("authorization".to_string(), authorization),
                ("content-type".to_string(), "application/json".to_string()),
            ],
            body: Some(body),
        })
    }

    pub fn parse_revoke_response(&self, response: HttpResponse) -> Result<(), ApiError> {
        if response.status != 200 {
            debug!(status = response.status, "revoke endpoint rejected request");
            return Err(ApiError::Authentication("Revocation failed".to_string()));
        }
        info!("revoked access token");
        Ok(())
    }

    /// Revoke an arbitrary token. The cached token is left untouched even if
    /// it is the one being revoked.
    pub fn revoke_token(&self, transport: &impl Transport, token: &str) -> Result<(), ApiError> {
        let request = self.build_revoke_request(token)?;
        let response = transport.send(request)?;
        self.parse_revoke_response(response)
    }

    fn basic_authorization(&self) -> Result<String, ApiError> {
        let id = self.credentials.client_id();
        let secret = self.credentials.client_secret();
        if id.is_empty() {
            return Err(ApiError::Configuration(format!("Missing {CLIENT_ID_ENV} Env Variable")));
        }
        if secret.is_empty() {
            return Err(ApiError::Configuration(format!("Missing {CLIENT_SECRET_ENV} Env Variable")));
        }
        Ok(format!("Basic {}", STANDARD.encode(format!("{id}:{secret}"))))
    }
}

impl TokenProvider for Authenticator {
    fn token(&self) -> &str {
        &self.access_token
    }
}

/// JSON numbers may arrive as `12345` or `12345.0`; both mean the same id.
fn as_whole_number(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| value.as_f64().map(|f| f as i64))
}
