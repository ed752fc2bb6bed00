//! The OneLogin API client facade.
//!
//! # Design
//! `OneLoginClient` owns a `Transport` and a `TokenProvider`. Every resource
//! method follows the same pipeline: build the path with `api_path!`,
//! validate and append the query for list calls, build an `HttpRequest`
//! carrying the bearer token, send it, and normalize the response with
//! `check_http_response`. Resource methods live in one submodule per API
//! family and differ only in path and payload.
//!
//! The client performs no automatic token refresh. Callers holding an
//! `Authenticator`-backed client call `generate_token` again when the token
//! expires.

mod app_rules;
mod auth_servers;
mod groups;
mod privileges;
mod users;

use serde::Serialize;
use tracing::debug;

use crate::auth::{Authenticator, TokenProvider};
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, Transport, UreqTransport};
use crate::path::add_query_to_path;
use crate::query::{validate_query, Queryable};
use crate::response::{check_http_response, ResponseEnvelope};

pub use app_rules::APPS_PATH;
pub use auth_servers::AUTH_SERVERS_PATH;
pub use groups::GROUPS_PATH;
pub use privileges::PRIVILEGES_PATH;
pub use users::USERS_PATH;

/// Authenticated client for the OneLogin REST API.
#[derive(Debug)]
pub struct OneLoginClient<T = UreqTransport, P = Authenticator> {
    base_url: String,
    transport: T,
    tokens: P,
}

impl OneLoginClient {
    /// Build a ureq-backed client and obtain a token before returning.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        Self::connect(config, UreqTransport::new(config.timeout))
    }

    /// `new` with configuration read from the `ONELOGIN_*` environment.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::new(&ClientConfig::from_env()?)
    }
}

impl<T: Transport> OneLoginClient<T, Authenticator> {
    /// Authenticate over `transport` and wrap it in a client.
    pub fn connect(config: &ClientConfig, transport: T) -> Result<Self, ApiError> {
        let mut authenticator = Authenticator::from_config(config);
        authenticator.generate_token(&transport)?;
        Ok(Self::with_parts(&config.base_url(), transport, authenticator))
    }

    /// Exchange the credentials for a fresh token, replacing the cached one
    /// only on success.
    pub fn generate_token(&mut self) -> Result<(), ApiError> {
        self.tokens.generate_token(&self.transport)
    }

    pub fn revoke_token(&self, token: &str) -> Result<(), ApiError> {
        self.tokens.revoke_token(&self.transport, token)
    }

    pub fn account_id(&self) -> &str {
        self.tokens.account_id()
    }

    pub fn authenticator(&self) -> &Authenticator {
        &self.tokens
    }
}

impl<T: Transport, P: TokenProvider> OneLoginClient<T, P> {
    /// Assemble a client from ready-made parts. No request is made.
    pub fn with_parts(base_url: &str, transport: T, tokens: P) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            transport,
            tokens,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The token currently sent as the bearer credential.
    pub fn token(&self) -> &str {
        self.tokens.token()
    }

    /// Describe a resource request without sending it.
    pub fn build_request(&self, method: HttpMethod, path: &str, body: Option<String>) -> HttpRequest {
        HttpRequest {
            method,
            url: format!("{}{path}", self.base_url),
            headers: vec![
                ("authorization".to_string(), format!("Bearer {}", self.tokens.token())),
                ("content-type".to_string(), "application/json".to_string()),
            ],
            body,
        }
    }

    pub fn get(&self, path: &str) -> Result<ResponseEnvelope, ApiError> {
        self.send(HttpMethod::Get, path, None)
    }

    /// `GET` with a validated query string.
    pub fn list<Q>(&self, path: &str, query: Option<&Q>) -> Result<ResponseEnvelope, ApiError>
    where
        Q: Queryable + Serialize,
    {
        if let Some(query) = query {
            validate_query(query)?;
        }
        let path = add_query_to_path(path, query)?;
        self.send(HttpMethod::Get, &path, None)
    }

    pub fn post<B>(&self, path: &str, body: Option<&B>) -> Result<ResponseEnvelope, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let body = body.map(serde_json::to_string).transpose()?;
        self.send(HttpMethod::Post, path, body)
    }

    pub fn put<B>(&self, path: &str, body: Option<&B>) -> Result<ResponseEnvelope, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let body = body.map(serde_json::to_string).transpose()?;
        self.send(HttpMethod::Put, path, body)
    }

    pub fn delete(&self, path: &str) -> Result<ResponseEnvelope, ApiError> {
        self.send(HttpMethod::Delete, path, None)
    }

    fn send(&self, method: HttpMethod, path: &str, body: Option<String>) -> Result<ResponseEnvelope, ApiError> {
        let request = self.build_request(method, path, body);
        debug!(method = method.as_str(), path, "sending request");
        let response = self.transport.send(request)?;
        debug!(status = response.status, path, "received response");
        check_http_response(response)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::cell::RefCell;
    use std::collections::VecDeque;

    use serde_json::{json, Value};

    use super::*;
    use crate::auth::StaticToken;
    use crate::config::Credentials;
    use crate::http::HttpResponse;
    use crate::query::Pagination;
    use crate::response::ResponseData;

    /// Records every request and replays canned responses in order.
    #[derive(Default, Debug)]
    pub(crate) struct RecordingTransport {
        pub(crate) requests: RefCell<Vec<HttpRequest>>,
        responses: RefCell<VecDeque<HttpResponse>>,
    }

    impl RecordingTransport {
        pub(crate) fn replying(responses: impl IntoIterator<Item = (u16, &'static str)>) -> Self {
            let responses = responses
                .into_iter()
                .map(|(status, body)| HttpResponse {
                    status,
                    headers: Vec::new(),
                    body: body.as_bytes().to_vec(),
                })
                .collect();
            Self {
                requests: RefCell::new(Vec::new()),
                responses: RefCell::new(responses),
            }
        }

        pub(crate) fn last(&self) -> HttpRequest {
            self.requests.borrow().last().cloned().expect("no request sent")
        }
    }

    impl Transport for RecordingTransport {
        fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
            self.requests.borrow_mut().push(request);
            Ok(self.responses.borrow_mut().pop_front().unwrap_or(HttpResponse {
                status: 200,
                headers: Vec::new(),
                body: b"{}".to_vec(),
            }))
        }
    }

    pub(crate) fn client(
        transport: &RecordingTransport,
    ) -> OneLoginClient<&RecordingTransport, StaticToken> {
        OneLoginClient::with_parts("https://acme.onelogin.com/", transport, StaticToken("tok".to_string()))
    }

    pub(crate) fn body_of(request: &HttpRequest) -> Value {
        serde_json::from_str(request.body.as_deref().expect("request has no body")).unwrap()
    }

    #[test]
    fn requests_carry_bearer_and_json_headers() {
        let transport = RecordingTransport::default();
        client(&transport).get("/api/2/users").unwrap();
        let request = transport.last();
        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(request.url, "https://acme.onelogin.com/api/2/users");
        assert_eq!(request.header("Authorization"), Some("Bearer tok"));
        assert_eq!(request.header("Content-Type"), Some("application/json"));
        assert!(request.body.is_none());
    }

    #[test]
    fn post_serializes_body() {
        let transport = RecordingTransport::default();
        client(&transport)
            .post("/api/1/groups", Some(&json!({ "name": "Admins" })))
            .unwrap();
        assert_eq!(body_of(&transport.last()), json!({ "name": "Admins" }));
    }

    #[test]
    fn put_without_body_sends_none() {
        let transport = RecordingTransport::default();
        client(&transport).put::<Value>("/api/1/privileges/p/roles/3", None).unwrap();
        let request = transport.last();
        assert_eq!(request.method, HttpMethod::Put);
        assert!(request.body.is_none());
    }

    #[test]
    fn list_rejects_invalid_query_before_sending() {
        let transport = RecordingTransport::default();
        let query: Pagination = Pagination::new().with_limit("many");
        let err = client(&transport).list("/api/1/privileges", Some(&query)).unwrap_err();
        assert!(matches!(err, ApiError::Sdk(ref m) if m.contains("limit")));
        assert!(transport.requests.borrow().is_empty());
    }

    #[test]
    fn list_appends_query_string() {
        let transport = RecordingTransport::default();
        let query: Pagination = Pagination::new().with_limit("10").with_page("2");
        client(&transport).list("/api/1/privileges", Some(&query)).unwrap();
        assert_eq!(
            transport.last().url,
            "https://acme.onelogin.com/api/1/privileges?limit=10&page=2"
        );
    }

    #[test]
    fn error_status_is_returned_with_body() {
        let transport = RecordingTransport::replying([(404, r#"{"message":"Not Found"}"#)]);
        let err = client(&transport).get("/api/2/users/1").unwrap_err();
        match err {
            ApiError::Status { status, body } => {
                assert_eq!(status, 404);
                assert!(body.contains("Not Found"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn delete_with_empty_body_is_raw() {
        let transport = RecordingTransport::replying([(204, "")]);
        let envelope = client(&transport).delete("/api/2/users/1").unwrap();
        assert_eq!(envelope.status, 204);
        assert_eq!(envelope.data, ResponseData::Raw(String::new()));
    }

    #[test]
    fn connect_generates_token_first() {
        let transport = RecordingTransport::replying([(200, r#"{"access_token":"fresh","account_id":7}"#)]);
        let config = ClientConfig::new(Credentials::new("id", "secret", "acme"));
        let client = OneLoginClient::connect(&config, &transport).unwrap();
        assert_eq!(client.token(), "fresh");
        assert_eq!(client.account_id(), "7");
        assert_eq!(client.base_url(), "https://acme.onelogin.com");

        client.get("/api/2/users").unwrap();
        let requests = transport.requests.borrow();
        assert_eq!(requests[0].url, "https://acme.onelogin.com/auth/oauth2/v2/token");
        assert_eq!(requests[1].header("authorization"), Some("Bearer fresh"));
    }

    #[test]
    fn connect_with_empty_credentials_sends_nothing() {
        let transport = RecordingTransport::default();
        let config = ClientConfig::new(Credentials::new("", "", "acme"));
        let err = OneLoginClient::connect(&config, &transport).unwrap_err();
        assert!(matches!(err, ApiError::Configuration(_)));
        assert!(transport.requests.borrow().is_empty());
    }

    #[test]
    fn failed_regeneration_keeps_previous_token() {
        let transport = RecordingTransport::replying([(200, r#"{"access_token":"first"}"#), (401, "denied")]);
        let config = ClientConfig::new(Credentials::new("id", "secret", "acme"));
        let mut client = OneLoginClient::connect(&config, &transport).unwrap();
        assert!(matches!(client.generate_token(), Err(ApiError::Authentication(_))));
        assert_eq!(client.token(), "first");
    }
}
