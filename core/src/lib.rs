//! Synchronous client core for the OneLogin REST API.
//!
//! # Overview
//! Authenticates with the OAuth2 client-credentials flow and exposes typed
//! helpers for users, groups, privileges, auth servers (with their scopes,
//! client apps and claims) and app rules. Every call runs through the same
//! pipeline: path building, query validation, bearer-token injection, and
//! response normalization into a `ResponseEnvelope`.
//!
//! # Design
//! - Requests and responses are plain data (`HttpRequest`, `HttpResponse`).
//!   The network round-trip sits behind the `Transport` trait, with
//!   `UreqTransport` as the production implementation.
//! - `Authenticator` splits each token operation into `build_*` / `parse_*`
//!   so the I/O boundary stays explicit and testable.
//! - Model records use `Nullable<T>` to keep absent, `null` and present
//!   values distinct.
//! - Model types are defined independently from the mock-server crate;
//!   integration tests catch schema drift.

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod models;
pub mod nullable;
pub mod path;
pub mod query;
pub mod response;

pub use auth::{Authenticator, StaticToken, TokenProvider};
pub use client::OneLoginClient;
pub use config::{ClientConfig, Credentials};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport};
pub use nullable::Nullable;
pub use path::{add_query_to_path, build_api_path, is_path_valid, PathSegment};
pub use query::{validate_query, AfterCursor, Cursor, FieldValue, Pagination, Queryable, Validator};
pub use response::{check_http_response, MetadataError, ResponseData, ResponseEnvelope, ResponseMetadata};
