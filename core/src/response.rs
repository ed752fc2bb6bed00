//! Normalization of raw HTTP responses into a `ResponseEnvelope`.
//!
//! # Design
//! Every resource call funnels through `check_http_response`. The status is
//! checked first; anything other than 200, 201 or 204 becomes
//! `ApiError::Status` carrying the body text. Successful bodies are sniffed by
//! their first byte: `[` is a JSON array, `{` is a JSON object, anything else
//! (including an empty body) is kept as an opaque string.
//!
//! Pagination and rate-limit headers are parsed into `ResponseMetadata`. A
//! malformed header never fails the call: the envelope carries the first
//! `MetadataError` and the remaining fields are still populated. Missing
//! headers are simply `None`.
//!
//! Cursors found in a JSON object body (`before_cursor` / `after_cursor`)
//! override the header cursors when they are non-empty.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;

use crate::error::ApiError;
use crate::http::HttpResponse;

pub const CURRENT_PAGE: &str = "Current-Page";
pub const PAGE_ITEMS: &str = "Page-Items";
pub const TOTAL_COUNT: &str = "Total-Count";
pub const TOTAL_PAGES: &str = "Total-Pages";
pub const BEFORE_CURSOR: &str = "Before-Cursor";
pub const CURSOR: &str = "Cursor";
pub const AFTER_CURSOR: &str = "After-Cursor";
pub const RATE_LIMIT_LIMIT: &str = "X-RateLimit-Limit";
pub const RATE_LIMIT_REMAINING: &str = "X-RateLimit-Remaining";
pub const RATE_LIMIT_RESET: &str = "X-RateLimit-Reset";

/// Pagination and rate-limit information taken from headers and body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResponseMetadata {
    pub current_page: Option<i64>,
    pub page_items: Option<i64>,
    pub total_count: Option<i64>,
    pub total_pages: Option<i64>,
    pub prev_cursor: Option<String>,
    pub next_cursor: Option<String>,
    pub rate_limit_limit: Option<i64>,
    pub rate_limit_remaining: Option<i64>,
    pub rate_limit_reset: Option<i64>,
}

/// A successful body, classified by shape.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseData {
    Object(Map<String, Value>),
    Array(Vec<Value>),
    /// Empty or non-JSON body, e.g. a plain-text confirmation.
    Raw(String),
}

impl ResponseData {
    pub fn as_object(&self) -> Option<&Map<String, Value>> {
        match self {
            ResponseData::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            ResponseData::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_raw(&self) -> Option<&str> {
        match self {
            ResponseData::Raw(text) => Some(text),
            _ => None,
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            ResponseData::Object(map) => Value::Object(map.clone()),
            ResponseData::Array(items) => Value::Array(items.clone()),
            ResponseData::Raw(text) => Value::String(text.clone()),
        }
    }
}

/// A header that was present but could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {header} header {value:?}: {reason}")]
pub struct MetadataError {
    pub header: &'static str,
    pub value: String,
    pub reason: String,
}

/// Decoded body plus metadata for one successful call.
///
/// Check `error` before trusting the numeric metadata fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseEnvelope {
    pub status: u16,
    pub data: ResponseData,
    pub metadata: ResponseMetadata,
    pub error: Option<MetadataError>,
}

impl ResponseEnvelope {
    /// Decode the payload into a model type.
    pub fn data_as<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_value(self.data.to_value()).map_err(ApiError::from)
    }
}

/// Classify `response` and build its envelope.
pub fn check_http_response(response: HttpResponse) -> Result<ResponseEnvelope, ApiError> {
    if !matches!(response.status, 200 | 201 | 204) {
        return Err(ApiError::Status {
            status: response.status,
            body: response.body_text().into_owned(),
        });
    }

    let (data, body_prev, body_next) = classify_body(&response.body)?;
    let (mut metadata, error) = parse_metadata(&response);

    if let Some(prev) = body_prev {
        metadata.prev_cursor = Some(prev);
    }
    if let Some(next) = body_next {
        metadata.next_cursor = Some(next);
    }

    Ok(ResponseEnvelope {
        status: response.status,
        data,
        metadata,
        error,
    })
}

type Classified = (ResponseData, Option<String>, Option<String>);

fn classify_body(body: &[u8]) -> Result<Classified, ApiError> {
    match body.first() {
        Some(b'[') => {
            let items: Vec<Value> = serde_json::from_slice(body)
                .map_err(|e| ApiError::Serialization(format!("failed to decode response array: {e}")))?;
            Ok((ResponseData::Array(items), None, None))
        }
        Some(b'{') => {
            let object: Map<String, Value> = serde_json::from_slice(body)
                .map_err(|e| ApiError::Serialization(format!("failed to decode response object: {e}")))?;
            let prev = body_cursor(&object, "before_cursor");
            let next = body_cursor(&object, "after_cursor");
            Ok((ResponseData::Object(object), prev, next))
        }
        _ => Ok((ResponseData::Raw(String::from_utf8_lossy(body).into_owned()), None, None)),
    }
}

fn body_cursor(object: &Map<String, Value>, key: &str) -> Option<String> {
    object
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn parse_metadata(response: &HttpResponse) -> (ResponseMetadata, Option<MetadataError>) {
    let mut first_error = None;
    let mut number = |header: &'static str| -> Option<i64> {
        let raw = non_empty_header(response, header)?;
        match raw.trim().parse::<i64>() {
            Ok(n) => Some(n),
            Err(e) => {
                warn!(header, value = raw, "ignoring malformed metadata header");
                first_error.get_or_insert(MetadataError {
                    header,
                    value: raw.to_string(),
                    reason: e.to_string(),
                });
                None
            }
        }
    };

    let metadata = ResponseMetadata {
        current_page: number(CURRENT_PAGE),
        page_items: number(PAGE_ITEMS),
        total_count: number(TOTAL_COUNT),
        total_pages: number(TOTAL_PAGES),
        rate_limit_limit: number(RATE_LIMIT_LIMIT),
        rate_limit_remaining: number(RATE_LIMIT_REMAINING),
        rate_limit_reset: number(RATE_LIMIT_RESET),
        prev_cursor: non_empty_header(response, BEFORE_CURSOR)
            .or_else(|| non_empty_header(response, CURSOR))
            .map(str::to_string),
        next_cursor: non_empty_header(response, AFTER_CURSOR).map(str::to_string),
    };
    (metadata, first_error)
}

fn non_empty_header<'a>(response: &'a HttpResponse, name: &str) -> Option<&'a str> {
    response.header(name).filter(|v| !v.trim().is_empty())
}
