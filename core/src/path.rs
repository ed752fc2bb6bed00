//! Resource path and query-string construction.
//!
//! # Design
//! A path is a sequence of segments, each either a literal (`"api/1/privileges"`,
//! `"users"`) or a numeric resource id. Segment order is preserved as given,
//! which is how nesting such as `/privileges/{id}/users/{user_id}` is expressed.
//! Anything else converted into a `PathSegment` (floats, booleans) is kept as
//! `Unsupported` and rejected when the path is built, so call sites written
//! with `api_path!` fail with an error rather than a silently wrong URL.
//!
//! Query strings come from serializing a query struct to JSON and requiring a
//! flat object of string values. Non-string fields therefore fail loudly.

use std::collections::BTreeMap;

use serde::Serialize;
use url::form_urlencoded;

use crate::error::ApiError;

/// One component of a resource path.
#[derive(Debug, Clone, PartialEq)]
pub enum PathSegment {
    Literal(String),
    Id(i64),
    /// A value of a type that has no path representation; holds the type name.
    Unsupported(&'static str),
}

impl From<&str> for PathSegment {
    fn from(value: &str) -> Self {
        PathSegment::Literal(value.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(value: String) -> Self {
        PathSegment::Literal(value)
    }
}

impl From<&String> for PathSegment {
    fn from(value: &String) -> Self {
        PathSegment::Literal(value.clone())
    }
}

impl From<i32> for PathSegment {
    fn from(value: i32) -> Self {
        PathSegment::Id(i64::from(value))
    }
}

impl From<u32> for PathSegment {
    fn from(value: u32) -> Self {
        PathSegment::Id(i64::from(value))
    }
}

impl From<i64> for PathSegment {
    fn from(value: i64) -> Self {
        PathSegment::Id(value)
    }
}

impl From<f32> for PathSegment {
    fn from(_: f32) -> Self {
        PathSegment::Unsupported("f32")
    }
}

impl From<f64> for PathSegment {
    fn from(_: f64) -> Self {
        PathSegment::Unsupported("f64")
    }
}

impl From<bool> for PathSegment {
    fn from(_: bool) -> Self {
        PathSegment::Unsupported("bool")
    }
}

/// Build an API path from mixed literal and id segments.
///
/// ```
/// let path = onelogin_core::api_path!("privileges", 42, "users").unwrap();
/// assert_eq!(path, "/privileges/42/users");
/// ```
#[macro_export]
macro_rules! api_path {
    ($($segment:expr),+ $(,)?) => {
        $crate::path::build_api_path(&[$($crate::path::PathSegment::from($segment)),+])
    };
}

/// Join segments with a leading `/` each and validate the result.
pub fn build_api_path(segments: &[PathSegment]) -> Result<String, ApiError> {
    let mut path = String::new();
    for segment in segments {
        match segment {
            PathSegment::Literal(literal) => {
                path.push('/');
                path.push_str(literal);
            }
            PathSegment::Id(id) => {
                path.push('/');
                path.push_str(&id.to_string());
            }
            PathSegment::Unsupported(type_name) => {
                return Err(ApiError::Sdk(format!("Unsupported path type: {type_name}")));
            }
        }
    }

    if !is_path_valid(&path) {
        return Err(ApiError::Sdk(format!("Invalid path: {path:?}")));
    }
    Ok(path)
}

/// A path is valid when it is absolute, has no empty, `.` or `..` segments,
/// and only uses unreserved URL characters.
pub fn is_path_valid(path: &str) -> bool {
    let Some(rest) = path.strip_prefix('/') else {
        return false;
    };
    rest.split('/').all(|segment| {
        !segment.is_empty()
            && segment != "."
            && segment != ".."
            && segment
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '~'))
    })
}

/// Append `query` to `path` as a URL-encoded query string.
///
/// Keys are emitted in sorted order. When `query` is `None` or serializes to
/// an empty object the path is returned unchanged.
pub fn add_query_to_path<Q>(path: &str, query: Option<&Q>) -> Result<String, ApiError>
where
    Q: Serialize + ?Sized,
{
    let Some(query) = query else {
        return Ok(path.to_string());
    };

    let value = serde_json::to_value(query)?;
    let pairs: BTreeMap<String, String> = serde_json::from_value(value)
        .map_err(|e| ApiError::Serialization(format!("query parameters must be flat string values: {e}")))?;
    if pairs.is_empty() {
        return Ok(path.to_string());
    }

    let mut encoded = form_urlencoded::Serializer::new(String::new());
    for (key, value) in &pairs {
        encoded.append_pair(key, value);
    }
    Ok(format!("{path}?{}", encoded.finish()))
}
