//! Query-parameter validation and the shared pagination fragment.
//!
//! # Design
//! Every list-query struct implements `Queryable`: it names its fields by a
//! logical key, exposes each field's current value as a `FieldValue`, and maps
//! each key to a `Validator`. The table is closed and flat. Resource queries
//! embed a `Pagination` fragment and only add entries of their own.
//!
//! `Pagination` is generic over the wire name of its cursor field, so a
//! resource that still speaks a legacy name (`after_cursor` for groups) keeps
//! the same validator key `cursor` as every other query.

use std::collections::BTreeMap;
use std::fmt::Display;
use std::marker::PhantomData;

use chrono::{DateTime, TimeZone, Utc};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::error::ApiError;

/// The current value of one query field, as seen by a validator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    /// The field is unset.
    Absent,
    Str(&'a str),
    Int(i64),
    Bool(bool),
    Time(&'a DateTime<Utc>),
}

impl<'a> From<Option<&'a String>> for FieldValue<'a> {
    fn from(value: Option<&'a String>) -> Self {
        value.map_or(FieldValue::Absent, |s| FieldValue::Str(s))
    }
}

impl<'a> From<Option<&'a DateTime<Utc>>> for FieldValue<'a> {
    fn from(value: Option<&'a DateTime<Utc>>) -> Self {
        value.map_or(FieldValue::Absent, FieldValue::Time)
    }
}

impl From<Option<bool>> for FieldValue<'_> {
    fn from(value: Option<bool>) -> Self {
        value.map_or(FieldValue::Absent, FieldValue::Bool)
    }
}

impl From<Option<i64>> for FieldValue<'_> {
    fn from(value: Option<i64>) -> Self {
        value.map_or(FieldValue::Absent, FieldValue::Int)
    }
}

/// A pure predicate over a field's current value.
pub type Validator = for<'a> fn(FieldValue<'a>) -> bool;

/// Capability shared by every list-query parameter struct.
pub trait Queryable {
    /// Logical field key → validator.
    fn key_validators(&self) -> BTreeMap<&'static str, Validator>;

    /// Current value for `key`, or `None` if the struct has no such field.
    fn field(&self, key: &str) -> Option<FieldValue<'_>>;

    fn set_limit(&mut self, limit: String);
    fn set_page(&mut self, page: String);
    fn set_cursor(&mut self, cursor: String);
}

/// Check every field that is set against its validator.
///
/// Unset fields are skipped; they never reach the query string.
pub fn validate_query<Q: Queryable + ?Sized>(query: &Q) -> Result<(), ApiError> {
    for (key, validator) in query.key_validators() {
        match query.field(key) {
            None | Some(FieldValue::Absent) => continue,
            Some(value) if validator(value) => continue,
            Some(value) => {
                return Err(ApiError::Sdk(format!("invalid query parameter {key}: {value:?}")));
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Validators
// ---------------------------------------------------------------------------

fn as_str(value: FieldValue<'_>) -> Option<&str> {
    match value {
        FieldValue::Str(s) => Some(s),
        _ => None,
    }
}

/// Present, a string, and non-empty after trimming.
pub fn validate_string(value: FieldValue<'_>) -> bool {
    as_str(value).is_some_and(|s| !s.trim().is_empty())
}

/// `validate_string`, and no whitespace inside the trimmed value.
pub fn validate_strict_string(value: FieldValue<'_>) -> bool {
    validate_string(value) && as_str(value).is_some_and(|s| !s.trim().contains(char::is_whitespace))
}

/// `validate_string`, and every comma-delimited item non-empty after trimming.
pub fn validate_comma_separated_list(value: FieldValue<'_>) -> bool {
    validate_string(value) && as_str(value).is_some_and(|s| s.split(',').all(|item| !item.trim().is_empty()))
}

/// `validate_string`, and the trimmed value parses as a base-10 `i64`.
pub fn validate_numeric_string(value: FieldValue<'_>) -> bool {
    validate_string(value) && as_str(value).is_some_and(|s| s.trim().parse::<i64>().is_ok())
}

/// Present, and neither the Unix epoch nor the `0001-01-01T00:00:00Z` zero
/// value some upstream tooling emits for "unset".
pub fn validate_time(value: FieldValue<'_>) -> bool {
    match value {
        FieldValue::Time(t) => t.timestamp() != 0 && Some(*t) != zero_time(),
        _ => false,
    }
}

/// Present and an integer.
pub fn validate_int(value: FieldValue<'_>) -> bool {
    matches!(value, FieldValue::Int(_))
}

/// Present and a boolean.
pub fn validate_bool(value: FieldValue<'_>) -> bool {
    matches!(value, FieldValue::Bool(_))
}

fn zero_time() -> Option<DateTime<Utc>> {
    Utc.with_ymd_and_hms(1, 1, 1, 0, 0, 0).single()
}

/// Serialize a typed optional value as its `Display` string, so non-string
/// query fields still reach the query string as flat strings.
pub(crate) fn display_as_string<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Display,
    S: Serializer,
{
    match value {
        Some(v) => serializer.collect_str(v),
        None => serializer.serialize_none(),
    }
}

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

/// Wire name of the cursor parameter for a family of endpoints.
pub trait CursorName {
    const WIRE_NAME: &'static str;
}

/// Cursor sent as `cursor`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor;

impl CursorName for Cursor {
    const WIRE_NAME: &'static str = "cursor";
}

/// Cursor sent as the legacy `after_cursor`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AfterCursor;

impl CursorName for AfterCursor {
    const WIRE_NAME: &'static str = "after_cursor";
}

/// Limit/page/cursor parameters shared by every list endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pagination<C = Cursor> {
    pub limit: Option<String>,
    pub page: Option<String>,
    pub cursor: Option<String>,
    wire: PhantomData<C>,
}

impl<C: CursorName> Pagination<C> {
    pub fn new() -> Self {
        Self {
            limit: None,
            page: None,
            cursor: None,
            wire: PhantomData,
        }
    }

    pub fn with_limit(mut self, limit: impl Into<String>) -> Self {
        self.limit = Some(limit.into());
        self
    }

    pub fn with_page(mut self, page: impl Into<String>) -> Self {
        self.page = Some(page.into());
        self
    }

    pub fn with_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = Some(cursor.into());
        self
    }
}

impl<C: CursorName> Serialize for Pagination<C> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let entries = [
            ("limit", &self.limit),
            ("page", &self.page),
            (C::WIRE_NAME, &self.cursor),
        ];
        let mut map = serializer.serialize_map(Some(entries.iter().filter(|(_, v)| v.is_some()).count()))?;
        for (key, value) in entries {
            if let Some(value) = value {
                map.serialize_entry(key, value)?;
            }
        }
        map.end()
    }
}

impl<C: CursorName> Queryable for Pagination<C> {
    fn key_validators(&self) -> BTreeMap<&'static str, Validator> {
        BTreeMap::from([
            ("limit", validate_numeric_string as Validator),
            ("page", validate_numeric_string as Validator),
            ("cursor", validate_string as Validator),
        ])
    }

    fn field(&self, key: &str) -> Option<FieldValue<'_>> {
        match key {
            "limit" => Some(self.limit.as_ref().into()),
            "page" => Some(self.page.as_ref().into()),
            "cursor" => Some(self.cursor.as_ref().into()),
            _ => None,
        }
    }

    fn set_limit(&mut self, limit: String) {
        self.limit = Some(limit);
    }

    fn set_page(&mut self, page: String) {
        self.page = Some(page);
    }

    fn set_cursor(&mut self, cursor: String) {
        self.cursor = Some(cursor);
    }
}
