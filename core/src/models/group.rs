use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::nullable::Nullable;
use crate::query::{AfterCursor, FieldValue, Pagination, Queryable, Validator};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Group {
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub id: Nullable<i64>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub name: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub reference: Nullable<String>,
}

/// Filters for `GET /api/1/groups`. The cursor goes out as `after_cursor`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GroupQuery {
    #[serde(flatten)]
    pub pagination: Pagination<AfterCursor>,
}

impl Queryable for GroupQuery {
    fn key_validators(&self) -> BTreeMap<&'static str, Validator> {
        self.pagination.key_validators()
    }

    fn field(&self, key: &str) -> Option<FieldValue<'_>> {
        self.pagination.field(key)
    }

    fn set_limit(&mut self, limit: String) {
        self.pagination.set_limit(limit);
    }

    fn set_page(&mut self, page: String) {
        self.pagination.set_page(page);
    }

    fn set_cursor(&mut self, cursor: String) {
        self.pagination.set_cursor(cursor);
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::path::add_query_to_path;

    #[test]
    fn cursor_is_sent_as_after_cursor() {
        let mut query = GroupQuery::default();
        query.set_cursor("next-page".to_string());
        query.set_limit("50".to_string());
        assert_eq!(
            add_query_to_path("/api/1/groups", Some(&query)).unwrap(),
            "/api/1/groups?after_cursor=next-page&limit=50"
        );
        assert_eq!(query.field("cursor"), Some(FieldValue::Str("next-page")));
    }

    #[test]
    fn every_validator_key_has_a_field() {
        let query = GroupQuery::default();
        for key in query.key_validators().keys() {
            assert!(query.field(key).is_some(), "no field for {key}");
        }
    }

    #[test]
    fn reference_may_be_null() {
        let group: Group = serde_json::from_value(json!({ "id": 3, "name": "Admins", "reference": null })).unwrap();
        assert_eq!(group.name.value().map(String::as_str), Some("Admins"));
        assert!(group.reference.is_null());
    }
}
