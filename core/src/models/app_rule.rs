use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::nullable::Nullable;
use crate::query::{display_as_string, validate_bool, validate_string, FieldValue, Pagination, Queryable, Validator};

/// A provisioning rule attached to an app.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppRule {
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub id: Nullable<i32>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub name: Nullable<String>,
    /// `all` or `any`.
    #[serde(default, rename = "match", skip_serializing_if = "Nullable::is_absent")]
    pub match_type: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub enabled: Nullable<bool>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub position: Nullable<i32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<AppRuleCondition>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<AppRuleAction>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppRuleCondition {
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub source: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub operator: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub value: Nullable<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppRuleAction {
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub action: Nullable<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub value: Vec<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub expression: Nullable<String>,
}

/// Filters for `GET /api/2/apps/{app_id}/rules`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AppRuleQuery {
    #[serde(flatten)]
    pub pagination: Pagination,
    #[serde(serialize_with = "display_as_string", skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// Condition source, e.g. `has_role`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_condition: Option<String>,
    /// Action name, e.g. `set_role`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_action: Option<String>,
}

impl Queryable for AppRuleQuery {
    fn key_validators(&self) -> BTreeMap<&'static str, Validator> {
        let mut validators = self.pagination.key_validators();
        validators.extend([
            ("enabled", validate_bool as Validator),
            ("has_condition", validate_string as Validator),
            ("has_action", validate_string as Validator),
        ]);
        validators
    }

    fn field(&self, key: &str) -> Option<FieldValue<'_>> {
        match key {
            "enabled" => Some(self.enabled.into()),
            "has_condition" => Some(self.has_condition.as_ref().into()),
            "has_action" => Some(self.has_action.as_ref().into()),
            _ => self.pagination.field(key),
        }
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
