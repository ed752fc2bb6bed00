use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::nullable::Nullable;
use crate::query::{validate_string, FieldValue, Pagination, Queryable, Validator};

/// An API authorization server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthServer {
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub id: Nullable<i32>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub name: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub description: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub configuration: Nullable<AuthServerConfiguration>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthServerConfiguration {
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub resource_identifier: Nullable<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub audiences: Vec<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub access_token_expiration_minutes: Nullable<i32>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub refresh_token_expiration_minutes: Nullable<i32>,
}

/// An app granted access to an auth server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientApp {
    #[serde(default, rename = "app_id", skip_serializing_if = "Nullable::is_absent")]
    pub id: Nullable<i32>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub auth_server_id: Nullable<i32>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub api_auth_id: Nullable<i32>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub name: Nullable<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scopes: Vec<Scope>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scope_ids: Vec<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scope {
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub id: Nullable<i32>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub auth_server_id: Nullable<i32>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub value: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub description: Nullable<String>,
}

/// A custom claim added to access tokens issued by an auth server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccessTokenClaim {
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub id: Nullable<i32>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub auth_server_id: Nullable<i32>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub label: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub user_attribute_mappings: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub user_attribute_macros: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub attribute_transformations: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub skip_if_blank: Nullable<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub default_values: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub provisioned_entitlements: Nullable<bool>,
}

/// Filters for `GET /api/2/api_authorizations`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AuthServerQuery {
    #[serde(flatten)]
    pub pagination: Pagination,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Queryable for AuthServerQuery {
    fn key_validators(&self) -> BTreeMap<&'static str, Validator> {
        let mut validators = self.pagination.key_validators();
        validators.insert("name", validate_string);
        validators
    }

    fn field(&self, key: &str) -> Option<FieldValue<'_>> {
        match key {
            "name" => Some(self.name.as_ref().into()),
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
