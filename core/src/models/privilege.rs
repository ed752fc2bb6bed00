use serde::{Deserialize, Serialize};

use crate::nullable::Nullable;

/// A delegated-administration privilege. Ids are opaque strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Privilege {
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub id: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub name: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub description: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub privilege: Nullable<PrivilegeData>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrivilegeData {
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub version: Nullable<String>,
    #[serde(default, rename = "Statement", skip_serializing_if = "Vec::is_empty")]
    pub statement: Vec<StatementData>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatementData {
    #[serde(rename = "Effect")]
    pub effect: String,
    #[serde(default, rename = "Action")]
    pub action: Vec<String>,
    #[serde(default, rename = "Scope")]
    pub scope: Vec<String>,
}

/// Body of `POST /api/1/privileges/{id}/users`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrivilegeUsers {
    pub users: Vec<i64>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn statement_uses_capitalized_keys() {
        let privilege = Privilege {
            name: "Read users".to_string().into(),
            privilege: PrivilegeData {
                version: "2018-05-18".to_string().into(),
                statement: vec![StatementData {
                    effect: "Allow".to_string(),
                    action: vec!["users:List".to_string()],
                    scope: vec!["*".to_string()],
                }],
            }
            .into(),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&privilege).unwrap(),
            json!({
                "name": "Read users",
                "privilege": {
                    "version": "2018-05-18",
                    "Statement": [{ "Effect": "Allow", "Action": ["users:List"], "Scope": ["*"] }]
                }
            })
        );
    }

    #[test]
    fn decodes_server_record() {
        let privilege: Privilege = serde_json::from_value(json!({
            "id": "priv-1",
            "name": "Admins",
            "description": null,
            "privilege": { "version": "2018-05-18", "Statement": [] }
        }))
        .unwrap();
        assert_eq!(privilege.id.value().map(String::as_str), Some("priv-1"));
        assert!(privilege.description.is_null());
        assert!(privilege.privilege.value().is_some_and(|data| data.statement.is_empty()));
    }
}
