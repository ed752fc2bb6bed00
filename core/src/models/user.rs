use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::nullable::Nullable;
use crate::query::{
    validate_comma_separated_list, validate_numeric_string, validate_string, validate_time, FieldValue, Pagination,
    Queryable, Validator,
};

/// Approval state of a user account, sent as an integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum UserState {
    Unapproved,
    Approved,
    Rejected,
    Unlicensed,
    Other(i32),
}

impl From<i32> for UserState {
    fn from(value: i32) -> Self {
        match value {
            0 => UserState::Unapproved,
            1 => UserState::Approved,
            2 => UserState::Rejected,
            3 => UserState::Unlicensed,
            other => UserState::Other(other),
        }
    }
}

impl From<UserState> for i32 {
    fn from(value: UserState) -> Self {
        match value {
            UserState::Unapproved => 0,
            UserState::Approved => 1,
            UserState::Rejected => 2,
            UserState::Unlicensed => 3,
            UserState::Other(other) => other,
        }
    }
}

/// Activation status of a user account, sent as an integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum UserStatus {
    Unactivated,
    Active,
    Suspended,
    Locked,
    PasswordExpired,
    AwaitingPasswordReset,
    PasswordPending,
    SecurityQuestionsRequired,
    Other(i32),
}

impl From<i32> for UserStatus {
    fn from(value: i32) -> Self {
        match value {
            0 => UserStatus::Unactivated,
            1 => UserStatus::Active,
            2 => UserStatus::Suspended,
            3 => UserStatus::Locked,
            4 => UserStatus::PasswordExpired,
            5 => UserStatus::AwaitingPasswordReset,
            7 => UserStatus::PasswordPending,
            8 => UserStatus::SecurityQuestionsRequired,
            other => UserStatus::Other(other),
        }
    }
}

impl From<UserStatus> for i32 {
    fn from(value: UserStatus) -> Self {
        match value {
            UserStatus::Unactivated => 0,
            UserStatus::Active => 1,
            UserStatus::Suspended => 2,
            UserStatus::Locked => 3,
            UserStatus::PasswordExpired => 4,
            UserStatus::AwaitingPasswordReset => 5,
            UserStatus::PasswordPending => 7,
            UserStatus::SecurityQuestionsRequired => 8,
            UserStatus::Other(other) => other,
        }
    }
}

/// A OneLogin user. Every field is sparse.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub id: Nullable<i64>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub firstname: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub lastname: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub username: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub email: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub phone: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub title: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub department: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub company: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub comment: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub distinguished_name: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub samaccountname: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub userprincipalname: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub member_of: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub password: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub password_confirmation: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub state: Nullable<UserState>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub status: Nullable<UserStatus>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub group_id: Nullable<i64>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub directory_id: Nullable<i64>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub trusted_idp_id: Nullable<i64>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub manager_ad_id: Nullable<i64>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub manager_user_id: Nullable<i64>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub external_id: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub role_ids: Nullable<Vec<i64>>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub custom_attributes: Nullable<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub created_at: Nullable<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub updated_at: Nullable<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub activated_at: Nullable<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub last_login: Nullable<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub password_changed_at: Nullable<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub locked_until: Nullable<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub invitation_sent_at: Nullable<DateTime<Utc>>,
}

/// An app assigned to a user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserApp {
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub id: Nullable<i32>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub name: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub icon_url: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub login_id: Nullable<i64>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub provisioning_status: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub provisioning_state: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub provisioning_enabled: Nullable<bool>,
}

/// Filters for `GET /api/2/users`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UserQuery {
    #[serde(flatten)]
    pub pagination: Pagination,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub firstname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lastname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub samaccountname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
    /// Comma-separated user ids.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_ids: Option<String>,
    /// Comma-separated attribute names to return.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_since: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_until: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_since: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_until: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login_since: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login_until: Option<DateTime<Utc>>,
}

impl Queryable for UserQuery {
    fn key_validators(&self) -> BTreeMap<&'static str, Validator> {
        let mut validators = self.pagination.key_validators();
        validators.extend([
            ("email", validate_string as Validator),
            ("username", validate_string as Validator),
            ("firstname", validate_string as Validator),
            ("lastname", validate_string as Validator),
            ("samaccountname", validate_string as Validator),
            ("directory_id", validate_numeric_string as Validator),
            ("external_id", validate_numeric_string as Validator),
            ("app_id", validate_numeric_string as Validator),
            ("user_ids", validate_comma_separated_list as Validator),
            ("fields", validate_comma_separated_list as Validator),
            ("created_since", validate_time as Validator),
            ("created_until", validate_time as Validator),
            ("updated_since", validate_time as Validator),
            ("updated_until", validate_time as Validator),
            ("last_login_since", validate_time as Validator),
            ("last_login_until", validate_time as Validator),
        ]);
        validators
    }

    fn field(&self, key: &str) -> Option<FieldValue<'_>> {
        let value = match key {
            "email" => self.email.as_ref().into(),
            "username" => self.username.as_ref().into(),
            "firstname" => self.firstname.as_ref().into(),
            "lastname" => self.lastname.as_ref().into(),
            "samaccountname" => self.samaccountname.as_ref().into(),
            "directory_id" => self.directory_id.as_ref().into(),
            "external_id" => self.external_id.as_ref().into(),
            "app_id" => self.app_id.as_ref().into(),
            "user_ids" => self.user_ids.as_ref().into(),
            "fields" => self.fields.as_ref().into(),
            "created_since" => self.created_since.as_ref().into(),
            "created_until" => self.created_until.as_ref().into(),
            "updated_since" => self.updated_since.as_ref().into(),
            "updated_until" => self.updated_until.as_ref().into(),
            "last_login_since" => self.last_login_since.as_ref().into(),
            "last_login_until" => self.last_login_until.as_ref().into(),
            _ => return self.pagination.field(key),
        };
        Some(value)
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
    use chrono::{Duration, TimeZone};
    use serde_json::json;

    use super::*;
    use crate::path::add_query_to_path;
    use crate::query::validate_query;

    fn check(query: &UserQuery, keys: &[&str], expect_valid: bool) {
        let validators = query.key_validators();
        for key in keys {
            let validator = validators.get(*key).unwrap_or_else(|| panic!("no validator for {key}"));
            let value = query.field(key).unwrap_or_else(|| panic!("no field for {key}"));
            assert_eq!(validator(value), expect_valid, "{key} = {value:?}");
        }
    }

    #[test]
    fn every_validator_key_has_a_field() {
        let query = UserQuery::default();
        for key in query.key_validators().keys() {
            assert!(query.field(key).is_some(), "no field for {key}");
        }
    }

    #[test]
    fn string_and_id_fields_validate() {
        let query = UserQuery {
            email: Some("test@example.com".to_string()),
            username: Some("testuser".to_string()),
            directory_id: Some("12345".to_string()),
            external_id: Some("67890".to_string()),
            app_id: Some("54321".to_string()),
            user_ids: Some("1,2,3,4,5".to_string()),
            ..Default::default()
        };
        check(
            &query,
            &["email", "username", "directory_id", "external_id", "app_id", "user_ids"],
            true,
        );
        assert!(validate_query(&query).is_ok());
    }

    #[test]
    fn date_range_fields_validate() {
        let now = Utc::now();
        let query = UserQuery {
            created_since: Some(now - Duration::hours(24)),
            created_until: Some(now),
            ..Default::default()
        };
        check(&query, &["created_since", "created_until"], true);
    }

    #[test]
    fn zero_time_is_invalid() {
        let query = UserQuery {
            created_since: Utc.with_ymd_and_hms(1, 1, 1, 0, 0, 0).single(),
            ..Default::default()
        };
        check(&query, &["created_since"], false);
        assert!(validate_query(&query).is_err());
    }

    #[test]
    fn non_numeric_ids_are_invalid() {
        let query = UserQuery {
            directory_id: Some("dir-123".to_string()),
            external_id: Some("9223372036854775808".to_string()),
            app_id: Some("123.456".to_string()),
            ..Default::default()
        };
        check(&query, &["directory_id", "external_id", "app_id"], false);
    }

    #[test]
    fn mixed_id_list_is_valid() {
        let query = UserQuery {
            user_ids: Some("1,abc,3,def-456,5".to_string()),
            ..Default::default()
        };
        check(&query, &["user_ids"], true);
    }

    #[test]
    fn whitespace_values_are_invalid() {
        let query = UserQuery {
            directory_id: Some("   ".to_string()),
            external_id: Some("\t".to_string()),
            app_id: Some("\n".to_string()),
            user_ids: Some(" , , ".to_string()),
            ..Default::default()
        };
        check(&query, &["directory_id", "external_id", "app_id", "user_ids"], false);
    }

    #[test]
    fn unset_fields_are_absent() {
        let query = UserQuery::default();
        assert_eq!(query.field("email"), Some(FieldValue::Absent));
        assert_eq!(query.field("limit"), Some(FieldValue::Absent));
        assert_eq!(query.field("nope"), None);
    }

    #[test]
    fn query_string_uses_wire_names() {
        let query = UserQuery {
            email: Some("a@b.com".to_string()),
            ..Default::default()
        };
        assert_eq!(add_query_to_path("/users", Some(&query)).unwrap(), "/users?email=a%40b.com");
    }

    #[test]
    fn query_string_includes_pagination_and_timestamps() {
        let mut query = UserQuery {
            created_since: Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).single(),
            ..Default::default()
        };
        query.set_limit("10".to_string());
        query.set_cursor("abc".to_string());
        let path = add_query_to_path("/api/2/users", Some(&query)).unwrap();
        assert_eq!(
            path,
            "/api/2/users?created_since=2024-01-02T03%3A04%3A05Z&cursor=abc&limit=10"
        );
    }

    #[test]
    fn user_serializes_only_present_fields() {
        let user = User {
            id: 456.into(),
            username: "janedoe".to_string().into(),
            email: "jane.doe@example.com".to_string().into(),
            state: UserState::Approved.into(),
            status: UserStatus::Active.into(),
            manager_user_id: Nullable::Null,
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&user).unwrap(),
            json!({
                "id": 456,
                "username": "janedoe",
                "email": "jane.doe@example.com",
                "state": 1,
                "status": 1,
                "manager_user_id": null
            })
        );
    }

    #[test]
    fn user_round_trip_preserves_null_versus_absent() {
        let raw = json!({
            "id": 2147483647,
            "firstname": "John",
            "lastname": null,
            "external_id": "ext-161718",
            "custom_attributes": { "department": "IT" },
            "created_at": "2024-05-01T12:00:00Z"
        });
        let user: User = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(user.lastname, Nullable::Null);
        assert_eq!(user.email, Nullable::Absent);
        assert_eq!(serde_json::to_value(&user).unwrap(), raw);
    }

    #[test]
    fn unknown_status_code_is_kept() {
        let user: User = serde_json::from_value(json!({ "status": 42 })).unwrap();
        assert_eq!(user.status, Nullable::Value(UserStatus::Other(42)));
        assert_eq!(serde_json::to_value(&user).unwrap(), json!({ "status": 42 }));
    }

    #[test]
    fn user_app_boundary_values() {
        let app = UserApp {
            id: 2147483647.into(),
            login_id: 9223372036854775807.into(),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&app).unwrap(),
            json!({ "id": 2147483647, "login_id": 9223372036854775807i64 })
        );
    }
}
