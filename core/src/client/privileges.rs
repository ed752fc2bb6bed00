use serde_json::Value;

use crate::api_path;
use crate::auth::TokenProvider;
use crate::error::ApiError;
use crate::http::Transport;
use crate::models::{Privilege, PrivilegeUsers};
use crate::query::Pagination;
use crate::response::ResponseEnvelope;

use super::OneLoginClient;

pub const PRIVILEGES_PATH: &str = "api/1/privileges";

impl<T: Transport, P: TokenProvider> OneLoginClient<T, P> {
    pub fn list_privileges(&self, query: Option<&Pagination>) -> Result<ResponseEnvelope, ApiError> {
        let path = api_path!(PRIVILEGES_PATH)?;
        self.list(&path, query)
    }

    pub fn create_privilege(&self, privilege: &Privilege) -> Result<ResponseEnvelope, ApiError> {
        let path = api_path!(PRIVILEGES_PATH)?;
        self.post(&path, Some(privilege))
    }

    pub fn get_privilege(&self, privilege_id: &str) -> Result<ResponseEnvelope, ApiError> {
        let path = api_path!(PRIVILEGES_PATH, privilege_id)?;
        self.get(&path)
    }

    pub fn update_privilege(&self, privilege_id: &str, privilege: &Privilege) -> Result<ResponseEnvelope, ApiError> {
        let path = api_path!(PRIVILEGES_PATH, privilege_id)?;
        self.put(&path, Some(privilege))
    }

    pub fn delete_privilege(&self, privilege_id: &str) -> Result<ResponseEnvelope, ApiError> {
        let path = api_path!(PRIVILEGES_PATH, privilege_id)?;
        self.delete(&path)
    }

    pub fn get_privilege_users(&self, privilege_id: &str) -> Result<ResponseEnvelope, ApiError> {
        let path = api_path!(PRIVILEGES_PATH, privilege_id, "users")?;
        self.get(&path)
    }

    pub fn assign_users_to_privilege(&self, privilege_id: &str, user_ids: &[i64]) -> Result<ResponseEnvelope, ApiError> {
        let path = api_path!(PRIVILEGES_PATH, privilege_id, "users")?;
        let body = PrivilegeUsers {
            users: user_ids.to_vec(),
        };
        self.post(&path, Some(&body))
    }

    pub fn remove_privilege_from_user(&self, privilege_id: &str, user_id: i64) -> Result<ResponseEnvelope, ApiError> {
        let path = api_path!(PRIVILEGES_PATH, privilege_id, "users", user_id)?;
        self.delete(&path)
    }

    pub fn get_privilege_roles(&self, privilege_id: &str) -> Result<ResponseEnvelope, ApiError> {
        let path = api_path!(PRIVILEGES_PATH, privilege_id, "roles")?;
        self.get(&path)
    }

    pub fn add_privilege_to_role(&self, privilege_id: &str, role_id: i64) -> Result<ResponseEnvelope, ApiError> {
        let path = api_path!(PRIVILEGES_PATH, privilege_id, "roles", role_id)?;
        self.put::<Value>(&path, None)
    }

    pub fn delete_role_from_privilege(&self, privilege_id: &str, role_id: i64) -> Result<ResponseEnvelope, ApiError> {
        let path = api_path!(PRIVILEGES_PATH, privilege_id, "roles", role_id)?;
        self.delete(&path)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::client::tests::{body_of, client, RecordingTransport};
    use crate::error::ApiError;
    use crate::http::HttpMethod;
    use crate::models::Privilege;
    use crate::query::Pagination;

    const BASE: &str = "https://acme.onelogin.com/api/1/privileges";

    #[test]
    fn privilege_crud() {
        let transport = RecordingTransport::default();
        let client = client(&transport);
        let privilege = Privilege {
            name: "Auditors".to_string().into(),
            ..Default::default()
        };

        client.create_privilege(&privilege).unwrap();
        let request = transport.last();
        assert_eq!((request.method, request.url.as_str()), (HttpMethod::Post, BASE));
        assert_eq!(body_of(&request), json!({ "name": "Auditors" }));

        client.get_privilege("p-1").unwrap();
        assert_eq!(transport.last().url, format!("{BASE}/p-1"));

        client.update_privilege("p-1", &privilege).unwrap();
        let request = transport.last();
        assert_eq!(request.method, HttpMethod::Put);
        assert_eq!(body_of(&request), json!({ "name": "Auditors" }));

        client.delete_privilege("p-1").unwrap();
        let request = transport.last();
        assert_eq!((request.method, request.url), (HttpMethod::Delete, format!("{BASE}/p-1")));
    }

    #[test]
    fn list_privileges_paginates() {
        let transport = RecordingTransport::default();
        let query: Pagination = Pagination::new().with_cursor("abc");
        client(&transport).list_privileges(Some(&query)).unwrap();
        assert_eq!(transport.last().url, format!("{BASE}?cursor=abc"));
    }

    #[test]
    fn user_assignment() {
        let transport = RecordingTransport::default();
        let client = client(&transport);

        client.get_privilege_users("p-1").unwrap();
        assert_eq!(transport.last().url, format!("{BASE}/p-1/users"));

        client.assign_users_to_privilege("p-1", &[1, 2, 3]).unwrap();
        let request = transport.last();
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(body_of(&request), json!({ "users": [1, 2, 3] }));

        client.remove_privilege_from_user("p-1", 2).unwrap();
        let request = transport.last();
        assert_eq!((request.method, request.url), (HttpMethod::Delete, format!("{BASE}/p-1/users/2")));
    }

    #[test]
    fn role_assignment() {
        let transport = RecordingTransport::default();
        let client = client(&transport);

        client.get_privilege_roles("p-1").unwrap();
        assert_eq!(transport.last().url, format!("{BASE}/p-1/roles"));

        client.add_privilege_to_role("p-1", 5).unwrap();
        let request = transport.last();
        assert_eq!((request.method, request.url.as_str()), (HttpMethod::Put, format!("{BASE}/p-1/roles/5").as_str()));
        assert!(request.body.is_none());

        client.delete_role_from_privilege("p-1", 5).unwrap();
        assert_eq!(transport.last().method, HttpMethod::Delete);
    }

    #[test]
    fn id_with_path_characters_is_rejected() {
        let transport = RecordingTransport::default();
        let err = client(&transport).get_privilege("p 1").unwrap_err();
        assert!(matches!(err, ApiError::Sdk(_)));
        assert!(transport.requests.borrow().is_empty());
    }
}
