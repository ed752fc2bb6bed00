use crate::api_path;
use crate::auth::TokenProvider;
use crate::error::ApiError;
use crate::http::Transport;
use crate::models::{User, UserQuery};
use crate::response::ResponseEnvelope;

use super::OneLoginClient;

pub const USERS_PATH: &str = "api/2/users";

impl<T: Transport, P: TokenProvider> OneLoginClient<T, P> {
    pub fn list_users(&self, query: Option<&UserQuery>) -> Result<ResponseEnvelope, ApiError> {
        let path = api_path!(USERS_PATH)?;
        self.list(&path, query)
    }

    pub fn get_user(&self, user_id: i64) -> Result<ResponseEnvelope, ApiError> {
        let path = api_path!(USERS_PATH, user_id)?;
        self.get(&path)
    }

    pub fn create_user(&self, user: &User) -> Result<ResponseEnvelope, ApiError> {
        let path = api_path!(USERS_PATH)?;
        self.post(&path, Some(user))
    }

    pub fn update_user(&self, user_id: i64, user: &User) -> Result<ResponseEnvelope, ApiError> {
        let path = api_path!(USERS_PATH, user_id)?;
        self.put(&path, Some(user))
    }

    pub fn delete_user(&self, user_id: i64) -> Result<ResponseEnvelope, ApiError> {
        let path = api_path!(USERS_PATH, user_id)?;
        self.delete(&path)
    }

    /// Apps assigned to a user.
    pub fn get_user_apps(&self, user_id: i64) -> Result<ResponseEnvelope, ApiError> {
        let path = api_path!(USERS_PATH, user_id, "apps")?;
        self.get(&path)
    }

    /// Role ids assigned to a user.
    pub fn get_user_roles(&self, user_id: i64) -> Result<ResponseEnvelope, ApiError> {
        let path = api_path!(USERS_PATH, user_id, "roles")?;
        self.get(&path)
    }
}
