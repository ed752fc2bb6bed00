use crate::api_path;
use crate::auth::TokenProvider;
use crate::error::ApiError;
use crate::http::Transport;
use crate::models::{AuthServer, AuthServerQuery, Scope};
use crate::response::ResponseEnvelope;

use super::OneLoginClient;

pub const AUTH_SERVERS_PATH: &str = "api/2/api_authorizations";

impl<T: Transport, P: TokenProvider> OneLoginClient<T, P> {
    pub fn list_auth_servers(&self, query: Option<&AuthServerQuery>) -> Result<ResponseEnvelope, ApiError> {
        let path = api_path!(AUTH_SERVERS_PATH)?;
        self.list(&path, query)
    }

    pub fn get_auth_server(&self, server_id: i32) -> Result<ResponseEnvelope, ApiError> {
        let path = api_path!(AUTH_SERVERS_PATH, server_id)?;
        self.get(&path)
    }

    pub fn create_auth_server(&self, server: &AuthServer) -> Result<ResponseEnvelope, ApiError> {
        let path = api_path!(AUTH_SERVERS_PATH)?;
        self.post(&path, Some(server))
    }

    pub fn update_auth_server(&self, server_id: i32, server: &AuthServer) -> Result<ResponseEnvelope, ApiError> {
        let path = api_path!(AUTH_SERVERS_PATH, server_id)?;
        self.put(&path, Some(server))
    }

    pub fn delete_auth_server(&self, server_id: i32) -> Result<ResponseEnvelope, ApiError> {
        let path = api_path!(AUTH_SERVERS_PATH, server_id)?;
        self.delete(&path)
    }

    // -----------------------------------------------------------------------
    // Scopes
    // -----------------------------------------------------------------------

    pub fn list_scopes(&self, server_id: i32) -> Result<ResponseEnvelope, ApiError> {
        let path = api_path!(AUTH_SERVERS_PATH, server_id, "scopes")?;
        self.get(&path)
    }

    pub fn create_scope(&self, server_id: i32, scope: &Scope) -> Result<ResponseEnvelope, ApiError> {
        let path = api_path!(AUTH_SERVERS_PATH, server_id, "scopes")?;
        self.post(&path, Some(scope))
    }

    pub fn update_scope(&self, server_id: i32, scope_id: i32, scope: &Scope) -> Result<ResponseEnvelope, ApiError> {
        let path = api_path!(AUTH_SERVERS_PATH, server_id, "scopes", scope_id)?;
        self.put(&path, Some(scope))
    }

    pub fn delete_scope(&self, server_id: i32, scope_id: i32) -> Result<ResponseEnvelope, ApiError> {
        let path = api_path!(AUTH_SERVERS_PATH, server_id, "scopes", scope_id)?;
        self.delete(&path)
    }

    // -----------------------------------------------------------------------
    // Client apps and claims
    // -----------------------------------------------------------------------

    pub fn list_client_apps(&self, server_id: i32) -> Result<ResponseEnvelope, ApiError> {
        let path = api_path!(AUTH_SERVERS_PATH, server_id, "clients")?;
        self.get(&path)
    }

    pub fn list_access_token_claims(&self, server_id: i32) -> Result<ResponseEnvelope, ApiError> {
        let path = api_path!(AUTH_SERVERS_PATH, server_id, "claims")?;
        self.get(&path)
    }
}
