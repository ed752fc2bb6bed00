use crate::api_path;
use crate::auth::TokenProvider;
use crate::error::ApiError;
use crate::http::Transport;
use crate::models::GroupQuery;
use crate::response::ResponseEnvelope;

use super::OneLoginClient;

pub const GROUPS_PATH: &str = "api/1/groups";

impl<T: Transport, P: TokenProvider> OneLoginClient<T, P> {
    pub fn list_groups(&self, query: Option<&GroupQuery>) -> Result<ResponseEnvelope, ApiError> {
        let path = api_path!(GROUPS_PATH)?;
        self.list(&path, query)
    }

    pub fn get_group(&self, group_id: i64) -> Result<ResponseEnvelope, ApiError> {
        let path = api_path!(GROUPS_PATH, group_id)?;
        self.get(&path)
    }
}
