use crate::api_path;
use crate::auth::TokenProvider;
use crate::error::ApiError;
use crate::http::Transport;
use crate::models::{AppRule, AppRuleQuery};
use crate::response::ResponseEnvelope;

use super::OneLoginClient;

pub const APPS_PATH: &str = "api/2/apps";

impl<T: Transport, P: TokenProvider> OneLoginClient<T, P> {
    pub fn list_app_rules(&self, app_id: i64, query: Option<&AppRuleQuery>) -> Result<ResponseEnvelope, ApiError> {
        let path = api_path!(APPS_PATH, app_id, "rules")?;
        self.list(&path, query)
    }

    pub fn get_app_rule(&self, app_id: i64, rule_id: i64) -> Result<ResponseEnvelope, ApiError> {
        let path = api_path!(APPS_PATH, app_id, "rules", rule_id)?;
        self.get(&path)
    }

    pub fn create_app_rule(&self, app_id: i64, rule: &AppRule) -> Result<ResponseEnvelope, ApiError> {
        let path = api_path!(APPS_PATH, app_id, "rules")?;
        self.post(&path, Some(rule))
    }

    pub fn update_app_rule(&self, app_id: i64, rule_id: i64, rule: &AppRule) -> Result<ResponseEnvelope, ApiError> {
        let path = api_path!(APPS_PATH, app_id, "rules", rule_id)?;
        self.put(&path, Some(rule))
    }

    pub fn delete_app_rule(&self, app_id: i64, rule_id: i64) -> Result<ResponseEnvelope, ApiError> {
        let path = api_path!(APPS_PATH, app_id, "rules", rule_id)?;
        self.delete(&path)
    }
}
