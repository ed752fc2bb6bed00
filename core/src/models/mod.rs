//! Resource records and list-query parameter structs.
//!
//! Records mirror the API's sparse JSON: every optional scalar is a
//! `Nullable<T>` so that a missing field, an explicit `null` and a value all
//! survive a decode/encode cycle. Lists that the API omits when empty are
//! plain `Vec`s skipped when empty.

mod app_rule;
mod auth_server;
mod group;
mod privilege;
mod user;

pub use app_rule::{AppRule, AppRuleAction, AppRuleCondition, AppRuleQuery};
pub use auth_server::{AccessTokenClaim, AuthServer, AuthServerConfiguration, AuthServerQuery, ClientApp, Scope};
pub use group::{Group, GroupQuery};
pub use privilege::{Privilege, PrivilegeData, PrivilegeUsers, StatementData};
pub use user::{User, UserApp, UserQuery, UserState, UserStatus};
