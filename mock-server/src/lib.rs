use std::{
    collections::{BTreeMap, BTreeSet, HashMap, HashSet},
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use axum::{
    extract::{Path, Query, Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};
use uuid::Uuid;

pub const DEFAULT_CLIENT_ID: &str = "mock-client-id";
pub const DEFAULT_CLIENT_SECRET: &str = "mock-client-secret";
pub const ACCOUNT_ID: i64 = 12345;
pub const TOKEN_LIFETIME: i64 = 36000;
pub const RATE_LIMIT: u64 = 5000;
pub const RATE_LIMIT_RESET: u64 = 3600;
const DEFAULT_PAGE_SIZE: usize = 50;

/// Credentials the token endpoint accepts.
#[derive(Clone, Debug)]
pub struct MockConfig {
    pub client_id: String,
    pub client_secret: String,
}

impl MockConfig {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Read `MOCK_CLIENT_ID` / `MOCK_CLIENT_SECRET`, falling back to the defaults.
    pub fn from_env() -> Self {
        Self::new(
            std::env::var("MOCK_CLIENT_ID").unwrap_or_else(|_| DEFAULT_CLIENT_ID.to_string()),
            std::env::var("MOCK_CLIENT_SECRET").unwrap_or_else(|_| DEFAULT_CLIENT_SECRET.to_string()),
        )
    }

    fn basic_authorization(&self) -> String {
        format!(
            "Basic {}",
            STANDARD.encode(format!("{}:{}", self.client_id, self.client_secret))
        )
    }
}

impl Default for MockConfig {
    fn default() -> Self {
        Self::new(DEFAULT_CLIENT_ID, DEFAULT_CLIENT_SECRET)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Group {
    pub id: i64,
    pub name: String,
    pub reference: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Privilege {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub privilege: Value,
}

#[derive(Deserialize)]
pub struct CreatePrivilege {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub privilege: Value,
}

#[derive(Deserialize)]
pub struct UpdatePrivilege {
    pub name: Option<String>,
    pub description: Option<String>,
    pub privilege: Option<Value>,
}

#[derive(Deserialize)]
pub struct TokenGrant {
    pub grant_type: String,
}

#[derive(Deserialize)]
pub struct RevokeRequest {
    pub access_token: String,
}

#[derive(Deserialize)]
pub struct UserIds {
    pub users: Vec<i64>,
}

#[derive(Default)]
struct PrivilegeEntry {
    record: Option<Privilege>,
    users: BTreeSet<i64>,
    roles: BTreeSet<i64>,
}

/// In-memory account state.
pub struct Store {
    tokens: HashSet<String>,
    users: BTreeMap<i64, Map<String, Value>>,
    next_user_id: i64,
    groups: Vec<Group>,
    privileges: HashMap<String, PrivilegeEntry>,
}

impl Store {
    fn seeded() -> Self {
        let groups = [(1, "Admins"), (2, "Engineering"), (3, "Sales")]
            .into_iter()
            .map(|(id, name)| Group {
                id,
                name: name.to_string(),
                reference: None,
            })
            .collect();
        Self {
            tokens: HashSet::new(),
            users: BTreeMap::new(),
            next_user_id: 1,
            groups,
            privileges: HashMap::new(),
        }
    }
}

pub type Db = Arc<RwLock<Store>>;

#[derive(Clone)]
pub struct AppState {
    config: Arc<MockConfig>,
    db: Db,
    requests: Arc<AtomicU64>,
}

pub fn app(config: MockConfig) -> Router {
    let state = AppState {
        config: Arc::new(config),
        db: Arc::new(RwLock::new(Store::seeded())),
        requests: Arc::new(AtomicU64::new(0)),
    };

    let api = Router::new()
        .route("/api/2/users", get(list_users).post(create_user))
        .route("/api/2/users/{id}", get(get_user).put(update_user).delete(delete_user))
        .route("/api/2/users/{id}/apps", get(get_user_apps))
        .route("/api/2/users/{id}/roles", get(get_user_roles))
        .route("/api/1/groups", get(list_groups))
        .route("/api/1/groups/{id}", get(get_group))
        .route("/api/1/privileges", get(list_privileges).post(create_privilege))
        .route(
            "/api/1/privileges/{id}",
            get(get_privilege).put(update_privilege).delete(delete_privilege),
        )
        .route("/api/1/privileges/{id}/users", get(get_privilege_users).post(assign_privilege_users))
        .route("/api/1/privileges/{id}/users/{user_id}", delete(remove_privilege_user))
        .route("/api/1/privileges/{id}/roles", get(get_privilege_roles))
        .route(
            "/api/1/privileges/{id}/roles/{role_id}",
            put(add_privilege_role).delete(remove_privilege_role),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_bearer));

    Router::new()
        .route("/auth/oauth2/v2/token", post(issue_token))
        .route("/auth/oauth2/revoke", post(revoke_token))
        .merge(api)
        .with_state(state)
}

pub async fn run(listener: TcpListener, config: MockConfig) -> Result<(), std::io::Error> {
    axum::serve(listener, app(config)).await
}

type ApiResult<T> = Result<T, (StatusCode, Json<Value>)>;

fn api_error(status: StatusCode, message: &str) -> (StatusCode, Json<Value>) {
    (
        status,
        Json(json!({ "statusCode": status.as_u16(), "name": status.canonical_reason(), "message": message })),
    )
}

fn not_found() -> (StatusCode, Json<Value>) {
    api_error(StatusCode::NOT_FOUND, "Not Found")
}

// ---------------------------------------------------------------------------
// OAuth2
// ---------------------------------------------------------------------------

fn has_client_credentials(headers: &HeaderMap, config: &MockConfig) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == config.basic_authorization())
}

async fn issue_token(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(grant): Json<TokenGrant>,
) -> ApiResult<Json<Value>> {
    if !has_client_credentials(&headers, &state.config) {
        return Err(api_error(StatusCode::UNAUTHORIZED, "Authentication Failure"));
    }
    if grant.grant_type != "client_credentials" {
        return Err(api_error(StatusCode::BAD_REQUEST, "unsupported grant_type"));
    }

    let token = Uuid::new_v4().simple().to_string();
    state.db.write().await.tokens.insert(token.clone());
    info!("issued access token");
    Ok(Json(json!({
        "access_token": token,
        "refresh_token": "",
        "token_type": "bearer",
        "account_id": ACCOUNT_ID,
        "expires_in": TOKEN_LIFETIME,
    })))
}

async fn revoke_token(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<RevokeRequest>,
) -> ApiResult<StatusCode> {
    if !has_client_credentials(&headers, &state.config) {
        return Err(api_error(StatusCode::UNAUTHORIZED, "Authentication Failure"));
    }
    let removed = state.db.write().await.tokens.remove(&input.access_token);
    info!(removed, "revoke requested");
    Ok(StatusCode::OK)
}

async fn require_bearer(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));
    let known = match token {
        Some(token) => state.db.read().await.tokens.contains(token),
        None => false,
    };
    if !known {
        debug!(path = %request.uri().path(), "rejected request without a valid bearer token");
        return api_error(StatusCode::UNAUTHORIZED, "Unauthorized").into_response();
    }

    let used = state.requests.fetch_add(1, Ordering::Relaxed) + 1;
    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers.insert("x-ratelimit-limit", RATE_LIMIT.into());
    headers.insert("x-ratelimit-remaining", RATE_LIMIT.saturating_sub(used).into());
    headers.insert("x-ratelimit-reset", RATE_LIMIT_RESET.into());
    response
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

fn user_matches(user: &Map<String, Value>, params: &HashMap<String, String>) -> bool {
    let text_filters = ["email", "username", "firstname", "lastname"];
    let text_ok = text_filters.iter().all(|key| match params.get(*key) {
        Some(wanted) => user.get(*key).and_then(Value::as_str) == Some(wanted.as_str()),
        None => true,
    });
    let ids_ok = match params.get("user_ids") {
        Some(ids) => {
            let id = user.get("id").and_then(Value::as_i64).unwrap_or_default();
            ids.split(',').any(|item| item.trim().parse::<i64>().is_ok_and(|n| n == id))
        }
        None => true,
    };
    text_ok && ids_ok
}

fn positive(params: &HashMap<String, String>, key: &str) -> Option<usize> {
    params.get(key).and_then(|v| v.parse().ok()).filter(|n| *n > 0)
}

async fn list_users(State(state): State<AppState>, Query(params): Query<HashMap<String, String>>) -> Response {
    let db = state.db.read().await;
    let matching: Vec<&Map<String, Value>> = db.users.values().filter(|u| user_matches(u, &params)).collect();

    let limit = positive(&params, "limit").unwrap_or(DEFAULT_PAGE_SIZE);
    // The cursor is the page number it points at.
    let page = positive(&params, "cursor")
        .or_else(|| positive(&params, "page"))
        .unwrap_or(1);
    let total = matching.len();
    let total_pages = total.div_ceil(limit).max(1);
    let items: Vec<Value> = matching
        .into_iter()
        .skip((page - 1).saturating_mul(limit))
        .take(limit)
        .map(|u| Value::Object(u.clone()))
        .collect();

    let mut headers = HeaderMap::new();
    headers.insert("current-page", page.into());
    headers.insert("page-items", items.len().into());
    headers.insert("total-count", total.into());
    headers.insert("total-pages", total_pages.into());
    if page > 1 {
        headers.insert("before-cursor", (page - 1).into());
    }
    if page < total_pages {
        headers.insert("after-cursor", (page + 1).into());
    }
    (headers, Json(items)).into_response()
}

async fn create_user(
    State(state): State<AppState>,
    Json(mut input): Json<Map<String, Value>>,
) -> ApiResult<(StatusCode, Json<Map<String, Value>>)> {
    let has_login = ["email", "username"]
        .iter()
        .any(|key| input.get(*key).and_then(Value::as_str).is_some_and(|v| !v.is_empty()));
    if !has_login {
        return Err(api_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            "email or username is required",
        ));
    }

    let mut db = state.db.write().await;
    let id = db.next_user_id;
    db.next_user_id += 1;
    input.insert("id".to_string(), id.into());
    input.entry("state").or_insert(1.into());
    input.entry("status").or_insert(1.into());
    db.users.insert(id, input.clone());
    info!(id, "created user");
    Ok((StatusCode::CREATED, Json(input)))
}

async fn get_user(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<Map<String, Value>>> {
    let db = state.db.read().await;
    db.users.get(&id).cloned().map(Json).ok_or_else(not_found)
}

async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<Map<String, Value>>,
) -> ApiResult<Json<Map<String, Value>>> {
    let mut db = state.db.write().await;
    let user = db.users.get_mut(&id).ok_or_else(not_found)?;
    for (key, value) in input {
        if key != "id" {
            user.insert(key, value);
        }
    }
    Ok(Json(user.clone()))
}

async fn delete_user(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<StatusCode> {
    let mut db = state.db.write().await;
    db.users.remove(&id).map(|_| StatusCode::NO_CONTENT).ok_or_else(not_found)
}

async fn get_user_apps(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<Vec<Value>>> {
    let db = state.db.read().await;
    if !db.users.contains_key(&id) {
        return Err(not_found());
    }
    Ok(Json(Vec::new()))
}

async fn get_user_roles(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<Vec<i64>>> {
    let db = state.db.read().await;
    let user = db.users.get(&id).ok_or_else(not_found)?;
    let roles = user
        .get("role_ids")
        .and_then(Value::as_array)
        .map(|ids| ids.iter().filter_map(Value::as_i64).collect())
        .unwrap_or_default();
    Ok(Json(roles))
}

// ---------------------------------------------------------------------------
// Groups
// ---------------------------------------------------------------------------

async fn list_groups(State(state): State<AppState>, Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let db = state.db.read().await;
    let limit = positive(&params, "limit").unwrap_or(DEFAULT_PAGE_SIZE);
    // The legacy cursor is the offset of the first group on the page.
    let offset: usize = params.get("after_cursor").and_then(|v| v.parse().ok()).unwrap_or(0);
    let page: Vec<&Group> = db.groups.iter().skip(offset).take(limit).collect();
    let next = offset + page.len();
    let after_cursor = (next < db.groups.len()).then(|| next.to_string());
    let before_cursor = (offset > 0).then(|| offset.saturating_sub(limit).to_string());
    Json(json!({
        "status": { "error": false, "code": 200, "type": "success", "message": "Success" },
        "data": page,
        "before_cursor": before_cursor,
        "after_cursor": after_cursor,
    }))
}

async fn get_group(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<Group>> {
    let db = state.db.read().await;
    db.groups
        .iter()
        .find(|g| g.id == id)
        .cloned()
        .map(Json)
        .ok_or_else(not_found)
}

// ---------------------------------------------------------------------------
// Privileges
// ---------------------------------------------------------------------------

async fn list_privileges(State(state): State<AppState>) -> Json<Vec<Privilege>> {
    let db = state.db.read().await;
    let mut privileges: Vec<Privilege> = db.privileges.values().filter_map(|e| e.record.clone()).collect();
    privileges.sort_by(|a, b| a.name.cmp(&b.name));
    Json(privileges)
}

async fn create_privilege(
    State(state): State<AppState>,
    Json(input): Json<CreatePrivilege>,
) -> (StatusCode, Json<Privilege>) {
    let privilege = Privilege {
        id: Uuid::new_v4().to_string(),
        name: input.name,
        description: input.description,
        privilege: input.privilege,
    };
    let entry = PrivilegeEntry {
        record: Some(privilege.clone()),
        ..Default::default()
    };
    state.db.write().await.privileges.insert(privilege.id.clone(), entry);
    (StatusCode::CREATED, Json(privilege))
}

async fn get_privilege(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Privilege>> {
    let db = state.db.read().await;
    db.privileges
        .get(&id)
        .and_then(|e| e.record.clone())
        .map(Json)
        .ok_or_else(not_found)
}

async fn update_privilege(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdatePrivilege>,
) -> ApiResult<Json<Privilege>> {
    let mut db = state.db.write().await;
    let record = db
        .privileges
        .get_mut(&id)
        .and_then(|e| e.record.as_mut())
        .ok_or_else(not_found)?;
    if let Some(name) = input.name {
        record.name = name;
    }
    if let Some(description) = input.description {
        record.description = Some(description);
    }
    if let Some(privilege) = input.privilege {
        record.privilege = privilege;
    }
    Ok(Json(record.clone()))
}

async fn delete_privilege(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<StatusCode> {
    let mut db = state.db.write().await;
    db.privileges
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(not_found)
}

async fn get_privilege_users(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Value>> {
    let db = state.db.read().await;
    let entry = db.privileges.get(&id).ok_or_else(not_found)?;
    Ok(Json(json!({ "users": entry.users })))
}

async fn assign_privilege_users(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UserIds>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let mut db = state.db.write().await;
    let entry = db.privileges.get_mut(&id).ok_or_else(not_found)?;
    entry.users.extend(input.users);
    Ok((StatusCode::CREATED, Json(json!({ "users": entry.users }))))
}

async fn remove_privilege_user(
    State(state): State<AppState>,
    Path((id, user_id)): Path<(String, i64)>,
) -> ApiResult<StatusCode> {
    let mut db = state.db.write().await;
    let entry = db.privileges.get_mut(&id).ok_or_else(not_found)?;
    if entry.users.remove(&user_id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found())
    }
}

async fn get_privilege_roles(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Value>> {
    let db = state.db.read().await;
    let entry = db.privileges.get(&id).ok_or_else(not_found)?;
    Ok(Json(json!({ "roles": entry.roles })))
}

async fn add_privilege_role(
    State(state): State<AppState>,
    Path((id, role_id)): Path<(String, i64)>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let mut db = state.db.write().await;
    let entry = db.privileges.get_mut(&id).ok_or_else(not_found)?;
    entry.roles.insert(role_id);
    Ok((StatusCode::CREATED, Json(json!({ "roles": entry.roles }))))
}

async fn remove_privilege_role(
    State(state): State<AppState>,
    Path((id, role_id)): Path<(String, i64)>,
) -> ApiResult<StatusCode> {
    let mut db = state.db.write().await;
    let entry = db.privileges.get_mut(&id).ok_or_else(not_found)?;
    if entry.roles.remove(&role_id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found())
    }
}
