//! Verify the request pipeline and response normalizer against JSON test
//! vectors stored in `test-vectors/`.
//!
//! Each response case describes a raw HTTP response and the envelope (or
//! error kind) it must produce. Each request case names a client call and the
//! request it must send. Comparing parsed JSON (not raw strings) avoids false
//! negatives from field-ordering differences.

use std::cell::RefCell;

use onelogin_core::models::{AppRule, GroupQuery, Scope, User, UserQuery};
use onelogin_core::{
    check_http_response, ApiError, HttpMethod, HttpRequest, HttpResponse, OneLoginClient, Queryable, StaticToken,
    Transport,
};
use serde_json::Value;

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn pairs(value: &Value) -> Vec<(String, String)> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|h| {
            let arr = h.as_array().unwrap();
            (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

#[test]
fn response_test_vectors() {
    let raw = include_str!("../../test-vectors/responses.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let response = HttpResponse {
            status: case["status"].as_u64().unwrap() as u16,
            headers: pairs(&case["headers"]),
            body: case["body"].as_str().unwrap().as_bytes().to_vec(),
        };
        let expected = &case["expected"];

        let result = check_http_response(response);
        if !expected["ok"].as_bool().unwrap() {
            match (expected["error"].as_str().unwrap(), result) {
                ("status", Err(ApiError::Status { status, body })) => {
                    assert_eq!(u64::from(status), expected["status"].as_u64().unwrap(), "{name}: status");
                    assert_eq!(body, case["body"].as_str().unwrap(), "{name}: body kept");
                }
                ("serialization", Err(ApiError::Serialization(_))) => {}
                (kind, other) => panic!("{name}: expected {kind} error, got {other:?}"),
            }
            continue;
        }

        let envelope = result.unwrap_or_else(|e| panic!("{name}: {e}"));
        assert_eq!(envelope.data.to_value(), expected["data"], "{name}: data");
        assert_eq!(
            serde_json::to_value(&envelope.metadata).unwrap(),
            expected["metadata"],
            "{name}: metadata"
        );
        assert_eq!(
            envelope.error.as_ref().map(|e| e.header),
            expected["metadata_error"].as_str(),
            "{name}: metadata error"
        );
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Captures requests and answers every one with an empty object.
#[derive(Default)]
struct Recorder {
    requests: RefCell<Vec<HttpRequest>>,
}

impl Transport for Recorder {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        self.requests.borrow_mut().push(request);
        Ok(HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: b"{}".to_vec(),
        })
    }
}

fn dispatch(client: &OneLoginClient<&Recorder, StaticToken>, call: &str, args: &Value) {
    let int = |key: &str| args[key].as_i64().unwrap();
    let text = |key: &str| args[key].as_str().unwrap().to_string();
    let result = match call {
        "list_users" => {
            let query = args.get("query").map(|q| {
                let mut query = UserQuery {
                    email: q["email"].as_str().map(str::to_string),
                    ..Default::default()
                };
                if let Some(limit) = q["limit"].as_str() {
                    query.set_limit(limit.to_string());
                }
                query
            });
            client.list_users(query.as_ref())
        }
        "create_user" => {
            let user: User = serde_json::from_value(args["user"].clone()).unwrap();
            client.create_user(&user)
        }
        "update_user" => {
            let user: User = serde_json::from_value(args["user"].clone()).unwrap();
            client.update_user(int("id"), &user)
        }
        "delete_user" => client.delete_user(int("id")),
        "list_groups" => {
            let mut query = GroupQuery::default();
            query.set_cursor(text("cursor"));
            client.list_groups(Some(&query))
        }
        "assign_users_to_privilege" => {
            let users: Vec<i64> = serde_json::from_value(args["users"].clone()).unwrap();
            client.assign_users_to_privilege(&text("id"), &users)
        }
        "remove_privilege_from_user" => client.remove_privilege_from_user(&text("id"), int("user_id")),
        "add_privilege_to_role" => client.add_privilege_to_role(&text("id"), int("role_id")),
        "create_scope" => {
            let scope: Scope = serde_json::from_value(args["scope"].clone()).unwrap();
            client.create_scope(int("server_id") as i32, &scope)
        }
        "list_access_token_claims" => client.list_access_token_claims(int("server_id") as i32),
        "update_app_rule" => {
            let rule: AppRule = serde_json::from_value(args["rule"].clone()).unwrap();
            client.update_app_rule(int("app_id"), int("rule_id"), &rule)
        }
        other => panic!("unknown call: {other}"),
    };
    result.unwrap_or_else(|e| panic!("{call}: {e}"));
}

#[test]
fn request_test_vectors() {
    let raw = include_str!("../../test-vectors/requests.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();
    let base_url = vectors["base_url"].as_str().unwrap();
    let token = vectors["token"].as_str().unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let recorder = Recorder::default();
        let client = OneLoginClient::with_parts(base_url, &recorder, StaticToken(token.to_string()));

        dispatch(&client, case["call"].as_str().unwrap(), &case["args"]);

        let requests = recorder.requests.borrow();
        assert_eq!(requests.len(), 1, "{name}: one request");
        let req = &requests[0];
        let expected = &case["expected_request"];

        assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.url, format!("{base_url}{}", expected["path"].as_str().unwrap()), "{name}: url");
        assert_eq!(req.header("authorization"), Some(format!("Bearer {token}").as_str()), "{name}: bearer");
        assert_eq!(req.header("content-type"), Some("application/json"), "{name}: content type");

        let body = req
            .body
            .as_deref()
            .map(|b| serde_json::from_str::<Value>(b).unwrap())
            .unwrap_or(Value::Null);
        assert_eq!(body, expected["body"], "{name}: body");
    }
}
