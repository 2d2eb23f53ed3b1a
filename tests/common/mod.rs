#![allow(dead_code)]

use httpmock::prelude::HttpMockRequest;
use httpmock::MockServer;
use rmcp::model::JsonObject;
use serde_json::{json, Value};
use std::time::Duration;
use tldv_mcp::api::{ApiConfig, RetryPolicy, TldvClient};

pub const API_KEY: &str = "test-api-key";

/// Retries with delays short enough for tests that only care about counts
pub fn fast_retry() -> RetryPolicy {
    RetryPolicy {
        max_retries: 3,
        base_delay: Duration::from_millis(5),
        max_delay: Duration::from_millis(10),
    }
}

pub fn client_with_policy(server: &MockServer, retry: RetryPolicy) -> TldvClient {
    let mut config = ApiConfig::new(API_KEY);
    config.base_url = server.base_url();
    config.retry = retry;
    TldvClient::new(config).unwrap()
}

pub fn test_client(server: &MockServer) -> TldvClient {
    client_with_policy(server, fast_retry())
}

pub fn meeting_json(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "happenedAt": "2024-01-31T09:00:00Z",
        "url": format!("https://tldv.io/app/meetings/{}", id),
        "organizer": {"name": "Ana Silva", "email": "ana@example.com"},
        "invitees": [
            {"name": "Bo Chen", "email": "bo@example.com"}
        ],
        "template": {"id": "tpl-1", "label": "Daily standup"}
    })
}

pub fn meeting_list_json() -> Value {
    json!({
        "page": 1,
        "pages": 1,
        "total": 1,
        "pageSize": 5,
        "results": [meeting_json("m1", "Standup")]
    })
}

pub fn transcript_json() -> Value {
    json!([
        {"speaker": "Ana Silva", "text": "Morning all.", "startTime": 0, "endTime": 2},
        {"speaker": "Bo Chen", "text": "Morning!", "startTime": 2, "endTime": 3}
    ])
}

pub fn highlights_json() -> Value {
    json!([
        {
            "text": "Ship the beta on Friday",
            "startTime": 120,
            "source": "manual",
            "topic": {"title": "Release", "summary": "Beta date agreed"}
        }
    ])
}

pub fn args(value: Value) -> JsonObject {
    value.as_object().cloned().unwrap()
}

fn query_keys(req: &HttpMockRequest) -> Vec<String> {
    let mut keys: Vec<String> = req
        .query_params
        .iter()
        .flatten()
        .map(|(key, _)| key.clone())
        .collect();
    keys.sort();
    keys
}

/// Query carries `limit` and nothing else
pub fn only_limit(req: &HttpMockRequest) -> bool {
    query_keys(req) == ["limit"]
}

pub fn only_limit_and_page(req: &HttpMockRequest) -> bool {
    query_keys(req) == ["limit", "page"]
}

pub fn only_limit_and_meeting_type(req: &HttpMockRequest) -> bool {
    query_keys(req) == ["limit", "meetingType"]
}
