use axum::body::Body;
use axum::http::Request;
use serde_json::{json, Value};

/// Smallest pull request payload that the listener accepts.
pub fn pull_request_payload(action: &str) -> Value {
    json!({
        "action": action,
        "sender": { "login": "alice" },
        "repository": {
            "name": "r",
            "git_url": "git://x/r.git",
            "private": false
        },
        "pull_request": {
            "head": { "sha": "abc123", "ref": "feature-1" },
            "html_url": "http://x/pr/1",
            "user": { "login": "alice" }
        }
    })
}

pub fn create_webhook_request(uri: &str, body: impl Into<String>) -> Request<Body> {
    Request::post(uri)
        .header("x-github-event", "pull_request")
        .header("Content-Type", "application/json")
        .body(Body::from(body.into()))
        .unwrap()
}
