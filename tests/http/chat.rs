use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::{header, HeaderMap};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};

use rawfeed::chat::ChatClient;
use rawfeed::rate_limit::FixedWindowLimiter;

use crate::support::{pet, serve, start_server, state};

const SSE_BODY: &str = "data: {\"choices\":[{\"delta\":{\"content\":\"Feed 2-3%\"}}]}\n\ndata: [DONE]\n\n";

#[derive(Clone, Default)]
struct Seen(Arc<Mutex<Vec<(String, Value)>>>);

async fn completions(State(seen): State<Seen>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    let auth = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    seen.0.lock().unwrap().push((auth, body));
    ([(header::CONTENT_TYPE, "text/event-stream")], SSE_BODY).into_response()
}

/// A fake completions endpoint recording every request it receives.
async fn fake_model() -> (String, Seen) {
    let seen = Seen::default();
    let app = Router::new()
        .route("/chat/completions", post(completions))
        .with_state(seen.clone());
    (serve(app).await, seen)
}

fn question() -> Value {
    json!({ "messages": [{ "role": "user", "content": "How much should my dog eat?" }] })
}

#[tokio::test]
async fn unconfigured_chat_is_unavailable() {
    let base = start_server(state()).await;
    let resp = reqwest::Client::new()
        .post(format!("{base}/api/chat"))
        .json(&question())
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 503);
    assert_eq!(resp.headers()["x-ratelimit-remaining"], "9");
}

#[tokio::test]
async fn streams_upstream_events_with_pet_context() {
    let (model_url, seen) = fake_model().await;
    let client = ChatClient::new("sk-test").unwrap().with_base_url(&model_url);
    let base = start_server(state().with_chat(client)).await;
    let http = reqwest::Client::new();

    let created: Value = http
        .post(format!("{base}/api/pets"))
        .header("x-user-id", "u1")
        .json(&pet("Rex"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let pet_id = created["pet"]["id"].as_str().unwrap();

    let mut request = question();
    request["petId"] = json!(pet_id);
    let resp = http
        .post(format!("{base}/api/chat"))
        .header("x-user-id", "u1")
        .json(&request)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers()["content-type"], "text/event-stream");
    assert_eq!(resp.text().await.unwrap(), SSE_BODY);

    let seen = seen.0.lock().unwrap();
    let (auth, body) = &seen[0];
    assert_eq!(auth, "Bearer sk-test");
    assert_eq!(body["stream"], true);
    assert_eq!(body["messages"][0]["role"], "system");
    assert!(body["messages"][0]["content"].as_str().unwrap().contains("Rex"));
    assert_eq!(body["messages"][1]["content"], "How much should my dog eat?");
}

#[tokio::test]
async fn other_owners_pet_adds_no_context() {
    let (model_url, seen) = fake_model().await;
    let client = ChatClient::new("sk-test").unwrap().with_base_url(&model_url);
    let base = start_server(state().with_chat(client)).await;
    let http = reqwest::Client::new();

    let created: Value = http
        .post(format!("{base}/api/pets"))
        .header("x-user-id", "u1")
        .json(&pet("Rex"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let mut request = question();
    request["petId"] = created["pet"]["id"].clone();
    let resp = http
        .post(format!("{base}/api/chat"))
        .header("x-user-id", "u2")
        .json(&request)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    resp.text().await.unwrap();

    let seen = seen.0.lock().unwrap();
    assert!(!seen[0].1["messages"][0]["content"].as_str().unwrap().contains("Rex"));
}

#[tokio::test]
async fn limit_applies_per_caller() {
    let limiter = FixedWindowLimiter::new(2, Duration::from_secs(60));
    let base = start_server(state().with_limiter(limiter)).await;
    let http = reqwest::Client::new();
    let url = format!("{base}/api/chat");

    for expected_remaining in ["1", "0"] {
        let resp = http
            .post(&url)
            .header("x-user-id", "u1")
            .json(&question())
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 503);
        assert_eq!(resp.headers()["x-ratelimit-remaining"], expected_remaining);
    }

    let resp = http
        .post(&url)
        .header("x-user-id", "u1")
        .json(&question())
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 429);
    assert_eq!(resp.headers()["x-ratelimit-remaining"], "0");
    let retry_after: u64 = resp.headers()["retry-after"].to_str().unwrap().parse().unwrap();
    assert!((1..=60).contains(&retry_after));

    let resp = http
        .post(&url)
        .header("x-forwarded-for", "198.51.100.4")
        .json(&question())
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 503);
    assert_eq!(resp.headers()["x-ratelimit-remaining"], "1");
}

#[tokio::test]
async fn invalid_conversations_are_rejected() {
    let (model_url, seen) = fake_model().await;
    let client = ChatClient::new("sk-test").unwrap().with_base_url(&model_url);
    let base = start_server(state().with_chat(client)).await;
    let http = reqwest::Client::new();
    let url = format!("{base}/api/chat");

    let resp = http.post(&url).json(&json!({ "messages": [] })).send().await.unwrap();
    assert_eq!(resp.status(), 400);

    let blank = json!({ "messages": [{ "role": "user", "content": "   " }] });
    let resp = http.post(&url).json(&blank).send().await.unwrap();
    assert_eq!(resp.status(), 400);

    let too_many: Vec<Value> = (0..51)
        .map(|i| json!({ "role": "user", "content": format!("question {i}") }))
        .collect();
    let resp = http
        .post(&url)
        .json(&json!({ "messages": too_many }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    assert!(seen.0.lock().unwrap().is_empty());
}
