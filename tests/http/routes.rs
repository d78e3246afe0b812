use serde_json::{json, Value};

use crate::support::{pet, start_server, state};

#[tokio::test]
async fn health_lists_commands() {
    let base = start_server(state()).await;
    let resp = reqwest::get(format!("{base}/health")).await.unwrap();
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["ok"], true);
    assert_eq!(body["primary"], "connected");
    let commands = body["commands"].as_array().unwrap();
    assert!(commands.iter().any(|c| c == "pets.create"));
    assert!(commands.iter().any(|c| c == "catalog.sync"));
}

#[tokio::test]
async fn pet_lifecycle_over_http() {
    let base = start_server(state()).await;
    let client = reqwest::Client::new();
    let url = format!("{base}/api/pets");

    let created: Value = client
        .post(&url)
        .header("x-user-id", "u1")
        .json(&pet("Rex"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let id = created["pet"]["id"].as_str().unwrap().to_string();
    assert_eq!(created["pet"]["userId"], "u1");

    let resp = client
        .put(&url)
        .header("x-user-id", "u1")
        .json(&json!({ "id": id, "active": false, "weight": 26.0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let active: Value = client
        .get(format!("{url}?active=true"))
        .header("x-user-id", "u1")
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(active["pets"].as_array().unwrap().len(), 0);

    let all: Value = client
        .get(&url)
        .header("x-user-id", "u1")
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(all["pets"][0]["weight"], 26.0);

    let resp = client
        .delete(format!("{url}?id={id}"))
        .header("x-user-id", "u1")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = client
        .delete(format!("{url}?id={id}"))
        .header("x-user-id", "u1")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn malformed_requests_are_rejected() {
    let base = start_server(state()).await;
    let client = reqwest::Client::new();
    let url = format!("{base}/api/pets");

    let resp = client
        .post(&url)
        .header("x-user-id", "u1")
        .header("content-type", "application/json")
        .body("{ not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].is_string());

    let resp = client.post(&url).header("x-user-id", "u1").send().await.unwrap();
    assert_eq!(resp.status(), 400);

    let resp = client.get(&url).send().await.unwrap();
    assert_eq!(resp.status(), 401);
}

#[tokio::test]
async fn admin_routes_check_role() {
    let base = start_server(state()).await;
    let client = reqwest::Client::new();
    let url = format!("{base}/api/admin/posts");

    let resp = client
        .get(&url)
        .header("x-user-id", "u1")
        .header("x-user-role", "customer")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);

    let resp = client
        .get(format!("{url}?limit=2"))
        .header("x-user-id", "boss")
        .header("x-user-role", "admin")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["pagination"]["limit"], 2);
}

#[tokio::test]
async fn catalog_is_public() {
    let base = start_server(state()).await;
    let body: Value = reqwest::get(format!("{base}/api/products"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["products"].as_array().unwrap().len(), 3);
}
