use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use rawfeed::gelato::{self, GelatoClient, SIGNATURE_HEADER};

use crate::support::{serve, shipping_address, start_server, state};

const WEBHOOK_SECRET: &str = "whsec_test";

#[derive(Clone, Default)]
struct FakeGelato {
    reject_orders: Arc<AtomicBool>,
    orders: Arc<Mutex<Vec<Value>>>,
}

async fn store_products() -> Json<Value> {
    Json(json!({
        "products": [
            {
                "id": "g-tee", "title": "Raw Fed Tee", "tags": ["apparel"],
                "previewUrl": "https://cdn.example/tee.png",
                "variants": [
                    { "id": "g-tee-m", "title": "M", "productUid": "apparel_tee_m", "price": 24.0 },
                    { "id": "g-tee-l", "title": "L", "productUid": "apparel_tee_l", "price": 26.0 }
                ]
            },
            {
                "id": "g-mug", "title": "Bone Broth Mug",
                "variants": [{ "id": "g-mug-1", "title": "11oz", "productUid": "mug_11", "price": 14.5 }]
            }
        ]
    }))
}

async fn create_order(State(fake): State<FakeGelato>, Json(body): Json<Value>) -> Response {
    if fake.reject_orders.load(Ordering::SeqCst) {
        return (StatusCode::UNPROCESSABLE_ENTITY, "bad address").into_response();
    }
    fake.orders.lock().unwrap().push(body);
    Json(json!({ "id": "gel-order-1" })).into_response()
}

async fn fake_gelato() -> (GelatoClient, FakeGelato) {
    let fake = FakeGelato::default();
    let app = Router::new()
        .route("/stores/:store_id/products", get(store_products))
        .route("/orders", post(create_order))
        .with_state(fake.clone());
    let url = serve(app).await;
    let client = GelatoClient::with_urls("gelato-key", "store-1", &url, &url).unwrap();
    (client, fake)
}

async fn sync_as_admin(http: &reqwest::Client, base: &str) -> Value {
    let resp = http
        .post(format!("{base}/api/admin/gelato/sync"))
        .header("x-user-id", "boss")
        .header("x-user-role", "admin")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    resp.json().await.unwrap()
}

/// Order one medium tee, returning the order id.
async fn order_tee(http: &reqwest::Client, base: &str, report: &Value) -> String {
    let tee = report["products"]
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["name"] == "Raw Fed Tee")
        .unwrap();
    let created: Value = http
        .post(format!("{base}/api/orders"))
        .header("x-user-id", "u1")
        .json(&json!({
            "items": [{ "productId": tee["id"], "variantId": tee["variants"][0]["id"], "quantity": 2 }],
            "shippingAddress": shipping_address(),
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    created["order"]["id"].as_str().unwrap().to_string()
}

async fn submit(http: &reqwest::Client, base: &str, order_id: &str) -> reqwest::Response {
    http.post(format!("{base}/api/gelato/orders"))
        .header("x-user-id", "u1")
        .json(&json!({ "orderId": order_id }))
        .send()
        .await
        .unwrap()
}

async fn first_order(http: &reqwest::Client, base: &str) -> Value {
    let listing: Value = http
        .get(format!("{base}/api/orders"))
        .header("x-user-id", "u1")
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    listing["orders"][0].clone()
}

#[tokio::test]
async fn admin_sync_pulls_the_store_catalog() {
    let (client, _fake) = fake_gelato().await;
    let base = start_server(state().with_gelato(client)).await;
    let http = reqwest::Client::new();

    let report = sync_as_admin(&http, &base).await;
    assert_eq!(report["synced"], 2);
    assert_eq!(report["products"][0]["priceCents"], 2400);
    assert_eq!(report["products"][0]["images"][0], "https://cdn.example/tee.png");

    sync_as_admin(&http, &base).await;
    let products: Value = reqwest::get(format!("{base}/api/products"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(products["products"].as_array().unwrap().len(), 5);

    let resp = http
        .post(format!("{base}/api/admin/gelato/sync"))
        .header("x-user-id", "u1")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 403);
}

#[tokio::test]
async fn sync_without_gelato_is_unavailable() {
    let base = start_server(state()).await;
    let resp = reqwest::Client::new()
        .post(format!("{base}/api/admin/gelato/sync"))
        .header("x-user-id", "boss")
        .header("x-user-role", "admin")
        .json(&json!({ "mode": "create" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 503);
}

#[tokio::test]
async fn submitted_order_carries_gelato_ids() {
    let (client, fake) = fake_gelato().await;
    let base = start_server(state().with_gelato(client)).await;
    let http = reqwest::Client::new();

    let report = sync_as_admin(&http, &base).await;
    let order_id = order_tee(&http, &base, &report).await;

    let resp = submit(&http, &base, &order_id).await;
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["order"]["status"], "submitted");
    assert_eq!(body["order"]["gelatoOrderId"], "gel-order-1");

    {
        let sent = fake.orders.lock().unwrap();
        assert_eq!(sent[0]["orderReferenceId"], order_id.as_str());
        assert_eq!(sent[0]["customerReferenceId"], "u1");
        assert_eq!(sent[0]["items"][0]["productUid"], "apparel_tee_m");
        assert_eq!(sent[0]["items"][0]["quantity"], 2);
        assert_eq!(sent[0]["shippingAddress"]["country"], "GB");
    }

    let resp = submit(&http, &base, &order_id).await;
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn rejected_submission_marks_order_failed() {
    let (client, fake) = fake_gelato().await;
    let base = start_server(state().with_gelato(client)).await;
    let http = reqwest::Client::new();

    let report = sync_as_admin(&http, &base).await;
    let order_id = order_tee(&http, &base, &report).await;

    fake.reject_orders.store(true, Ordering::SeqCst);
    let resp = submit(&http, &base, &order_id).await;
    assert_eq!(resp.status(), 502);
    assert_eq!(first_order(&http, &base).await["status"], "failed");

    fake.reject_orders.store(false, Ordering::SeqCst);
    let resp = submit(&http, &base, &order_id).await;
    assert_eq!(resp.status(), 200);
    assert_eq!(first_order(&http, &base).await["status"], "submitted");
}

#[tokio::test]
async fn local_products_cannot_be_submitted() {
    let (client, fake) = fake_gelato().await;
    let base = start_server(state().with_gelato(client)).await;
    let http = reqwest::Client::new();

    let created: Value = http
        .post(format!("{base}/api/orders"))
        .header("x-user-id", "u1")
        .json(&json!({
            "items": [{ "productId": "prod_demo_guide", "quantity": 1 }],
            "shippingAddress": shipping_address(),
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let order_id = created["order"]["id"].as_str().unwrap();

    let resp = submit(&http, &base, order_id).await;
    assert_eq!(resp.status(), 400);
    assert!(fake.orders.lock().unwrap().is_empty());

    let resp = submit(&http, &base, "order_missing").await;
    assert_eq!(resp.status(), 404);
}

async fn post_webhook(http: &reqwest::Client, base: &str, body: &Value, signature: Option<&str>) -> reqwest::Response {
    let mut request = http
        .post(format!("{base}/api/gelato/webhooks"))
        .header("content-type", "application/json")
        .body(serde_json::to_vec(body).unwrap());
    if let Some(signature) = signature {
        request = request.header(SIGNATURE_HEADER, signature);
    }
    request.send().await.unwrap()
}

#[tokio::test]
async fn signed_webhook_updates_order() {
    let (client, _fake) = fake_gelato().await;
    let app_state = state().with_gelato(client).with_webhook_secret(WEBHOOK_SECRET);
    let base = start_server(app_state).await;
    let http = reqwest::Client::new();

    let report = sync_as_admin(&http, &base).await;
    let order_id = order_tee(&http, &base, &report).await;
    assert_eq!(submit(&http, &base, &order_id).await.status(), 200);

    let event = json!({
        "event": "order_status_updated",
        "orderId": "gel-order-1",
        "orderReferenceId": order_id,
        "customerReferenceId": "u1",
        "fulfillmentStatus": "in_transit",
        "trackingUrl": "https://track.example/abc"
    });

    let resp = post_webhook(&http, &base, &event, None).await;
    assert_eq!(resp.status(), 401);
    let forged = gelato::sign("wrong-secret", &serde_json::to_vec(&event).unwrap()).unwrap();
    let resp = post_webhook(&http, &base, &event, Some(&forged)).await;
    assert_eq!(resp.status(), 401);
    assert_eq!(first_order(&http, &base).await["status"], "submitted");

    let signature = gelato::sign(WEBHOOK_SECRET, &serde_json::to_vec(&event).unwrap()).unwrap();
    let resp = post_webhook(&http, &base, &event, Some(&signature)).await;
    assert_eq!(resp.status(), 200);

    let order = first_order(&http, &base).await;
    assert_eq!(order["status"], "shipped");
    assert_eq!(order["trackingUrl"], "https://track.example/abc");
}

#[tokio::test]
async fn webhook_without_secret_is_unavailable() {
    let base = start_server(state()).await;
    let event = json!({ "event": "order_status_updated" });
    let signature = gelato::sign(WEBHOOK_SECRET, &serde_json::to_vec(&event).unwrap()).unwrap();
    let resp = post_webhook(&reqwest::Client::new(), &base, &event, Some(&signature)).await;
    assert_eq!(resp.status(), 503);
}
