use std::sync::Arc;
use std::thread;

use serde_json::{json, Value};

use crate::support::{admin, customer, ok, service, status};

fn remote_catalog() -> Value {
    json!([
        {
            "id": "g-tee", "title": "Raw Fed Tee", "tags": ["apparel"],
            "variants": [
                { "id": "g-tee-m", "title": "M", "productUid": "apparel_tee_m", "price": 24.0 },
                { "id": "g-tee-l", "title": "L", "productUid": "apparel_tee_l", "price": 26.0 }
            ]
        },
        {
            "id": "g-mug", "title": "Bone Broth Mug",
            "variants": [{ "id": "g-mug-1", "title": "11oz", "productUid": "mug_11", "price": 14.5 }]
        }
    ])
}

fn product_count(service: &rawfeed::Service<rawfeed::Collections>) -> usize {
    let listing = ok(service.dispatch("products.list", json!({}), Default::default()));
    listing["products"].as_array().unwrap().len()
}

#[test]
fn update_sync_twice_is_idempotent() {
    let service = service();
    let input = json!({ "mode": "update", "remote": remote_catalog() });

    let first = ok(service.dispatch("catalog.sync", input.clone(), admin()));
    assert_eq!(first["synced"], 2);
    let after_first = product_count(&service);
    assert_eq!(after_first, 5);

    let second = ok(service.dispatch("catalog.sync", input, admin()));
    assert_eq!(second["synced"], 2);
    assert_eq!(second["failed"], 0);
    assert_eq!(product_count(&service), after_first);
}

#[test]
fn one_bad_entry_does_not_block_the_rest() {
    let service = service();
    let mut remote = remote_catalog();
    remote[0]["variants"][1]["price"] = Value::Null;

    let report = ok(service.dispatch("catalog.sync", json!({ "remote": remote }), admin()));
    assert_eq!(report["synced"], 1);
    assert_eq!(report["failed"], 1);
    assert_eq!(report["failures"][0]["remoteId"], "g-tee");
    assert_eq!(product_count(&service), 4);
}

#[test]
fn create_mode_leaves_existing_products() {
    let service = service();
    ok(service.dispatch("catalog.sync", json!({ "mode": "create", "remote": remote_catalog() }), admin()));

    let mut renamed = remote_catalog();
    renamed[1]["title"] = json!("Renamed Mug");
    let report = ok(service.dispatch("catalog.sync", json!({ "mode": "create", "remote": renamed }), admin()));
    assert_eq!(report["skipped"], 2);

    let mugs = ok(service.dispatch("products.list", json!({ "search": "mug" }), Default::default()));
    assert_eq!(mugs["products"][0]["name"], "Bone Broth Mug");
}

#[test]
fn sync_requires_admin() {
    let service = service();
    assert_eq!(
        status(service.dispatch("catalog.sync", json!({ "remote": [] }), customer("a"))),
        403
    );
}

fn place_order(service: &rawfeed::Service<rawfeed::Collections>, user: &str) -> String {
    let created = ok(service.dispatch(
        "orders.create",
        json!({ "items": [{ "productId": "prod_demo_guide", "quantity": 1 }] }),
        customer(user),
    ));
    created["order"]["id"].as_str().unwrap().to_string()
}

fn webhook(order_id: &str, user: &str, fulfillment: &str) -> Value {
    json!({
        "event": "order_status_updated",
        "orderId": "gelato-123",
        "orderReferenceId": order_id,
        "customerReferenceId": user,
        "fulfillmentStatus": fulfillment,
        "trackingUrl": "https://track.example/1"
    })
}

#[test]
fn fulfilment_moves_the_order() {
    let service = service();
    let order_id = place_order(&service, "a");

    let ack = ok(service.dispatch("orders.fulfilment", webhook(&order_id, "a", "shipped"), Default::default()));
    assert_eq!(ack["status"], "shipped");

    let listing = ok(service.dispatch("orders.list", json!({}), customer("a")));
    let order = &listing["orders"][0];
    assert_eq!(order["status"], "shipped");
    assert_eq!(order["trackingUrl"], "https://track.example/1");
    assert_eq!(order["gelatoOrderId"], "gelato-123");
}

#[test]
fn final_orders_and_unknown_statuses_are_acknowledged_only() {
    let service = service();
    let order_id = place_order(&service, "a");

    let ignored = ok(service.dispatch("orders.fulfilment", webhook(&order_id, "a", "digitizing"), Default::default()));
    assert_eq!(ignored["ignored"], true);

    ok(service.dispatch("orders.fulfilment", webhook(&order_id, "a", "delivered"), Default::default()));
    let late = ok(service.dispatch("orders.fulfilment", webhook(&order_id, "a", "failed"), Default::default()));
    assert_eq!(late["ignored"], true);
    assert_eq!(late["status"], "delivered");
}

#[test]
fn fulfilment_for_unknown_order_is_not_found() {
    let service = service();
    let order_id = place_order(&service, "a");
    assert_eq!(
        status(service.dispatch("orders.fulfilment", webhook(&order_id, "b", "shipped"), Default::default())),
        404
    );
}

#[test]
fn racing_webhooks_never_reopen_a_delivered_order() {
    let service = Arc::new(service());
    let order_id = place_order(&service, "a");

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let service = service.clone();
            let order_id = order_id.clone();
            let fulfillment = if i % 4 == 0 { "delivered" } else { "in_production" };
            thread::spawn(move || {
                ok(service.dispatch("orders.fulfilment", webhook(&order_id, "a", fulfillment), Default::default()))
            })
        })
        .collect();
    let acks: Vec<Value> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let listing = ok(service.dispatch("orders.list", json!({}), customer("a")));
    assert_eq!(listing["orders"][0]["status"], "delivered");
    let ignored = acks.iter().filter(|ack| ack["ignored"] == true).count();
    let applied_after = acks.iter().filter(|ack| ack["status"] == "delivered" && ack["ignored"] != true).count();
    assert!(applied_after >= 1);
    assert!(ignored >= 3);
}
