use serde_json::json;

use crate::support::{customer, ok, service, status};

#[test]
fn add_is_idempotent_and_list_hydrates() {
    let service = service();
    let first = ok(service.dispatch("wishlist.add", json!({ "productId": "prod_demo_scale" }), customer("a")));
    let again = ok(service.dispatch("wishlist.add", json!({ "productId": "prod_demo_scale" }), customer("a")));
    assert_eq!(first["added"], true);
    assert_eq!(again["added"], false);

    let listing = ok(service.dispatch("wishlist.list", json!({}), customer("a")));
    assert_eq!(listing["productIds"], json!(["prod_demo_scale"]));
    assert_eq!(listing["items"][0]["name"], "Portion Scale");
}

#[test]
fn missing_products_are_listed_but_not_hydrated() {
    let service = service();
    ok(service.dispatch("wishlist.add", json!({ "productId": "prod_gone" }), customer("a")));
    ok(service.dispatch("wishlist.add", json!({ "productId": "prod_demo_guide" }), customer("a")));

    let listing = ok(service.dispatch("wishlist.list", json!({}), customer("a")));
    assert_eq!(listing["productIds"].as_array().unwrap().len(), 2);
    assert_eq!(listing["items"].as_array().unwrap().len(), 1);
}

#[test]
fn wishlists_are_per_user() {
    let service = service();
    ok(service.dispatch("wishlist.add", json!({ "productId": "prod_demo_guide" }), customer("a")));

    let other = ok(service.dispatch("wishlist.list", json!({}), customer("b")));
    assert_eq!(other["productIds"], json!([]));
}

#[test]
fn remove_absent_item_is_not_found() {
    let service = service();
    ok(service.dispatch("wishlist.add", json!({ "productId": "prod_demo_guide" }), customer("a")));

    ok(service.dispatch("wishlist.remove", json!({ "productId": "prod_demo_guide" }), customer("a")));
    assert_eq!(
        status(service.dispatch("wishlist.remove", json!({ "productId": "prod_demo_guide" }), customer("a"))),
        404
    );
    assert_eq!(status(service.dispatch("wishlist.add", json!({}), customer("a"))), 400);
}
