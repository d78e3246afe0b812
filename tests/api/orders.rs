use serde_json::{json, Value};

use crate::support::{admin, customer, ok, service, status};

fn address() -> Value {
    json!({
        "firstName": "Sam",
        "lastName": "Rivera",
        "addressLine1": "1 Kennel Rd",
        "city": "Portland",
        "postCode": "97201",
        "country": "US",
        "email": "sam@example.com"
    })
}

#[test]
fn products_list_shows_the_demo_catalog() {
    let service = service();
    let listing = ok(service.dispatch("products.list", json!({}), Default::default()));
    assert_eq!(listing["products"].as_array().unwrap().len(), 3);

    let prep = ok(service.dispatch("products.list", json!({ "category": "PREP" }), Default::default()));
    assert_eq!(prep["products"][0]["id"], "prod_demo_scale");

    let guide = ok(service.dispatch("products.list", json!({ "search": "guide" }), Default::default()));
    assert_eq!(guide["products"].as_array().unwrap().len(), 1);
}

#[test]
fn checkout_prices_from_the_catalog() {
    let service = service();
    let created = ok(service.dispatch(
        "orders.create",
        json!({
            "items": [
                { "productId": "prod_demo_bowl", "variantId": "prod_demo_bowl_l", "quantity": 2, "unitPriceCents": 1 },
                { "productId": "prod_demo_scale", "quantity": 1 }
            ],
            "shippingAddress": address()
        }),
        customer("a"),
    ));

    let order = &created["order"];
    assert_eq!(order["status"], "pending");
    assert_eq!(order["items"][0]["unitPriceCents"], 2499);
    assert_eq!(order["items"][0]["name"], "Stainless Raw Feeding Bowl - Large");
    assert_eq!(order["totalCents"], 2 * 2499 + 2999);
}

#[test]
fn unknown_product_or_variant_is_rejected() {
    let service = service();
    let unknown = json!({ "items": [{ "productId": "prod_nope", "quantity": 1 }] });
    assert_eq!(status(service.dispatch("orders.create", unknown, customer("a"))), 400);

    let bad_variant = json!({
        "items": [{ "productId": "prod_demo_bowl", "variantId": "xl", "quantity": 1 }]
    });
    assert_eq!(status(service.dispatch("orders.create", bad_variant, customer("a"))), 400);

    let needs_variant = json!({ "items": [{ "productId": "prod_demo_bowl", "quantity": 1 }] });
    assert_eq!(status(service.dispatch("orders.create", needs_variant, customer("a"))), 400);

    let zero = json!({ "items": [{ "productId": "prod_demo_scale", "quantity": 0 }] });
    assert_eq!(status(service.dispatch("orders.create", zero, customer("a"))), 400);
}

#[test]
fn orders_are_scoped_per_user_newest_first() {
    let service = service();
    let line = json!({ "items": [{ "productId": "prod_demo_guide", "quantity": 1 }] });
    let first = ok(service.dispatch("orders.create", line.clone(), customer("a")));
    std::thread::sleep(std::time::Duration::from_millis(5));
    let second = ok(service.dispatch("orders.create", line.clone(), customer("a")));
    ok(service.dispatch("orders.create", line, customer("b")));

    let listing = ok(service.dispatch("orders.list", json!({}), customer("a")));
    let orders = listing["orders"].as_array().unwrap();
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0]["id"], second["order"]["id"]);
    assert_eq!(orders[1]["id"], first["order"]["id"]);
}

/// Sync one remote product priced at `price` and return its (product, variant) ids.
fn synced_product(service: &rawfeed::Service<rawfeed::Collections>, price: f64) -> (Value, Value) {
    let report = ok(service.dispatch(
        "catalog.sync",
        json!({ "remote": [{
            "id": "g-frame", "title": "Gold Frame",
            "variants": [{ "id": "g-frame-1", "title": "A4", "price": price }]
        }] }),
        admin(),
    ));
    let product = &report["products"][0];
    (product["id"].clone(), product["variants"][0]["id"].clone())
}

#[test]
fn oversized_quantities_are_rejected() {
    let service = service();
    let (product_id, variant_id) = synced_product(&service, 1e8);

    let order = |quantity: u64| {
        json!({ "items": [{ "productId": product_id, "variantId": variant_id, "quantity": quantity }] })
    };
    assert_eq!(status(service.dispatch("orders.create", order(4_294_967_295), customer("a"))), 400);
    assert_eq!(status(service.dispatch("orders.create", order(1001), customer("a"))), 400);

    let placed = ok(service.dispatch("orders.create", order(1000), customer("a")));
    assert_eq!(placed["order"]["totalCents"], 10_000_000_000_000u64);
}

#[test]
fn overflowing_totals_are_rejected() {
    let service = service();
    let (product_id, variant_id) = synced_product(&service, 1e17);

    let line = json!({ "productId": product_id, "variantId": variant_id, "quantity": 1 });
    let result = service.dispatch("orders.create", json!({ "items": [line.clone(), line] }), customer("a"));
    assert_eq!(status(result), 400);

    let listing = ok(service.dispatch("orders.list", json!({}), customer("a")));
    assert_eq!(listing["orders"].as_array().unwrap().len(), 0);
}
