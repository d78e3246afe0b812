use std::sync::Arc;

use axum::Router;
use serde_json::{json, Value};

use rawfeed::api::{router, AppState};
use rawfeed::handlers;
use rawfeed::store::{Collections, MemoryStore};

/// App state over a fresh in-memory primary and no upstream clients.
pub fn state() -> AppState {
    let store = Collections::builder().primary(MemoryStore::new()).build();
    AppState::new(Arc::new(handlers::service(store)))
}

/// Bind to port 0 and return the base URL.
pub async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

pub async fn start_server(state: AppState) -> String {
    serve(router(state)).await
}

pub fn pet(name: &str) -> Value {
    json!({
        "name": name,
        "species": "dog",
        "breed": "Husky",
        "birthdate": "2020-05-01",
        "weight": 24.5,
        "gender": "male",
    })
}

pub fn shipping_address() -> Value {
    json!({
        "firstName": "Ada",
        "lastName": "Lovelace",
        "addressLine1": "1 Kennel Road",
        "city": "London",
        "postCode": "N1 9GU",
        "country": "GB",
        "email": "ada@example.com",
    })
}
