use serde_json::{json, Value};

use rawfeed::api::{HandlerError, Service, Session};
use rawfeed::handlers;
use rawfeed::store::{Collections, MemoryStore};

/// Every command over a fresh in-memory primary store.
pub fn service() -> Service<Collections> {
    handlers::service(Collections::builder().primary(MemoryStore::new()).build())
}

pub fn customer(id: &str) -> Session {
    Session::user(id, "customer")
}

pub fn admin() -> Session {
    Session::user("admin-1", "admin")
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

pub fn ok(result: Result<Value, HandlerError>) -> Value {
    match result {
        Ok(value) => value,
        Err(e) => panic!("command failed: {e}"),
    }
}

pub fn status(result: Result<Value, HandlerError>) -> u16 {
    match result {
        Ok(value) => panic!("expected an error, got {value}"),
        Err(e) => e.status_code(),
    }
}
