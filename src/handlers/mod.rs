//! Command handlers behind the REST routes.
//!
//! One module per command, each exporting `COMMAND`, `guard` and `handle`.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::api::{Context, HandlerError, Service};
use crate::store::Collections;

pub mod gelato;
pub mod orders;
pub mod pets;
pub mod posts;
pub mod products;
pub mod reports;
pub mod wishlist;

/// The context every handler in this crate runs against.
pub type Ctx<'a> = Context<'a, Collections>;

/// A service with every command registered.
pub fn service(store: Collections) -> Service<Collections> {
    crate::register_handlers!(
        Service::new(store),
        pets::list,
        pets::create,
        pets::update,
        pets::delete,
        posts::list,
        posts::create,
        posts::patch,
        posts::delete,
        products::list,
        orders::list,
        orders::create,
        wishlist::list,
        wishlist::add,
        wishlist::remove,
        reports::create,
        reports::list,
        reports::update,
        gelato::sync,
        gelato::fulfilment,
    )
}

pub(crate) fn now() -> DateTime<Utc> {
    Utc::now()
}

/// A boolean input field. Query strings carry `"true"` / `"false"`.
pub(crate) fn input_bool(ctx: &Ctx<'_>, field: &'static str) -> Result<Option<bool>, HandlerError> {
    match ctx.raw_input().get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(Value::String(s)) => match s.trim() {
            "" => Ok(None),
            "true" | "1" => Ok(Some(true)),
            "false" | "0" => Ok(Some(false)),
            other => Err(HandlerError::Invalid(format!("invalid {}: {}", field, other))),
        },
        Some(other) => Err(HandlerError::Invalid(format!("invalid {}: {}", field, other))),
    }
}

/// A positive integer input field, numeric or as a query string.
pub(crate) fn input_u32(ctx: &Ctx<'_>, field: &'static str) -> Result<Option<u32>, HandlerError> {
    let parsed = match ctx.raw_input().get(field) {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(n)) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Some(Value::String(s)) if s.trim().is_empty() => return Ok(None),
        Some(Value::String(s)) => s.trim().parse::<u32>().ok(),
        Some(_) => None,
    };
    match parsed {
        Some(n) if n > 0 => Ok(Some(n)),
        _ => Err(HandlerError::Invalid(format!(
            "invalid {}: expected a positive integer",
            field
        ))),
    }
}
