//! Handler: orders.list

use serde_json::{json, Value};

use crate::api::HandlerError;
use crate::domain::Order;
use crate::handlers::Ctx;
use crate::store::Scope;

pub const COMMAND: &str = "orders.list";

pub fn guard(_ctx: &Ctx<'_>) -> bool {
    true
}

pub fn handle(ctx: &Ctx<'_>) -> Result<Value, HandlerError> {
    let user_id = ctx.user_id()?;

    let mut orders = ctx.store().collection::<Order>(Scope::owner(user_id)).all();
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    Ok(json!({ "orders": orders }))
}
