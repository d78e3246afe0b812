//! Handler: wishlist.remove

use serde_json::{json, Value};

use crate::api::HandlerError;
use crate::domain::WISHLIST;
use crate::handlers::Ctx;
use crate::store::Scope;

pub const COMMAND: &str = "wishlist.remove";

pub fn guard(ctx: &Ctx<'_>) -> bool {
    ctx.has_fields(&["productId"])
}

pub fn handle(ctx: &Ctx<'_>) -> Result<Value, HandlerError> {
    let user_id = ctx.user_id()?;
    let product_id = ctx.field_str("productId").unwrap_or_default();

    if !ctx
        .store()
        .set_remove(&Scope::owner(user_id), WISHLIST, product_id)
    {
        return Err(HandlerError::NotFound(format!("wishlist item {}", product_id)));
    }

    Ok(json!({ "removed": product_id }))
}
