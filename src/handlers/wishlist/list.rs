//! Handler: wishlist.list

use serde_json::{json, Value};

use crate::api::HandlerError;
use crate::domain::{Product, WISHLIST};
use crate::handlers::Ctx;
use crate::store::Scope;

pub const COMMAND: &str = "wishlist.list";

pub fn guard(_ctx: &Ctx<'_>) -> bool {
    true
}

pub fn handle(ctx: &Ctx<'_>) -> Result<Value, HandlerError> {
    let user_id = ctx.user_id()?;
    let product_ids = ctx.store().set_members(&Scope::owner(user_id), WISHLIST);

    // Ids whose product has since disappeared are listed but not hydrated.
    let catalog = ctx.store().collection::<Product>(Scope::Global).all();
    let items: Vec<&Product> = product_ids
        .iter()
        .filter_map(|id| catalog.iter().find(|p| &p.id == id))
        .collect();

    Ok(json!({ "productIds": product_ids, "items": items }))
}
