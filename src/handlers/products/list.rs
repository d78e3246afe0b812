//! Handler: products.list

use serde_json::{json, Value};

use crate::api::HandlerError;
use crate::domain::Product;
use crate::handlers::Ctx;
use crate::store::Scope;

pub const COMMAND: &str = "products.list";

pub fn guard(_ctx: &Ctx<'_>) -> bool {
    true
}

pub fn handle(ctx: &Ctx<'_>) -> Result<Value, HandlerError> {
    let category = ctx.field_str("category");
    let search = ctx.field_str("search");

    let products: Vec<Product> = ctx
        .store()
        .collection::<Product>(Scope::Global)
        .all()
        .into_iter()
        .filter(|p| p.active)
        .filter(|p| category.map_or(true, |c| p.in_category(c)))
        .filter(|p| search.map_or(true, |term| p.matches_search(term)))
        .collect();

    Ok(json!({ "products": products }))
}
