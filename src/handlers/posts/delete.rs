//! Handler: posts.delete

use serde_json::{json, Value};

use crate::api::HandlerError;
use crate::domain::Post;
use crate::handlers::Ctx;
use crate::store::Scope;

pub const COMMAND: &str = "posts.delete";

pub fn guard(ctx: &Ctx<'_>) -> bool {
    !ctx.is_admin() || ctx.has_fields(&["id"])
}

pub fn handle(ctx: &Ctx<'_>) -> Result<Value, HandlerError> {
    ctx.require_admin()?;
    let id = ctx.field_str("id").unwrap_or_default();

    let removed = ctx
        .store()
        .collection::<Post>(Scope::Global)
        .remove(id)
        .ok_or_else(|| HandlerError::NotFound(format!("post {}", id)))?;

    Ok(json!({ "deleted": removed.id }))
}
