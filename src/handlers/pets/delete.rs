//! Handler: pets.delete

use serde_json::{json, Value};

use crate::api::HandlerError;
use crate::domain::Pet;
use crate::handlers::Ctx;
use crate::store::Scope;

pub const COMMAND: &str = "pets.delete";

pub fn guard(ctx: &Ctx<'_>) -> bool {
    ctx.has_fields(&["id"])
}

pub fn handle(ctx: &Ctx<'_>) -> Result<Value, HandlerError> {
    let user_id = ctx.user_id()?;
    let id = ctx.field_str("id").unwrap_or_default();

    let removed = ctx
        .store()
        .collection::<Pet>(Scope::Global)
        .modify(|pets| {
            let index = pets
                .iter()
                .position(|pet| pet.id == id && pet.user_id == user_id)?;
            Some(pets.remove(index))
        })
        .ok_or_else(|| HandlerError::NotFound(format!("pet {}", id)))?;

    Ok(json!({ "deleted": removed.id }))
}
