//! Handler: pets.update
//!
//! Partial update: fields absent from the payload keep their stored values.

use serde_json::{json, Value};

use crate::api::HandlerError;
use crate::domain::{merge_patch, Pet};
use crate::handlers::{now, Ctx};
use crate::store::Scope;

pub const COMMAND: &str = "pets.update";

pub fn guard(ctx: &Ctx<'_>) -> bool {
    ctx.has_fields(&["id"])
}

pub fn handle(ctx: &Ctx<'_>) -> Result<Value, HandlerError> {
    let user_id = ctx.user_id()?;
    let id = ctx.field_str("id").unwrap_or_default().to_string();
    let patch = ctx.raw_input();
    let now = now();

    let updated = ctx
        .store()
        .collection::<Pet>(Scope::Global)
        .update(&id, |pet| {
            // Another owner's pet is reported as missing.
            if pet.user_id != user_id {
                return Err(HandlerError::NotFound(format!("pet {}", id)));
            }
            let mut merged = merge_patch(pet, patch, Pet::PROTECTED)?;
            merged.normalize();
            merged.validate(now)?;
            merged.updated_at = now;
            *pet = merged;
            Ok(())
        })?
        .ok_or_else(|| HandlerError::NotFound(format!("pet {}", id)))?;

    Ok(json!({ "pet": updated }))
}
