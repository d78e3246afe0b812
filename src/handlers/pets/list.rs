//! Handler: pets.list

use serde_json::{json, Value};

use crate::api::HandlerError;
use crate::domain::Pet;
use crate::handlers::{input_bool, Ctx};
use crate::store::Scope;

pub const COMMAND: &str = "pets.list";

pub fn guard(_ctx: &Ctx<'_>) -> bool {
    true
}

pub fn handle(ctx: &Ctx<'_>) -> Result<Value, HandlerError> {
    let user_id = ctx.user_id()?;
    let active = input_bool(ctx, "active")?;

    let pets: Vec<Pet> = ctx
        .store()
        .collection::<Pet>(Scope::Global)
        .all()
        .into_iter()
        .filter(|pet| pet.user_id == user_id)
        .filter(|pet| active.map_or(true, |active| pet.active == active))
        .collect();

    Ok(json!({ "pets": pets }))
}
