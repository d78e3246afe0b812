//! Handler: pets.create

use serde_json::{json, Value};

use crate::api::HandlerError;
use crate::domain::{NewPet, Pet};
use crate::handlers::{now, Ctx};
use crate::store::Scope;

pub const COMMAND: &str = "pets.create";

pub fn guard(ctx: &Ctx<'_>) -> bool {
    ctx.has_fields(&["name", "species", "breed", "birthdate", "weight", "gender"])
}

pub fn handle(ctx: &Ctx<'_>) -> Result<Value, HandlerError> {
    let user_id = ctx.user_id()?;
    let input = ctx.input::<NewPet>()?;
    let pet = Pet::new(user_id, input, now())?;

    let pet = ctx.store().collection::<Pet>(Scope::Global).insert(pet);
    Ok(json!({ "pet": pet }))
}
