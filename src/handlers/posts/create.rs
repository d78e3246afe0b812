//! Handler: posts.create

use serde_json::{json, Value};

use crate::api::HandlerError;
use crate::domain::{NewPost, Post};
use crate::handlers::{now, Ctx};
use crate::store::Scope;

pub const COMMAND: &str = "posts.create";

pub fn guard(ctx: &Ctx<'_>) -> bool {
    !ctx.is_admin() || ctx.has_fields(&["title", "content"])
}

pub fn handle(ctx: &Ctx<'_>) -> Result<Value, HandlerError> {
    let author_id = ctx.require_admin()?;
    let input = ctx.input::<NewPost>()?;
    let post = Post::new(author_id, input, now())?;

    let post = ctx.store().collection::<Post>(Scope::Global).insert(post);
    Ok(json!({ "post": post }))
}
