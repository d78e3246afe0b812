//! Handler: posts.patch
//!
//! Two shapes share the route:
//! - bulk status change: `{ "ids": [...], "status": "published" }`
//! - single partial update: `{ "id": "...", ...fields }`

use serde::Deserialize;
use serde_json::{json, Value};

use crate::api::HandlerError;
use crate::domain::{merge_patch, Post, PostStatus};
use crate::handlers::{now, Ctx};
use crate::store::Scope;

pub const COMMAND: &str = "posts.patch";

#[derive(Deserialize)]
struct BulkInput {
    ids: Vec<String>,
    status: PostStatus,
}

pub fn guard(ctx: &Ctx<'_>) -> bool {
    !ctx.is_admin() || ctx.has_fields(&["ids", "status"]) || ctx.has_field("id")
}

pub fn handle(ctx: &Ctx<'_>) -> Result<Value, HandlerError> {
    ctx.require_admin()?;

    if ctx.has_field("ids") {
        bulk_status(ctx)
    } else {
        single(ctx)
    }
}

fn bulk_status(ctx: &Ctx<'_>) -> Result<Value, HandlerError> {
    let input = ctx.input::<BulkInput>()?;
    let now = now();

    let updated = ctx
        .store()
        .collection::<Post>(Scope::Global)
        .modify(|posts| {
            let mut count = 0usize;
            for post in posts.iter_mut().filter(|p| input.ids.contains(&p.id)) {
                post.set_status(input.status, now);
                count += 1;
            }
            (count > 0).then_some(count)
        })
        .unwrap_or(0);

    Ok(json!({ "updated": updated }))
}

fn single(ctx: &Ctx<'_>) -> Result<Value, HandlerError> {
    let id = ctx.field_str("id").unwrap_or_default().to_string();
    let patch = ctx.raw_input();
    let status = match patch.get("status") {
        None | Some(Value::Null) => None,
        Some(value) => Some(serde_json::from_value::<PostStatus>(value.clone())?),
    };
    let now = now();

    let updated = ctx
        .store()
        .collection::<Post>(Scope::Global)
        .update(&id, |post| {
            let mut merged = merge_patch(post, patch, Post::PROTECTED)?;
            merged.validate()?;
            merged.updated_at = now;
            if let Some(status) = status {
                merged.set_status(status, now);
            }
            *post = merged;
            Ok::<_, HandlerError>(())
        })?
        .ok_or_else(|| HandlerError::NotFound(format!("post {}", id)))?;

    Ok(json!({ "post": updated }))
}
