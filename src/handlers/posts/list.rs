//! Handler: posts.list

use serde_json::{json, Value};

use crate::api::HandlerError;
use crate::domain::{Post, PostStatus};
use crate::handlers::{input_u32, Ctx};
use crate::store::Scope;

pub const COMMAND: &str = "posts.list";

const DEFAULT_LIMIT: u32 = 10;
const MAX_LIMIT: u32 = 100;

pub fn guard(_ctx: &Ctx<'_>) -> bool {
    true
}

pub fn handle(ctx: &Ctx<'_>) -> Result<Value, HandlerError> {
    ctx.require_admin()?;

    let page = input_u32(ctx, "page")?.unwrap_or(1);
    let limit = input_u32(ctx, "limit")?.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
    let status = ctx
        .field_str("status")
        .map(|s| serde_json::from_value::<PostStatus>(Value::String(s.to_string())))
        .transpose()
        .map_err(|_| HandlerError::Invalid("invalid status".into()))?;
    let search = ctx.field_str("search");

    let mut posts: Vec<Post> = ctx
        .store()
        .collection::<Post>(Scope::Global)
        .all()
        .into_iter()
        .filter(|post| status.map_or(true, |status| post.status == status))
        .filter(|post| search.map_or(true, |term| post.matches_search(term)))
        .collect();
    posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let total = posts.len();
    let total_pages = total.div_ceil(limit as usize);
    let page_posts: Vec<Post> = posts
        .into_iter()
        .skip((page as usize - 1) * limit as usize)
        .take(limit as usize)
        .collect();

    Ok(json!({
        "posts": page_posts,
        "pagination": {
            "page": page,
            "limit": limit,
            "total": total,
            "totalPages": total_pages,
        }
    }))
}
