//! Handler: reports.update

use serde::Deserialize;
use serde_json::{json, Value};

use crate::api::HandlerError;
use crate::domain::{Report, ReportStatus};
use crate::handlers::{now, Ctx};
use crate::store::Scope;

pub const COMMAND: &str = "reports.update";

#[derive(Deserialize)]
pub struct Input {
    pub id: String,
    pub status: ReportStatus,
    #[serde(default)]
    pub note: Option<String>,
}

pub fn guard(ctx: &Ctx<'_>) -> bool {
    !ctx.is_admin() || ctx.has_fields(&["id", "status"])
}

pub fn handle(ctx: &Ctx<'_>) -> Result<Value, HandlerError> {
    let moderator_id = ctx.require_admin()?;
    let input = ctx.input::<Input>()?;
    let now = now();

    let report = ctx
        .store()
        .collection::<Report>(Scope::Global)
        .update(&input.id, |report| {
            report.review(moderator_id, input.status, input.note.clone(), now);
            Ok::<_, HandlerError>(())
        })?
        .ok_or_else(|| HandlerError::NotFound(format!("report {}", input.id)))?;

    Ok(json!({ "report": report }))
}
