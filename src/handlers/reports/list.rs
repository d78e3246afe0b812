//! Handler: reports.list

use serde_json::{json, Value};

use crate::api::HandlerError;
use crate::domain::{Report, ReportStatus};
use crate::handlers::Ctx;
use crate::store::Scope;

pub const COMMAND: &str = "reports.list";

pub fn guard(_ctx: &Ctx<'_>) -> bool {
    true
}

pub fn handle(ctx: &Ctx<'_>) -> Result<Value, HandlerError> {
    ctx.require_admin()?;
    let status = ctx
        .field_str("status")
        .map(|s| serde_json::from_value::<ReportStatus>(Value::String(s.to_string())))
        .transpose()
        .map_err(|_| HandlerError::Invalid("invalid status".into()))?;

    let mut reports: Vec<Report> = ctx
        .store()
        .collection::<Report>(Scope::Global)
        .all()
        .into_iter()
        .filter(|r| status.map_or(true, |status| r.status == status))
        .collect();
    // Oldest first: the queue is worked in arrival order.
    reports.sort_by(|a, b| a.created_at.cmp(&b.created_at));

    Ok(json!({ "reports": reports, "total": reports.len() }))
}
