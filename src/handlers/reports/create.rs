//! Handler: reports.create

use serde_json::{json, Value};

use crate::api::HandlerError;
use crate::domain::{NewReport, Report};
use crate::handlers::{now, Ctx};
use crate::store::Scope;

pub const COMMAND: &str = "reports.create";

pub fn guard(ctx: &Ctx<'_>) -> bool {
    ctx.has_fields(&["targetType", "targetId", "reason"])
}

pub fn handle(ctx: &Ctx<'_>) -> Result<Value, HandlerError> {
    let reporter_id = ctx.user_id()?;
    let input = ctx.input::<NewReport>()?;
    let report = Report::new(reporter_id, input, now())?;

    let report = ctx.store().collection::<Report>(Scope::Global).insert(report);
    Ok(json!({ "report": report }))
}
