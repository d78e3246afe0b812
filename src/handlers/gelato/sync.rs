//! Handler: catalog.sync

use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::api::HandlerError;
use crate::domain::Product;
use crate::gelato::{sync_catalog, RemoteProduct, SyncMode};
use crate::handlers::{now, Ctx};
use crate::store::Scope;

pub const COMMAND: &str = "catalog.sync";

#[derive(Deserialize)]
pub struct Input {
    #[serde(default)]
    pub mode: SyncMode,
    pub remote: Vec<RemoteProduct>,
}

pub fn guard(ctx: &Ctx<'_>) -> bool {
    !ctx.is_admin() || ctx.has_fields(&["remote"])
}

pub fn handle(ctx: &Ctx<'_>) -> Result<Value, HandlerError> {
    ctx.require_admin()?;
    let input = ctx.input::<Input>()?;
    let now = now();

    let report = ctx
        .store()
        .collection::<Product>(Scope::Global)
        .modify(|products| Some(sync_catalog(&input.remote, input.mode, products, now)))
        .unwrap_or_default();

    info!(
        mode = ?input.mode,
        synced = report.synced,
        failed = report.failed,
        skipped = report.skipped,
        "gelato catalog sync finished"
    );

    Ok(json!(report))
}
