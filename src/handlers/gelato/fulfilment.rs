//! Handler: orders.fulfilment
//!
//! Applies a verified Gelato status webhook to the local order.

use serde_json::{json, Value};
use tracing::{debug, info};

use crate::api::HandlerError;
use crate::domain::Order;
use crate::gelato::{fulfilment_status, WebhookEvent, ORDER_STATUS_EVENT};
use crate::handlers::{now, Ctx};
use crate::store::Scope;

pub const COMMAND: &str = "orders.fulfilment";

pub fn guard(ctx: &Ctx<'_>) -> bool {
    ctx.has_fields(&["event", "orderReferenceId", "customerReferenceId"])
}

pub fn handle(ctx: &Ctx<'_>) -> Result<Value, HandlerError> {
    let event = ctx.input::<WebhookEvent>()?;

    if event.event != ORDER_STATUS_EVENT {
        debug!(event = %event.event, "ignoring gelato event");
        return Ok(json!({ "received": true, "ignored": true }));
    }

    let Some(status) = fulfilment_status(&event.fulfillment_status) else {
        debug!(status = %event.fulfillment_status, "ignoring unmapped fulfilment status");
        return Ok(json!({ "received": true, "ignored": true }));
    };

    let orders = ctx
        .store()
        .collection::<Order>(Scope::owner(event.customer_reference_id.as_str()));
    let order_id = event.order_reference_id.as_str();

    let now = now();
    let mut settled = None;
    let updated = orders
        .update(order_id, |order| {
            // Delivered and cancelled orders keep their status; the error
            // aborts the write.
            if order.status.is_final() {
                settled = Some(order.status);
                return Err(HandlerError::Invalid(format!("order {} is settled", order.id)));
            }
            order.set_status(status, now);
            if event.tracking_url.is_some() {
                order.tracking_url = event.tracking_url.clone();
            }
            if order.gelato_order_id.is_none() {
                order.gelato_order_id = event.order_id.clone();
            }
            Ok(())
        });

    if let Some(current) = settled {
        return Ok(json!({ "received": true, "ignored": true, "status": current }));
    }
    let updated = updated?.ok_or_else(|| HandlerError::NotFound(format!("order {}", order_id)))?;

    info!(order = %updated.id, status = ?updated.status, "order fulfilment updated");
    Ok(json!({ "received": true, "orderId": updated.id, "status": updated.status }))
}
