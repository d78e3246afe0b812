//! Gelato HTTP routes.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use super::client::{GelatoOrder, GelatoOrderItem};
use super::sync::SyncMode;
use super::webhook::{verify_signature, SIGNATURE_HEADER};
use crate::api::{error_response, AppState, HandlerError, Session};
use crate::domain::{Order, OrderStatus, Product};
use crate::store::{Collections, Scope};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubmitInput {
    order_id: String,
}

#[derive(Default, Deserialize)]
struct SyncInput {
    #[serde(default)]
    mode: SyncMode,
}

/// `POST /api/gelato/orders`: submit one of the caller's orders for
/// fulfilment. The order is marked `submitted` on success, `failed` when
/// Gelato rejects it.
pub async fn submit_order_handler(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    match submit_order(&state, &headers, &body).await {
        Ok(value) => Json(value).into_response(),
        Err(e) => error_response(&e),
    }
}

/// `POST /api/gelato/webhooks`: signature-checked fulfilment update.
pub async fn webhook_handler(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    let Some(secret) = state.webhook_secret.clone() else {
        return error_response(&HandlerError::Unavailable("gelato webhooks are not configured".into()));
    };

    let signature = headers.get(SIGNATURE_HEADER).and_then(|v| v.to_str().ok());
    if let Err(e) = verify_signature(&secret, &body, signature) {
        warn!(error = %e, "rejected gelato webhook");
        return error_response(&HandlerError::Unauthorized(e.to_string()));
    }

    let event: Value = match serde_json::from_slice(&body) {
        Ok(event) => event,
        Err(e) => return error_response(&HandlerError::from(e)),
    };

    match state.dispatch("orders.fulfilment", event, Session::new()).await {
        Ok(value) => Json(value).into_response(),
        Err(e) => error_response(&e),
    }
}

/// `POST /api/admin/gelato/sync`: pull the store catalog and reconcile it.
pub async fn sync_handler(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    match sync(&state, &headers, &body).await {
        Ok(value) => Json(value).into_response(),
        Err(e) => error_response(&e),
    }
}

async fn submit_order(state: &AppState, headers: &HeaderMap, body: &[u8]) -> Result<Value, HandlerError> {
    let session = crate::api::session_from_headers(headers);
    let user_id = session
        .user_id()
        .ok_or_else(|| HandlerError::Unauthorized("missing x-user-id".into()))?
        .to_string();
    let input: SubmitInput = serde_json::from_slice(body)?;
    let client = state
        .gelato
        .clone()
        .ok_or_else(|| HandlerError::Unavailable("gelato is not configured".into()))?;

    let (user, order_id) = (user_id.clone(), input.order_id.clone());
    let request = state
        .with_store(move |store| prepare_order(store, &user, &order_id))
        .await?;

    let (user, order_id) = (user_id, input.order_id);
    match client.create_order(&request).await {
        Ok(gelato_id) => {
            info!(order = %order_id, gelato_order = %gelato_id, "order submitted to gelato");
            let order = state
                .with_store(move |store| record_submission(store, &user, &order_id, Some(gelato_id)))
                .await?;
            Ok(json!({ "order": order }))
        }
        Err(e) => {
            warn!(order = %order_id, error = %e, "gelato rejected order");
            state
                .with_store(move |store| record_submission(store, &user, &order_id, None))
                .await?;
            Err(e.into())
        }
    }
}

async fn sync(state: &AppState, headers: &HeaderMap, body: &[u8]) -> Result<Value, HandlerError> {
    let session = crate::api::session_from_headers(headers);
    if session.user_id().is_none() {
        return Err(HandlerError::Unauthorized("missing x-user-id".into()));
    }
    if !session.is_admin() {
        return Err(HandlerError::Forbidden("admin role required".into()));
    }

    let input: SyncInput = if body.iter().all(u8::is_ascii_whitespace) {
        SyncInput::default()
    } else {
        serde_json::from_slice(body)?
    };
    let client = state
        .gelato
        .clone()
        .ok_or_else(|| HandlerError::Unavailable("gelato is not configured".into()))?;

    let remote = client.list_store_products().await?;
    info!(entries = remote.len(), "fetched gelato catalog");

    state
        .dispatch("catalog.sync", json!({ "mode": input.mode, "remote": remote }), session)
        .await
}

/// Build the Gelato request for a pending (or previously failed) order.
fn prepare_order(store: &Collections, user_id: &str, order_id: &str) -> Result<GelatoOrder, HandlerError> {
    let order = store
        .collection::<Order>(Scope::owner(user_id))
        .find(order_id)
        .ok_or_else(|| HandlerError::NotFound(format!("order {}", order_id)))?;

    if !matches!(order.status, OrderStatus::Pending | OrderStatus::Failed) {
        return Err(HandlerError::Invalid(format!("order {} was already submitted", order_id)));
    }
    let shipping_address = order
        .shipping_address
        .clone()
        .ok_or_else(|| HandlerError::Invalid("order has no shipping address".into()))?;

    let catalog = store.collection::<Product>(Scope::Global).all();
    let items = order
        .items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let product_uid = catalog
                .iter()
                .find(|p| p.id == item.product_id)
                .and_then(|p| item.variant_id.as_deref().and_then(|v| p.variant(v)))
                .and_then(|v| v.gelato_product_uid.clone())
                .ok_or_else(|| {
                    HandlerError::Invalid(format!("{} cannot be fulfilled by gelato", item.name))
                })?;
            Ok(GelatoOrderItem {
                item_reference_id: format!("{}-{}", order.id, index + 1),
                product_uid,
                quantity: item.quantity,
            })
        })
        .collect::<Result<Vec<_>, HandlerError>>()?;

    Ok(GelatoOrder {
        order_type: "order".to_string(),
        order_reference_id: order.id.clone(),
        customer_reference_id: user_id.to_string(),
        currency: order.currency.clone(),
        items,
        shipping_address,
    })
}

fn record_submission(
    store: &Collections,
    user_id: &str,
    order_id: &str,
    gelato_order_id: Option<String>,
) -> Result<Order, HandlerError> {
    let now = crate::handlers::now();
    store
        .collection::<Order>(Scope::owner(user_id))
        .update(order_id, |order| {
            match &gelato_order_id {
                Some(id) => {
                    order.gelato_order_id = Some(id.clone());
                    order.set_status(OrderStatus::Submitted, now);
                }
                None => order.set_status(OrderStatus::Failed, now),
            }
            Ok::<_, HandlerError>(())
        })?
        .ok_or_else(|| HandlerError::NotFound(format!("order {}", order_id)))
}
