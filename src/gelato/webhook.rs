//! Inbound fulfilment webhook: signature check and status mapping.

use base64::{engine::general_purpose::STANDARD, Engine};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;

use crate::domain::OrderStatus;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the base64 HMAC-SHA256 of the raw request body.
pub const SIGNATURE_HEADER: &str = "x-gelato-signature";

/// The only event that moves an order.
pub const ORDER_STATUS_EVENT: &str = "order_status_updated";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WebhookError {
    #[error("missing webhook signature")]
    MissingSignature,
    #[error("webhook signature is not valid base64")]
    MalformedSignature,
    #[error("webhook signature mismatch")]
    Mismatch,
    #[error("webhook secret rejected: {0}")]
    InvalidSecret(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEvent {
    pub event: String,
    /// Gelato's own order id.
    #[serde(default)]
    pub order_id: Option<String>,
    /// The local order id, sent when the order was submitted.
    pub order_reference_id: String,
    /// The local user id owning the order.
    pub customer_reference_id: String,
    #[serde(default)]
    pub fulfillment_status: String,
    #[serde(default)]
    pub tracking_url: Option<String>,
}

fn mac(secret: &str) -> Result<HmacSha256, WebhookError> {
    HmacSha256::new_from_slice(secret.as_bytes()).map_err(|e| WebhookError::InvalidSecret(e.to_string()))
}

/// Base64 HMAC-SHA256 of `body` under `secret`.
pub fn sign(secret: &str, body: &[u8]) -> Result<String, WebhookError> {
    let mut mac = mac(secret)?;
    mac.update(body);
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

/// Check `signature` (optionally prefixed `sha256=`) against `body`.
/// The comparison is constant-time.
pub fn verify_signature(secret: &str, body: &[u8], signature: Option<&str>) -> Result<(), WebhookError> {
    let signature = signature
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(WebhookError::MissingSignature)?;
    let encoded = signature.strip_prefix("sha256=").unwrap_or(signature);
    let expected = STANDARD
        .decode(encoded)
        .map_err(|_| WebhookError::MalformedSignature)?;

    let mut mac = mac(secret)?;
    mac.update(body);
    mac.verify_slice(&expected).map_err(|_| WebhookError::Mismatch)
}

/// Map a Gelato fulfilment status onto a local order status.
/// `None` for statuses with no local counterpart.
pub fn fulfilment_status(status: &str) -> Option<OrderStatus> {
    match status.trim().to_ascii_lowercase().as_str() {
        "created" | "passed" | "pending_approval" | "uploading" => Some(OrderStatus::Submitted),
        "in_production" | "printed" => Some(OrderStatus::InProduction),
        "shipped" | "in_transit" => Some(OrderStatus::Shipped),
        "delivered" => Some(OrderStatus::Delivered),
        "canceled" | "cancelled" => Some(OrderStatus::Cancelled),
        "failed" | "returned" => Some(OrderStatus::Failed),
        _ => None,
    }
}
