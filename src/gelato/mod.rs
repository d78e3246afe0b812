//! Gelato print-on-demand integration.
//!
//! The catalog sync mirrors the store's Gelato products into the local
//! product collection. Local orders are submitted to Gelato for
//! fulfilment, and Gelato reports progress back through a signed webhook.

mod catalog;
mod sync;
mod webhook;

#[cfg(feature = "http")]
mod client;
#[cfg(feature = "http")]
mod routes;

pub use catalog::{RemoteProduct, RemoteVariant, StoreProducts};
pub use sync::{sync_catalog, MappingError, SyncFailure, SyncMode, SyncReport};
pub use webhook::{
    fulfilment_status, sign, verify_signature, WebhookError, WebhookEvent, ORDER_STATUS_EVENT,
    SIGNATURE_HEADER,
};

#[cfg(feature = "http")]
pub use client::{
    GelatoClient, GelatoError, GelatoOrder, GelatoOrderItem, DEFAULT_ECOMMERCE_URL,
    DEFAULT_ORDER_URL,
};
#[cfg(feature = "http")]
pub use routes::{submit_order_handler, sync_handler, webhook_handler};
