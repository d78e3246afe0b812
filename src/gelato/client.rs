//! Gelato REST client.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, InvalidHeaderValue};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::catalog::{RemoteProduct, StoreProducts};
use crate::api::HandlerError;
use crate::domain::ShippingAddress;

pub const DEFAULT_ECOMMERCE_URL: &str = "https://ecommerce.gelatoapis.com/v1";
pub const DEFAULT_ORDER_URL: &str = "https://order.gelatoapis.com/v4";

const API_KEY_HEADER: &str = "x-api-key";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Error)]
pub enum GelatoError {
    #[error("gelato request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("gelato returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("invalid gelato api key: {0}")]
    InvalidKey(#[from] InvalidHeaderValue),
}

impl From<GelatoError> for HandlerError {
    fn from(err: GelatoError) -> Self {
        HandlerError::Upstream(err.to_string())
    }
}

/// `POST /v4/orders` request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GelatoOrder {
    pub order_type: String,
    pub order_reference_id: String,
    pub customer_reference_id: String,
    pub currency: String,
    pub items: Vec<GelatoOrderItem>,
    pub shipping_address: ShippingAddress,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GelatoOrderItem {
    pub item_reference_id: String,
    pub product_uid: String,
    pub quantity: u32,
}

#[derive(Deserialize)]
struct CreatedOrder {
    id: String,
}

pub struct GelatoClient {
    http: reqwest::Client,
    store_id: String,
    ecommerce_url: String,
    order_url: String,
}

impl GelatoClient {
    pub fn new(api_key: &str, store_id: impl Into<String>) -> Result<Self, GelatoError> {
        Self::with_urls(api_key, store_id, DEFAULT_ECOMMERCE_URL, DEFAULT_ORDER_URL)
    }

    /// Client against non-default base URLs (sandboxes, local fakes).
    pub fn with_urls(
        api_key: &str,
        store_id: impl Into<String>,
        ecommerce_url: &str,
        order_url: &str,
    ) -> Result<Self, GelatoError> {
        let mut key = HeaderValue::from_str(api_key)?;
        key.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, key);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(DEFAULT_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            store_id: store_id.into(),
            ecommerce_url: ecommerce_url.trim_end_matches('/').to_string(),
            order_url: order_url.trim_end_matches('/').to_string(),
        })
    }

    /// Every product published to the configured store.
    pub async fn list_store_products(&self) -> Result<Vec<RemoteProduct>, GelatoError> {
        let url = format!("{}/stores/{}/products", self.ecommerce_url, self.store_id);
        debug!(url = %url, "listing gelato store products");

        let response = self.http.get(&url).send().await?;
        let listing: StoreProducts = check(response).await?.json().await?;
        Ok(listing.products)
    }

    /// Submit an order, returning Gelato's order id.
    pub async fn create_order(&self, order: &GelatoOrder) -> Result<String, GelatoError> {
        let url = format!("{}/orders", self.order_url);
        debug!(url = %url, reference = %order.order_reference_id, "creating gelato order");

        let response = self.http.post(&url).json(order).send().await?;
        let created: CreatedOrder = check(response).await?.json().await?;
        Ok(created.id)
    }
}

async fn check(response: reqwest::Response) -> Result<reqwest::Response, GelatoError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(GelatoError::Status {
        status: status.as_u16(),
        body,
    })
}
