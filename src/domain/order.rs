use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{require, ValidationError};
use crate::ids::new_id;
use crate::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Submitted,
    InProduction,
    Shipped,
    Delivered,
    Cancelled,
    Failed,
}

impl OrderStatus {
    /// Terminal states ignore further fulfilment updates.
    pub fn is_final(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }
}

/// One user's orders are stored as one blob (`orders:{userId}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Record)]
#[serde(rename_all = "camelCase")]
#[record(collection = "orders")]
pub struct Order {
    pub id: String,
    pub user_id: String,
    pub items: Vec<OrderItem>,
    pub total_cents: u64,
    #[serde(default = "super::product::default_currency")]
    pub currency: String,
    pub status: OrderStatus,
    #[serde(default)]
    pub shipping_address: Option<ShippingAddress>,
    #[serde(default)]
    pub gelato_order_id: Option<String>,
    #[serde(default)]
    pub tracking_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: String,
    #[serde(default)]
    pub variant_id: Option<String>,
    pub name: String,
    pub unit_price_cents: u64,
    pub quantity: u32,
}

impl OrderItem {
    /// `None` when the line total does not fit in a `u64`.
    pub fn line_total(&self) -> Option<u64> {
        self.unit_price_cents.checked_mul(u64::from(self.quantity))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub first_name: String,
    pub last_name: String,
    pub address_line1: String,
    #[serde(default)]
    pub address_line2: Option<String>,
    pub city: String,
    #[serde(default)]
    pub state: Option<String>,
    pub post_code: String,
    /// ISO 3166-1 alpha-2.
    pub country: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
}

impl ShippingAddress {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("firstName", &self.first_name)?;
        require("lastName", &self.last_name)?;
        require("addressLine1", &self.address_line1)?;
        require("city", &self.city)?;
        require("postCode", &self.post_code)?;
        require("email", &self.email)?;
        if self.country.len() != 2 || !self.country.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ValidationError::invalid("country", "expected a two-letter country code"));
        }
        if !self.email.contains('@') {
            return Err(ValidationError::invalid("email", "not an email address"));
        }
        Ok(())
    }
}

/// Largest quantity a single order line may carry.
pub const MAX_LINE_QUANTITY: u32 = 1000;

impl Order {
    pub fn new(
        user_id: &str,
        items: Vec<OrderItem>,
        shipping_address: Option<ShippingAddress>,
        now: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        if items.is_empty() {
            return Err(ValidationError::Missing("items"));
        }
        if items.iter().any(|item| item.quantity == 0) {
            return Err(ValidationError::invalid("quantity", "must be at least 1"));
        }
        if items.iter().any(|item| item.quantity > MAX_LINE_QUANTITY) {
            return Err(ValidationError::invalid(
                "quantity",
                format!("must be at most {}", MAX_LINE_QUANTITY),
            ));
        }
        if let Some(address) = &shipping_address {
            address.validate()?;
        }

        let total_cents = items
            .iter()
            .try_fold(0u64, |total, item| item.line_total()?.checked_add(total))
            .ok_or_else(|| ValidationError::invalid("items", "order total is too large"))?;
        Ok(Order {
            id: new_id("order"),
            user_id: user_id.to_string(),
            items,
            total_cents,
            currency: super::product::default_currency(),
            status: OrderStatus::Pending,
            shipping_address,
            gelato_order_id: None,
            tracking_url: None,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn set_status(&mut self, status: OrderStatus, now: DateTime<Utc>) {
        self.status = status;
        self.updated_at = now;
    }
}
