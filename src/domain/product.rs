use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Record;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Record)]
#[serde(rename_all = "camelCase")]
#[record(collection = "products", seed = "crate::domain::seed::demo_products")]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    pub price_cents: u64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub variants: Vec<Variant>,
    /// Set on products mirrored from the Gelato catalog.
    #[serde(default)]
    pub gelato_product_id: Option<String>,
    #[serde(default)]
    pub sync_status: Option<SyncStatus>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    pub id: String,
    pub name: String,
    pub price_cents: u64,
    /// Locally tracked stock; preserved across catalog syncs.
    #[serde(default)]
    pub inventory: u32,
    #[serde(default)]
    pub gelato_variant_id: Option<String>,
    /// Gelato `productUid` used when ordering this variant.
    #[serde(default)]
    pub gelato_product_uid: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncStatus {
    pub synced_at: DateTime<Utc>,
    /// Remote `updatedAt` at the time of the sync, when the catalog reports one.
    #[serde(default)]
    pub remote_updated_at: Option<String>,
}

pub(crate) fn default_currency() -> String {
    "USD".to_string()
}

fn default_active() -> bool {
    true
}

impl Product {
    pub fn variant(&self, variant_id: &str) -> Option<&Variant> {
        self.variants.iter().find(|v| v.id == variant_id)
    }

    /// Price of `variant_id`, or the base price when no variant is named.
    pub fn unit_price(&self, variant_id: Option<&str>) -> Option<u64> {
        match variant_id {
            Some(id) => self.variant(id).map(|v| v.price_cents),
            None => Some(self.price_cents),
        }
    }

    pub fn in_category(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c.eq_ignore_ascii_case(category))
    }

    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.name.to_lowercase().contains(&term) || self.description.to_lowercase().contains(&term)
    }
}
