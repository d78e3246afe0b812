//! Store-product listing as returned by the Gelato e-commerce API.

use serde::{Deserialize, Serialize};

/// `GET /v1/stores/{storeId}/products`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreProducts {
    #[serde(default)]
    pub products: Vec<RemoteProduct>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteProduct {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub preview_url: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    /// Store tags, mapped onto local categories.
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub variants: Vec<RemoteVariant>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteVariant {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub product_uid: Option<String>,
    /// Retail price in major currency units.
    #[serde(default)]
    pub price: Option<f64>,
}

impl RemoteProduct {
    /// Explicit images, else the preview image.
    pub fn image_urls(&self) -> Vec<String> {
        if !self.images.is_empty() {
            return self.images.clone();
        }
        self.preview_url.iter().cloned().collect()
    }
}
