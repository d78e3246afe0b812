//! One-way reconciliation of the Gelato catalog into local products.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::catalog::{RemoteProduct, RemoteVariant};
use crate::domain::{Product, SyncStatus, Variant};
use crate::ids::new_id;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncMode {
    /// Mint products missing locally; leave existing ones alone.
    Create,
    /// Mint missing products and overwrite existing ones.
    #[default]
    Update,
}

/// A remote entry that could not be mapped onto a local product.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    #[error("product has no title")]
    MissingTitle,
    #[error("product has no variants")]
    NoVariants,
    #[error("variant {0} has no usable price")]
    InvalidPrice(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncFailure {
    pub remote_id: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    pub synced: usize,
    pub failed: usize,
    pub skipped: usize,
    pub failures: Vec<SyncFailure>,
    /// Products created or updated by this run.
    pub products: Vec<Product>,
}

/// Upsert each remote entry into `products`, matched on `gelatoProductId`.
///
/// A failing entry is counted and skipped; the rest of the batch still runs.
/// Running the same remote data twice leaves the record count unchanged.
pub fn sync_catalog(
    remote: &[RemoteProduct],
    mode: SyncMode,
    products: &mut Vec<Product>,
    now: DateTime<Utc>,
) -> SyncReport {
    let mut report = SyncReport::default();

    for entry in remote {
        let existing = products
            .iter()
            .position(|p| p.gelato_product_id.as_deref() == Some(entry.id.as_str()));

        let outcome = match (existing, mode) {
            (Some(_), SyncMode::Create) => {
                report.skipped += 1;
                continue;
            }
            (Some(index), SyncMode::Update) => {
                apply(entry, &mut products[index], now).map(|()| products[index].clone())
            }
            (None, _) => mint(entry, now).map(|product| {
                products.push(product.clone());
                product
            }),
        };

        match outcome {
            Ok(product) => {
                report.synced += 1;
                report.products.push(product);
            }
            Err(e) => {
                report.failed += 1;
                report.failures.push(SyncFailure {
                    remote_id: entry.id.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    report
}

fn mint(entry: &RemoteProduct, now: DateTime<Utc>) -> Result<Product, MappingError> {
    let title = title(entry)?;
    let variants = map_variants(&entry.variants, &[])?;
    let price_cents = base_price(&variants);

    Ok(Product {
        id: new_id("prod"),
        name: title,
        description: entry.description.clone(),
        categories: entry.tags.clone(),
        images: entry.image_urls(),
        price_cents,
        currency: "USD".to_string(),
        active: true,
        variants,
        gelato_product_id: Some(entry.id.clone()),
        sync_status: Some(sync_status(entry, now)),
        created_at: now,
        updated_at: now,
    })
}

/// Overwrite the remote-owned fields. `product` is untouched on error.
fn apply(entry: &RemoteProduct, product: &mut Product, now: DateTime<Utc>) -> Result<(), MappingError> {
    let title = title(entry)?;
    let variants = map_variants(&entry.variants, &product.variants)?;

    product.name = title;
    product.description = entry.description.clone();
    product.categories = entry.tags.clone();
    product.images = entry.image_urls();
    product.price_cents = base_price(&variants);
    product.variants = variants;
    product.sync_status = Some(sync_status(entry, now));
    product.updated_at = now;
    Ok(())
}

fn title(entry: &RemoteProduct) -> Result<String, MappingError> {
    let title = entry.title.trim();
    if title.is_empty() {
        return Err(MappingError::MissingTitle);
    }
    Ok(title.to_string())
}

/// Remote variants matched to `existing` by Gelato variant id keep their
/// local id and inventory.
fn map_variants(remote: &[RemoteVariant], existing: &[Variant]) -> Result<Vec<Variant>, MappingError> {
    if remote.is_empty() {
        return Err(MappingError::NoVariants);
    }

    remote
        .iter()
        .map(|rv| {
            let price_cents = price_cents(rv)?;
            let matched = existing
                .iter()
                .find(|v| v.gelato_variant_id.as_deref() == Some(rv.id.as_str()));

            Ok(Variant {
                id: matched.map_or_else(|| new_id("var"), |v| v.id.clone()),
                name: if rv.title.trim().is_empty() {
                    rv.id.clone()
                } else {
                    rv.title.trim().to_string()
                },
                price_cents,
                inventory: matched.map_or(0, |v| v.inventory),
                gelato_variant_id: Some(rv.id.clone()),
                gelato_product_uid: rv.product_uid.clone(),
            })
        })
        .collect()
}

fn price_cents(variant: &RemoteVariant) -> Result<u64, MappingError> {
    match variant.price {
        Some(price) if price.is_finite() && price >= 0.0 => Ok((price * 100.0).round() as u64),
        _ => Err(MappingError::InvalidPrice(variant.id.clone())),
    }
}

fn base_price(variants: &[Variant]) -> u64 {
    variants.iter().map(|v| v.price_cents).min().unwrap_or(0)
}

fn sync_status(entry: &RemoteProduct, now: DateTime<Utc>) -> SyncStatus {
    SyncStatus {
        synced_at: now,
        remote_updated_at: entry.updated_at.clone(),
    }
}
