//! Domain records persisted as whole-collection blobs.
//!
//! Records are flat and serialize camelCase, the shape the web client
//! consumes. There is no referential integrity between them: an order line
//! or wishlist entry may name a product that no longer exists.

mod merge;
mod order;
mod pet;
mod post;
mod product;
mod report;
pub mod seed;

use thiserror::Error;

pub use merge::merge_patch;
pub use order::{Order, OrderItem, OrderStatus, ShippingAddress};
pub use pet::{Gender, NewPet, Pet};
pub use post::{NewPost, Post, PostStatus};
pub use product::{Product, SyncStatus, Variant};
pub use report::{NewReport, Report, ReportStatus, ReportTarget};

/// Collection name of the per-user wishlist set.
pub const WISHLIST: &str = "wishlist";

/// A record failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing required field: {0}")]
    Missing(&'static str),
    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
    #[error("malformed record: {0}")]
    Malformed(String),
}

impl ValidationError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ValidationError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Reject empty or whitespace-only strings.
pub(crate) fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::Missing(field))
    } else {
        Ok(())
    }
}
