//! Per-user wishlist, stored as a set of product ids.

pub mod add;
pub mod list;
pub mod remove;
