//! Public catalog.

pub mod list;
