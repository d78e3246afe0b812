//! Checkout and order history. Orders are stored per user.

pub mod create;
pub mod list;
