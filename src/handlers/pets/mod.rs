//! Pet profiles. One global collection, filtered by owner on every access.

pub mod create;
pub mod delete;
pub mod list;
pub mod update;
