//! Blog post administration. Every command requires an admin role.

pub mod create;
pub mod delete;
pub mod list;
pub mod patch;
