//! Caller identity forwarded by the platform's auth middleware.

use std::collections::HashMap;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// Roles allowed through `/api/admin/*`.
pub const ADMIN_ROLES: &[&str] = &["admin", "super_admin"];

/// Session variables taken from the incoming request.
///
/// The middleware verifies the bearer token upstream and injects:
///
/// ```text
/// x-user-id: user-42
/// x-user-role: customer
/// ```
#[derive(Debug, Clone, Default)]
pub struct Session {
    variables: HashMap<String, String>,
}

impl Session {
    /// Create an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session from a map of variables.
    pub fn from_map(variables: HashMap<String, String>) -> Self {
        Self { variables }
    }

    /// Session for `user_id` with `role`.
    pub fn user(user_id: impl Into<String>, role: impl Into<String>) -> Self {
        let mut session = Self::new();
        session.set(USER_ID_HEADER, user_id);
        session.set(USER_ROLE_HEADER, role);
        session
    }

    /// Get the user ID (`x-user-id`). Blank values count as absent.
    pub fn user_id(&self) -> Option<&str> {
        self.get(USER_ID_HEADER).filter(|id| !id.trim().is_empty())
    }

    /// Get the user role (`x-user-role`).
    pub fn role(&self) -> Option<&str> {
        self.get(USER_ROLE_HEADER)
    }

    pub fn is_admin(&self) -> bool {
        self.role().is_some_and(|role| ADMIN_ROLES.contains(&role))
    }

    /// Get a session variable by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(|v| v.as_str())
    }

    /// Set a session variable.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(key.into(), value.into());
    }

    /// Check if a session variable exists.
    pub fn has(&self, key: &str) -> bool {
        self.variables.contains_key(key)
    }
}
