//! Context passed to command handlers.
//!
//! Carries the parsed input, session variables, and a reference to the
//! store. Handlers access everything they need through the context.

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::HandlerError;
use super::session::Session;

/// The context passed to every command handler.
///
/// Generic over `R` (the store type) so handlers can be exercised against
/// any store the service is configured with.
///
/// ## Example
///
/// ```ignore
/// pub fn handle(ctx: &Context<Collections>) -> Result<Value, HandlerError> {
///     let user_id = ctx.user_id()?;
///     let input = ctx.input::<NewPet>()?;
///     // ...
/// }
/// ```
pub struct Context<'a, R> {
    /// The command name being handled.
    command_name: String,
    /// Raw JSON input: the request body, or the query string as an object.
    input: Value,
    /// Session variables (user ID, role).
    session: Session,
    store: &'a R,
}

impl<'a, R> Context<'a, R> {
    pub(crate) fn new(command_name: String, input: Value, session: Session, store: &'a R) -> Self {
        Self {
            command_name,
            input,
            session,
            store,
        }
    }

    /// Deserialize the input payload into a typed struct.
    pub fn input<T: DeserializeOwned>(&self) -> Result<T, HandlerError> {
        serde_json::from_value(self.input.clone())
            .map_err(|e| HandlerError::DecodeFailed(e.to_string()))
    }

    /// Get the raw JSON input.
    pub fn raw_input(&self) -> &Value {
        &self.input
    }

    pub fn command_name(&self) -> &str {
        &self.command_name
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Get the user ID from the session. Returns `Unauthorized` if not present.
    pub fn user_id(&self) -> Result<&str, HandlerError> {
        self.session
            .user_id()
            .ok_or_else(|| HandlerError::Unauthorized("missing x-user-id".into()))
    }

    /// The caller's user ID, provided their role is an admin role.
    pub fn require_admin(&self) -> Result<&str, HandlerError> {
        let user_id = self.user_id()?;
        if !self.session.is_admin() {
            return Err(HandlerError::Forbidden("admin role required".into()));
        }
        Ok(user_id)
    }

    /// True when `require_admin` would pass. Admin command guards only
    /// check fields for such callers, so everyone else gets 401 or 403
    /// from the handler rather than a 400.
    pub fn is_admin(&self) -> bool {
        self.require_admin().is_ok()
    }

    pub fn store(&self) -> &R {
        self.store
    }

    /// A string field of the input, ignoring blanks.
    pub fn field_str(&self, field: &str) -> Option<&str> {
        self.input
            .get(field)
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
    }

    /// Check if the input carries a non-null, non-blank value for `field`.
    pub fn has_field(&self, field: &str) -> bool {
        match self.input.get(field) {
            None | Some(Value::Null) => false,
            Some(Value::String(s)) => !s.trim().is_empty(),
            Some(_) => true,
        }
    }

    /// Check if the input contains all specified fields.
    pub fn has_fields(&self, fields: &[&str]) -> bool {
        fields.iter().all(|f| self.has_field(f))
    }
}
