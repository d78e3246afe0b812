//! Service: command handler registry and dispatch.
//!
//! `Service<R>` holds a store and a set of named command handlers.
//! Each handler receives a `Context<R>` and returns `Result<Value, HandlerError>`.
//!
//! ## Example
//!
//! ```ignore
//! use rawfeed::api::{Service, Session};
//! use serde_json::json;
//!
//! let service = Service::new(Collections::default())
//!     .command("pets.list", |ctx| {
//!         let user_id = ctx.user_id()?;
//!         Ok(json!({ "user": user_id }))
//!     });
//!
//! let result = service.dispatch("pets.list", json!({}), Session::user("u1", "customer"));
//! ```

use std::collections::HashMap;

use serde_json::Value;
use tracing::{debug, error};

use super::context::Context;
use super::error::HandlerError;
use super::session::Session;

type Guard<R> = Box<dyn Fn(&Context<R>) -> bool + Send + Sync>;
type Handle<R> = Box<dyn Fn(&Context<R>) -> Result<Value, HandlerError> + Send + Sync>;

/// A registered command handler with optional guard.
struct CommandHandler<R> {
    guard: Option<Guard<R>>,
    handle: Handle<R>,
}

/// Routes named commands to handler functions.
///
/// Generic over `R`, the store type. Handlers receive a `Context<R>`
/// and can access the store via `ctx.store()`.
pub struct Service<R> {
    store: R,
    handlers: HashMap<String, CommandHandler<R>>,
}

impl<R: Send + Sync + 'static> Service<R> {
    pub fn new(store: R) -> Self {
        Self {
            store,
            handlers: HashMap::new(),
        }
    }

    /// Register a command handler.
    pub fn command<F>(mut self, name: &str, handler: F) -> Self
    where
        F: Fn(&Context<R>) -> Result<Value, HandlerError> + Send + Sync + 'static,
    {
        self.handlers.insert(
            name.to_string(),
            CommandHandler {
                guard: None,
                handle: Box::new(handler),
            },
        );
        self
    }

    /// Register a command handler with a guard function.
    ///
    /// The guard is called before the handler. If it returns `false`,
    /// the command is rejected with `HandlerError::GuardRejected`.
    pub fn command_guarded<G, F>(mut self, name: &str, guard: G, handler: F) -> Self
    where
        G: Fn(&Context<R>) -> bool + Send + Sync + 'static,
        F: Fn(&Context<R>) -> Result<Value, HandlerError> + Send + Sync + 'static,
    {
        self.handlers.insert(
            name.to_string(),
            CommandHandler {
                guard: Some(Box::new(guard)),
                handle: Box::new(handler),
            },
        );
        self
    }

    /// Dispatch a command by name.
    ///
    /// Builds a `Context` from the input and session, looks up the handler,
    /// runs the guard (if any), then calls the handler.
    pub fn dispatch(
        &self,
        command: &str,
        input: Value,
        session: Session,
    ) -> Result<Value, HandlerError> {
        let handler = self
            .handlers
            .get(command)
            .ok_or_else(|| HandlerError::UnknownCommand(command.to_string()))?;

        let ctx = Context::new(command.to_string(), input, session, &self.store);

        if let Some(guard) = &handler.guard {
            if !guard(&ctx) {
                return Err(HandlerError::GuardRejected(command.to_string()));
            }
        }

        debug!(command = %command, user = ?ctx.session().user_id(), "dispatching");
        let result = (handler.handle)(&ctx);
        if let Err(HandlerError::Internal(detail)) = &result {
            error!(command = %command, detail = %detail, "command failed");
        }
        result
    }

    /// List registered command names, sorted.
    pub fn commands(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    pub fn store(&self) -> &R {
        &self.store
    }
}
