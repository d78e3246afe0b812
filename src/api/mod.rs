//! api: command handler framework and HTTP surface.
//!
//! Every REST route maps onto a named command registered on a `Service`.
//! Each command receives a `Context<R>` with the decoded input, the caller's
//! session, and the store.
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use rawfeed::api::{Service, Session};
//! use rawfeed::store::Collections;
//! use serde_json::json;
//!
//! let service = Arc::new(rawfeed::register_handlers!(
//!     Service::new(Collections::default()),
//!     rawfeed::handlers::pets::create,
//! ));
//!
//! let result = service.dispatch(
//!     "pets.create",
//!     json!({ "name": "Rex", "species": "dog", /* ... */ }),
//!     Session::user("user-42", "customer"),
//! );
//! ```
//!
//! ## Handler Convention
//!
//! Each handler module exports:
//!
//! ```ignore
//! pub const COMMAND: &str = "pets.create";
//!
//! pub fn guard(ctx: &Context<Collections>) -> bool {
//!     ctx.has_fields(&["name", "species"])
//! }
//!
//! pub fn handle(ctx: &Context<Collections>) -> Result<Value, HandlerError> {
//!     let user_id = ctx.user_id()?;
//!     // ...
//! }
//! ```

mod context;
mod error;
mod service;
mod session;

pub use context::Context;
pub use error::HandlerError;
pub use service::Service;
pub use session::{Session, ADMIN_ROLES, USER_ID_HEADER, USER_ROLE_HEADER};

#[cfg(feature = "http")]
mod http;
#[cfg(feature = "http")]
pub use http::{error_response, router, serve, shutdown_signal, AppState};
#[cfg(feature = "http")]
pub(crate) use http::session_from_headers;

/// Register handler modules with a service using the convention pattern.
///
/// Each handler module must export:
/// - `COMMAND: &str`, the command name
/// - `guard(ctx) -> bool`, required-field check
/// - `handle(ctx) -> Result<Value, HandlerError>`, the handler
///
/// # Example
/// ```ignore
/// let service = rawfeed::register_handlers!(
///     Service::new(Collections::default()),
///     handlers::pets::list,
///     handlers::pets::create,
/// );
/// ```
#[macro_export]
macro_rules! register_handlers {
    ($service:expr, $( $($seg:ident)::+ ),+ $(,)?) => {
        $service
        $(
            .command_guarded(
                $($seg)::+::COMMAND,
                $($seg)::+::guard,
                $($seg)::+::handle,
            )
        )+
    };
}
