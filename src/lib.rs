//! rawfeed: backend for a raw-feeding pet platform.
//!
//! Collections of flat JSON records live in Redis when it is reachable and
//! in process memory when it is not. REST routes map onto named commands;
//! the chat assistant is rate-limited per caller; the product catalog is
//! mirrored from Gelato.
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use rawfeed::api::{router, serve, AppState};
//! use rawfeed::store::{Collections, RedisStore};
//!
//! let store = Collections::builder()
//!     .primary(RedisStore::open("redis://127.0.0.1/")?)
//!     .build();
//! let state = AppState::new(Arc::new(rawfeed::handlers::service(store)));
//! serve(router(state), "0.0.0.0:3000").await?;
//! ```

// Lets `#[derive(Record)]` refer to `rawfeed::store::Record` inside this crate.
extern crate self as rawfeed;

pub mod api;
pub mod chat;
pub mod domain;
pub mod gelato;
pub mod handlers;
pub mod ids;
pub mod rate_limit;
pub mod store;

#[cfg(feature = "http")]
pub mod config;
#[cfg(feature = "http")]
pub mod logging;

pub use rawfeed_macros::Record;
pub use store::Record;

pub use api::{Context, HandlerError, Service, Session};
pub use store::{Collection, Collections, Durability, MemoryStore, PrimaryStore, Scope, StoreError};
