//! HTTP integration tests.
//!
//! Each test starts the router on an ephemeral port and talks to it with
//! reqwest. Upstream services are axum fakes on their own ports.

mod support;
mod chat;
mod gelato;
mod routes;
