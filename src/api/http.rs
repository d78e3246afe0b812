//! HTTP transport, mapping REST routes onto command dispatch.
//!
//! Requires the `http` feature. Uses axum for routing.
//!
//! Query strings become the command input for `GET` and `DELETE`; JSON
//! bodies for `POST`, `PUT` and `PATCH`. Request headers become the
//! `Session`. Commands touch the store synchronously, so dispatch runs on
//! the blocking pool.
//!
//! ## Example
//!
//! ```ignore
//! let state = AppState::new(Arc::new(handlers::service(collections)));
//! rawfeed::api::serve(router(state), "0.0.0.0:3000").await?;
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Map, Value};
use tokio::net::TcpListener;
use tracing::{error, info};

use super::error::HandlerError;
use super::service::Service;
use super::session::Session;
use crate::chat::{self, ChatClient};
use crate::gelato::{self, GelatoClient};
use crate::rate_limit::FixedWindowLimiter;
use crate::store::Collections;

/// Shared state behind every route.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<Service<Collections>>,
    pub limiter: Arc<FixedWindowLimiter>,
    /// `None` when no model API key is configured.
    pub chat: Option<Arc<ChatClient>>,
    /// `None` when no Gelato API key is configured.
    pub gelato: Option<Arc<GelatoClient>>,
    pub webhook_secret: Option<Arc<str>>,
}

impl AppState {
    pub fn new(service: Arc<Service<Collections>>) -> Self {
        Self {
            service,
            limiter: Arc::new(FixedWindowLimiter::default()),
            chat: None,
            gelato: None,
            webhook_secret: None,
        }
    }

    pub fn with_limiter(mut self, limiter: FixedWindowLimiter) -> Self {
        self.limiter = Arc::new(limiter);
        self
    }

    pub fn with_chat(mut self, client: ChatClient) -> Self {
        self.chat = Some(Arc::new(client));
        self
    }

    pub fn with_gelato(mut self, client: GelatoClient) -> Self {
        self.gelato = Some(Arc::new(client));
        self
    }

    pub fn with_webhook_secret(mut self, secret: impl Into<String>) -> Self {
        self.webhook_secret = Some(Arc::from(secret.into()));
        self
    }

    /// Run a command on the blocking pool.
    pub async fn dispatch(
        &self,
        command: &'static str,
        input: Value,
        session: Session,
    ) -> Result<Value, HandlerError> {
        let service = self.service.clone();
        tokio::task::spawn_blocking(move || service.dispatch(command, input, session))
            .await
            .unwrap_or_else(|e| Err(HandlerError::Internal(format!("command task failed: {}", e))))
    }

    /// Run a store closure on the blocking pool.
    pub async fn with_store<T, F>(&self, f: F) -> Result<T, HandlerError>
    where
        T: Send + 'static,
        F: FnOnce(&Collections) -> Result<T, HandlerError> + Send + 'static,
    {
        let service = self.service.clone();
        tokio::task::spawn_blocking(move || f(service.store()))
            .await
            .unwrap_or_else(|e| Err(HandlerError::Internal(format!("store task failed: {}", e))))
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route(
            "/api/pets",
            get(|s: State<AppState>, h: HeaderMap, q: Query<HashMap<String, String>>| {
                query_command(s, h, q, "pets.list")
            })
            .post(|s: State<AppState>, h: HeaderMap, b: Bytes| body_command(s, h, b, "pets.create"))
            .put(|s: State<AppState>, h: HeaderMap, b: Bytes| body_command(s, h, b, "pets.update"))
            .delete(|s: State<AppState>, h: HeaderMap, q: Query<HashMap<String, String>>| {
                query_command(s, h, q, "pets.delete")
            }),
        )
        .route(
            "/api/admin/posts",
            get(|s: State<AppState>, h: HeaderMap, q: Query<HashMap<String, String>>| {
                query_command(s, h, q, "posts.list")
            })
            .post(|s: State<AppState>, h: HeaderMap, b: Bytes| body_command(s, h, b, "posts.create"))
            .patch(|s: State<AppState>, h: HeaderMap, b: Bytes| body_command(s, h, b, "posts.patch"))
            .delete(|s: State<AppState>, h: HeaderMap, q: Query<HashMap<String, String>>| {
                query_command(s, h, q, "posts.delete")
            }),
        )
        .route(
            "/api/products",
            get(|s: State<AppState>, h: HeaderMap, q: Query<HashMap<String, String>>| {
                query_command(s, h, q, "products.list")
            }),
        )
        .route(
            "/api/orders",
            get(|s: State<AppState>, h: HeaderMap, q: Query<HashMap<String, String>>| {
                query_command(s, h, q, "orders.list")
            })
            .post(|s: State<AppState>, h: HeaderMap, b: Bytes| body_command(s, h, b, "orders.create")),
        )
        .route(
            "/api/wishlist",
            get(|s: State<AppState>, h: HeaderMap, q: Query<HashMap<String, String>>| {
                query_command(s, h, q, "wishlist.list")
            })
            .post(|s: State<AppState>, h: HeaderMap, b: Bytes| body_command(s, h, b, "wishlist.add"))
            .delete(|s: State<AppState>, h: HeaderMap, q: Query<HashMap<String, String>>| {
                query_command(s, h, q, "wishlist.remove")
            }),
        )
        .route(
            "/api/reports",
            post(|s: State<AppState>, h: HeaderMap, b: Bytes| body_command(s, h, b, "reports.create")),
        )
        .route(
            "/api/admin/reports",
            get(|s: State<AppState>, h: HeaderMap, q: Query<HashMap<String, String>>| {
                query_command(s, h, q, "reports.list")
            })
            .patch(|s: State<AppState>, h: HeaderMap, b: Bytes| body_command(s, h, b, "reports.update")),
        )
        .route("/api/chat", post(chat::chat_handler))
        .route("/api/gelato/orders", post(gelato::submit_order_handler))
        .route("/api/gelato/webhooks", post(gelato::webhook_handler))
        .route("/api/admin/gelato/sync", post(gelato::sync_handler))
        .with_state(state)
}

/// Serve the router at `addr` until Ctrl-C or SIGTERM.
pub async fn serve(app: Router, addr: &str) -> Result<(), std::io::Error> {
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server shut down");
    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("received Ctrl+C, shutting down"),
            Err(e) => {
                error!(error = %e, "failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("received terminate signal, shutting down");
            }
            Err(e) => {
                error!(error = %e, "failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Render a handler error as `{ "error": message }` with its status code.
pub fn error_response(err: &HandlerError) -> Response {
    let status = StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut response = (status, Json(json!({ "error": err.public_message() }))).into_response();
    if let HandlerError::RateLimited { retry_after_secs } = err {
        response
            .headers_mut()
            .insert(header::RETRY_AFTER, HeaderValue::from(*retry_after_secs));
    }
    response
}

/// Extract session variables from HTTP headers.
///
/// All headers are lowercased and included as session variables.
pub(crate) fn session_from_headers(headers: &HeaderMap) -> Session {
    let mut vars = HashMap::new();
    for (name, value) in headers.iter() {
        if let Ok(v) = value.to_str() {
            vars.insert(name.as_str().to_string(), v.to_string());
        }
    }
    Session::from_map(vars)
}

/// `GET /health`, returning `{ "ok": true, "primary": ..., "commands": [...] }`.
async fn health_handler(State(state): State<AppState>) -> Response {
    let service = state.service.clone();
    let primary = tokio::task::spawn_blocking(move || service.store().primary_status().to_string())
        .await
        .unwrap_or_else(|_| "unknown".to_string());
    let commands = state.service.commands();
    Json(json!({ "ok": true, "primary": primary, "commands": commands })).into_response()
}

async fn query_command(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
    command: &'static str,
) -> Response {
    let input: Map<String, Value> = query
        .into_iter()
        .map(|(k, v)| (k, Value::String(v)))
        .collect();
    respond(state.dispatch(command, Value::Object(input), session_from_headers(&headers)).await)
}

async fn body_command(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
    command: &'static str,
) -> Response {
    let input = if body.iter().all(u8::is_ascii_whitespace) {
        Value::Object(Map::new())
    } else {
        match serde_json::from_slice::<Value>(&body) {
            Ok(value) => value,
            Err(e) => return error_response(&HandlerError::from(e)),
        }
    };
    respond(state.dispatch(command, input, session_from_headers(&headers)).await)
}

fn respond(result: Result<Value, HandlerError>) -> Response {
    match result {
        Ok(value) => (StatusCode::OK, Json(value)).into_response(),
        Err(e) => error_response(&e),
    }
}
