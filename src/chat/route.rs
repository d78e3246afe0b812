//! `POST /api/chat`

use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::Response;
use tracing::{debug, warn};

use super::{pet_context, ChatRequest};
use crate::api::{error_response, AppState, HandlerError, Session};
use crate::domain::Pet;
use crate::store::Scope;

pub const RATE_LIMIT_REMAINING_HEADER: &str = "x-ratelimit-remaining";

/// Who the limiter counts: the user id, else the forwarded client address,
/// else one shared anonymous bucket.
pub fn caller_identity(headers: &HeaderMap) -> String {
    let header_str = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };

    if let Some(user_id) = header_str(crate::api::USER_ID_HEADER) {
        return format!("user:{}", user_id);
    }
    if let Some(forwarded) = header_str("x-forwarded-for") {
        let first = forwarded.split(',').next().unwrap_or(forwarded).trim();
        return format!("ip:{}", first);
    }
    "anonymous".to_string()
}

pub async fn chat_handler(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    let identity = caller_identity(&headers);
    let decision = state.limiter.check(&identity);

    let mut response = if decision.allowed {
        match stream_reply(&state, &headers, &body).await {
            Ok(response) => response,
            Err(e) => error_response(&e),
        }
    } else {
        let reset = decision.reset_after;
        let retry_after_secs = (reset.as_secs() + u64::from(reset.subsec_nanos() > 0)).max(1);
        debug!(caller = %identity, retry_after_secs, "chat rate limit exceeded");
        error_response(&HandlerError::RateLimited { retry_after_secs })
    };

    response
        .headers_mut()
        .insert(RATE_LIMIT_REMAINING_HEADER, HeaderValue::from(decision.remaining));
    response
}

async fn stream_reply(state: &AppState, headers: &HeaderMap, body: &[u8]) -> Result<Response, HandlerError> {
    let request: ChatRequest = serde_json::from_slice(body)?;
    request.validate()?;

    let client = state
        .chat
        .clone()
        .ok_or_else(|| HandlerError::Unavailable("chat assistant is not configured".into()))?;

    let session = crate::api::session_from_headers(headers);
    let context = pet_prompt(state, &session, request.pet_id.clone()).await?;

    let upstream = client
        .stream(&request.messages, context.as_deref())
        .await
        .map_err(|e| {
            warn!(error = %e, "chat upstream failed");
            HandlerError::from(e)
        })?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/event-stream")
        .header(header::CACHE_CONTROL, "no-cache")
        .body(Body::from_stream(upstream.bytes_stream()))
        .map_err(|e| HandlerError::Internal(e.to_string()))
}

/// Prompt context for one of the caller's own pets. Unknown pets are ignored.
async fn pet_prompt(
    state: &AppState,
    session: &Session,
    pet_id: Option<String>,
) -> Result<Option<String>, HandlerError> {
    let (Some(pet_id), Some(user_id)) = (pet_id, session.user_id().map(str::to_string)) else {
        return Ok(None);
    };

    state
        .with_store(move |store| {
            let pet = store
                .collection::<Pet>(Scope::Global)
                .find(&pet_id)
                .filter(|pet| pet.user_id == user_id);
            Ok(pet.map(|pet| pet_context(&pet, crate::handlers::now().date_naive())))
        })
        .await
}
