//! OpenAI-compatible streaming chat completions.

use std::time::Duration;

use serde_json::{json, Value};
use thiserror::Error;
use tracing::debug;

use super::{ChatMessage, SYSTEM_PROMPT};
use crate::api::HandlerError;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum ChatClientError {
    #[error("chat request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("chat upstream returned {status}: {body}")]
    Status { status: u16, body: String },
}

impl From<ChatClientError> for HandlerError {
    fn from(err: ChatClientError) -> Self {
        HandlerError::Upstream(err.to_string())
    }
}

pub struct ChatClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl ChatClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self, ChatClientError> {
        // Only the connect phase is bounded; a streamed answer may run long.
        let http = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// The request body sent upstream: the system prompt (plus any extra
    /// context) followed by the conversation.
    pub fn completion_body(&self, messages: &[ChatMessage], context: Option<&str>) -> Value {
        let system = match context {
            Some(context) => format!("{}\n\n{}", SYSTEM_PROMPT, context),
            None => SYSTEM_PROMPT.to_string(),
        };
        let mut all = vec![json!({ "role": "system", "content": system })];
        all.extend(messages.iter().map(|m| json!(m)));

        json!({
            "model": self.model,
            "stream": true,
            "messages": all,
        })
    }

    /// Start a streamed completion. The returned response body is the
    /// upstream server-sent event stream.
    pub async fn stream(
        &self,
        messages: &[ChatMessage],
        context: Option<&str>,
    ) -> Result<reqwest::Response, ChatClientError> {
        let url = format!("{}/chat/completions", self.base_url);
        debug!(url = %url, model = %self.model, messages = messages.len(), "starting chat completion");

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&self.completion_body(messages, context))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChatClientError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}
