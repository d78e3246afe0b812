//! Raw-feeding assistant chat.
//!
//! Requests are validated here; the HTTP route rate-limits the caller and
//! streams the completion back from an OpenAI-compatible API.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::api::HandlerError;
use crate::domain::Pet;

#[cfg(feature = "http")]
mod client;
#[cfg(feature = "http")]
mod route;

#[cfg(feature = "http")]
pub use client::{ChatClient, ChatClientError, DEFAULT_BASE_URL, DEFAULT_MODEL};
#[cfg(feature = "http")]
pub use route::{caller_identity, chat_handler, RATE_LIMIT_REMAINING_HEADER};

pub const MAX_MESSAGES: usize = 50;

pub const SYSTEM_PROMPT: &str = "You are a raw-feeding assistant for dog and cat owners. \
Answer questions about species-appropriate raw diets: meat, bone, and organ ratios, \
portion sizes by body weight, transitioning from kibble, food safety, and sourcing. \
Keep answers practical. For symptoms of illness, recommend a veterinarian.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    /// One of the caller's pets to tailor the answer to.
    #[serde(default)]
    pub pet_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatError {
    #[error("at least one message is required")]
    NoMessages,
    #[error("too many messages: {0} (max 50)")]
    TooManyMessages(usize),
    #[error("message {0} is empty")]
    EmptyMessage(usize),
}

impl From<ChatError> for HandlerError {
    fn from(err: ChatError) -> Self {
        HandlerError::Invalid(err.to_string())
    }
}

impl ChatRequest {
    pub fn validate(&self) -> Result<(), ChatError> {
        if self.messages.is_empty() {
            return Err(ChatError::NoMessages);
        }
        if self.messages.len() > MAX_MESSAGES {
            return Err(ChatError::TooManyMessages(self.messages.len()));
        }
        if let Some(index) = self.messages.iter().position(|m| m.content.trim().is_empty()) {
            return Err(ChatError::EmptyMessage(index));
        }
        Ok(())
    }
}

/// System prompt addendum describing `pet`.
pub fn pet_context(pet: &Pet, today: NaiveDate) -> String {
    format!(
        "The owner is asking about {}, a {}-year-old {} {} weighing {} kg.",
        pet.name,
        pet.age_years(today),
        pet.breed,
        pet.species,
        pet.weight
    )
}
