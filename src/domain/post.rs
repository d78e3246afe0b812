use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{require, ValidationError};
use crate::ids::{new_id, slugify};
use crate::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    Published,
    Archived,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Record)]
#[serde(rename_all = "camelCase")]
#[record(collection = "posts", seed = "crate::domain::seed::welcome_posts")]
pub struct Post {
    pub id: String,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub excerpt: String,
    pub content: String,
    pub author_id: String,
    pub status: PostStatus,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

/// Creation payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPost {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub status: Option<PostStatus>,
}

const EXCERPT_CHARS: usize = 160;

impl Post {
    pub const PROTECTED: &'static [&'static str] =
        &["id", "authorId", "createdAt", "updatedAt", "publishedAt", "status"];

    pub fn new(author_id: &str, input: NewPost, now: DateTime<Utc>) -> Result<Self, ValidationError> {
        require("title", &input.title)?;
        require("content", &input.content)?;

        let slug = input
            .slug
            .map(|s| slugify(&s))
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| slugify(&input.title));
        if slug.is_empty() {
            return Err(ValidationError::invalid("slug", "title has no usable characters"));
        }

        let excerpt = input
            .excerpt
            .unwrap_or_else(|| input.content.chars().take(EXCERPT_CHARS).collect());

        let mut post = Post {
            id: new_id("post"),
            title: input.title.trim().to_string(),
            slug,
            excerpt,
            content: input.content,
            author_id: author_id.to_string(),
            status: PostStatus::Draft,
            tags: input.tags,
            created_at: now,
            updated_at: now,
            published_at: None,
        };
        post.set_status(input.status.unwrap_or(PostStatus::Draft), now);
        Ok(post)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require("title", &self.title)?;
        require("content", &self.content)?;
        require("slug", &self.slug)
    }

    /// Change status; the first transition to published stamps `published_at`.
    pub fn set_status(&mut self, status: PostStatus, now: DateTime<Utc>) {
        if status == PostStatus::Published && self.published_at.is_none() {
            self.published_at = Some(now);
        }
        self.status = status;
        self.updated_at = now;
    }

    /// Case-insensitive match on title, excerpt, content, or any tag.
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.title.to_lowercase().contains(&term)
            || self.excerpt.to_lowercase().contains(&term)
            || self.content.to_lowercase().contains(&term)
            || self.tags.iter().any(|t| t.to_lowercase().contains(&term))
    }
}
