//! Identifier minting and slugs.

use chrono::Utc;
use rand::distributions::Alphanumeric;
use rand::Rng;

/// Mint a fresh record id: `{prefix}_{unix_millis}_{6 random alphanumerics}`.
///
/// Uniqueness is probabilistic; callers never check for collisions.
pub fn new_id(prefix: &str) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(char::from)
        .collect();
    format!(
        "{}_{}_{}",
        prefix,
        Utc::now().timestamp_millis(),
        suffix.to_lowercase()
    )
}

/// Lowercase, ASCII-alphanumeric words joined by single hyphens.
pub fn slugify(text: &str) -> String {
    text.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(|word| word.to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}
