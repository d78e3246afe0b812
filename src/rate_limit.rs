//! Fixed-window request limiter keyed by caller identity.
//!
//! State is process-local: replicas do not share counts, and a caller can
//! get up to twice the limit across a window boundary.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

pub const DEFAULT_MAX_REQUESTS: u32 = 10;
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    /// Requests left in the current window.
    pub remaining: u32,
    /// Time until the current window resets.
    pub reset_after: Duration,
}

struct Window {
    count: u32,
    resets_at: Instant,
}

pub struct FixedWindowLimiter {
    max_requests: u32,
    window: Duration,
    windows: Mutex<HashMap<String, Window>>,
}

impl Default for FixedWindowLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_REQUESTS, DEFAULT_WINDOW)
    }
}

impl FixedWindowLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            windows: Mutex::new(HashMap::new()),
        }
    }

    pub fn max_requests(&self) -> u32 {
        self.max_requests
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Count one request from `identifier` now.
    pub fn check(&self, identifier: &str) -> RateLimitDecision {
        self.check_at(identifier, Instant::now())
    }

    /// Count one request from `identifier` at `now`.
    ///
    /// No window, or an elapsed one, starts a new window at count 1.
    /// Otherwise the count is incremented and the request is denied once it
    /// exceeds the maximum.
    pub fn check_at(&self, identifier: &str, now: Instant) -> RateLimitDecision {
        let mut windows = self
            .windows
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let window = windows
            .entry(identifier.to_string())
            .or_insert_with(|| Window {
                count: 0,
                resets_at: now,
            });

        if now >= window.resets_at {
            window.count = 1;
            window.resets_at = now + self.window;
        } else {
            window.count = window.count.saturating_add(1);
        }

        RateLimitDecision {
            allowed: window.count <= self.max_requests,
            remaining: self.max_requests.saturating_sub(window.count),
            reset_after: window.resets_at.saturating_duration_since(now),
        }
    }

    /// Drop windows that have elapsed. Returns how many were removed.
    pub fn purge_expired(&self, now: Instant) -> usize {
        let mut windows = self
            .windows
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let before = windows.len();
        windows.retain(|_, window| window.resets_at > now);
        before - windows.len()
    }

    /// Number of identifiers currently tracked.
    pub fn tracked(&self) -> usize {
        self.windows
            .lock()
            .map(|windows| windows.len())
            .unwrap_or(0)
    }
}
