use std::{
    collections::HashMap,
    sync::Mutex,
    time::{Duration, Instant},
};

use crate::protocol::{ApiError, ApiResult};

struct Window {
    started: Instant,
    count: u32,
}

/// Fixed-window request counter keyed by client identity.
///
/// A client's window opens on its first request and lasts `window`; once it
/// has elapsed the next request opens a fresh window with a zeroed count.
/// Expired windows are dropped whenever the limiter is consulted.
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    windows: Mutex<HashMap<String, Window>>,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            windows: Mutex::new(HashMap::new()),
        }
    }

    pub fn check(&self, key: &str) -> ApiResult<()> {
        self.check_at(key, Instant::now())
    }

    pub fn check_at(&self, key: &str, now: Instant) -> ApiResult<()> {
        let mut windows = self
            .windows
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let period = self.window;
        windows.retain(|_, w| now.saturating_duration_since(w.started) < period);

        let entry = windows.entry(key.to_string()).or_insert(Window {
            started: now,
            count: 0,
        });
        if entry.count >= self.max_requests {
            log::warn!("rate limit reached for {}", key);
            return Err(ApiError::rate_limited(
                "Too many requests, please try again later",
            ));
        }
        entry.count += 1;

        Ok(())
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.windows
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}
