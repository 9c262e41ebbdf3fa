//! Sliding-window rate limiting.
//!
//! Tracks request timestamps per client identifier in an explicitly
//! owned, lockable map. Idle identifiers are evicted lazily so the
//! map stays bounded without a background task.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// How often stale identifiers are swept
const CLEANUP_INTERVAL: Duration = Duration::from_secs(300);

/// Identifiers with no request newer than this are dropped
const MAX_IDLE: Duration = Duration::from_secs(3600);

/// Sliding-window rate limiter keyed by client identifier
#[derive(Debug)]
pub struct RateLimiter {
    state: Mutex<LimiterState>,
}

#[derive(Debug)]
struct LimiterState {
    windows: HashMap<String, VecDeque<Instant>>,
    last_cleanup: Instant,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(LimiterState {
                windows: HashMap::new(),
                last_cleanup: Instant::now(),
            }),
        }
    }

    /// Check whether a request is allowed, recording it if so.
    ///
    /// Returns `false` when `identifier` already made `max_requests`
    /// requests within the trailing `window`.
    pub fn check(&self, identifier: &str, max_requests: usize, window: Duration) -> bool {
        self.check_at(identifier, max_requests, window, Instant::now())
    }

    fn check_at(
        &self,
        identifier: &str,
        max_requests: usize,
        window: Duration,
        now: Instant,
    ) -> bool {
        let mut state = match self.state.lock() {
            Ok(state) => state,
            // A poisoned lock means a panic elsewhere; failing open
            // would silently disable limiting, so deny instead.
            Err(_) => return false,
        };

        if now.duration_since(state.last_cleanup) > CLEANUP_INTERVAL {
            let idle_cutoff = now.checked_sub(MAX_IDLE);
            state.windows.retain(|_, times| {
                times.retain(|t| idle_cutoff.map_or(true, |cutoff| *t > cutoff));
                !times.is_empty()
            });
            state.last_cleanup = now;
        }

        let cutoff = now.checked_sub(window);
        let times = state.windows.entry(identifier.to_string()).or_default();
        while let Some(front) = times.front() {
            if cutoff.map_or(false, |c| *front <= c) {
                times.pop_front();
            } else {
                break;
            }
        }

        if times.len() >= max_requests {
            return false;
        }

        times.push_back(now);
        true
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}
