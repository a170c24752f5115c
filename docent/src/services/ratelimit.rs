use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Instant;

const WINDOW_SECS: u64 = 60;

/// Entry cap before stale windows are pruned on the write path.
const PRUNE_THRESHOLD: usize = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    Allowed,
    Limited { retry_after_secs: u64 },
}

struct WindowState {
    count: u32,
    window_start: Instant,
}

/// Fixed-window request counter keyed by client identity.
///
/// Counters live in this process only; a multi-instance deployment rate
/// limits per instance.
#[derive(Clone)]
pub struct RateLimiter {
    windows: Arc<Mutex<HashMap<String, WindowState>>>,
    limit_per_minute: u32,
    enabled: bool,
}

impl RateLimiter {
    pub fn new(limit_per_minute: u32, enabled: bool) -> Self {
        Self {
            windows: Arc::new(Mutex::new(HashMap::new())),
            limit_per_minute,
            enabled,
        }
    }

    /// Count a request against the client's current window.
    ///
    /// A disabled limiter or a zero limit always allows.
    pub fn check(&self, client: &str) -> RateDecision {
        self.check_at(client, Instant::now())
    }

    fn check_at(&self, client: &str, now: Instant) -> RateDecision {
        if !self.enabled || self.limit_per_minute == 0 {
            return RateDecision::Allowed;
        }

        let mut windows = self.windows.lock().unwrap();

        if windows.len() > PRUNE_THRESHOLD {
            windows.retain(|_, state| {
                now.duration_since(state.window_start).as_secs() < WINDOW_SECS
            });
        }

        let state = windows.entry(client.to_string()).or_insert(WindowState {
            count: 0,
            window_start: now,
        });

        let elapsed = now.duration_since(state.window_start).as_secs();
        if elapsed >= WINDOW_SECS {
            state.count = 0;
            state.window_start = now;
        }

        if state.count < self.limit_per_minute {
            state.count += 1;
            RateDecision::Allowed
        } else {
            let elapsed = now.duration_since(state.window_start).as_secs();
            RateDecision::Limited {
                retry_after_secs: WINDOW_SECS.saturating_sub(elapsed).max(1),
            }
        }
    }
}
