//! Process-local fixed-window rate limiting keyed by client address.

pub mod middleware;

pub use middleware::enforce_rate_limit;

use std::{
    collections::HashMap,
    time::{Duration, Instant},
};
use tokio::sync::Mutex;

use crate::config::RateLimitConfig;

/// Smallest table size that triggers a sweep of expired windows.
const PRUNE_THRESHOLD: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allowed { remaining: u32 },
    Denied { retry_after: Duration },
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allowed { .. })
    }
}

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    used: u32,
}

#[derive(Debug)]
struct WindowTable {
    entries: HashMap<String, Window>,
    /// After each sweep this moves to twice the surviving size, so a table
    /// full of live windows is not rescanned on every consume.
    next_prune: usize,
}

impl WindowTable {
    fn new() -> Self {
        Self {
            entries: HashMap::new(),
            next_prune: PRUNE_THRESHOLD,
        }
    }

    fn prune_if_due(&mut self, now: Instant, window: Duration) {
        if self.entries.len() < self.next_prune {
            return;
        }
        self.entries
            .retain(|_, w| now.duration_since(w.started) < window);
        self.next_prune = PRUNE_THRESHOLD.max(self.entries.len() * 2);
    }
}

/// At most `capacity` permits per key per window. The window opens on the
/// first request seen for a key and is not extended by later ones.
pub struct FixedWindowLimiter {
    capacity: u32,
    window: Duration,
    windows: Mutex<WindowTable>,
}

impl FixedWindowLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            capacity: config.capacity,
            window: config.window,
            windows: Mutex::new(WindowTable::new()),
        }
    }

    pub async fn consume(&self, key: &str) -> Decision {
        self.consume_at(key, Instant::now()).await
    }

    /// Check and increment happen under one lock acquisition, so concurrent
    /// requests for the same key can never be over-admitted.
    pub(crate) async fn consume_at(&self, key: &str, now: Instant) -> Decision {
        let mut table = self.windows.lock().await;
        table.prune_if_due(now, self.window);

        let entry = table.entries.entry(key.to_string()).or_insert(Window {
            started: now,
            used: 0,
        });

        let elapsed = now.duration_since(entry.started);
        if elapsed >= self.window {
            *entry = Window {
                started: now,
                used: 0,
            };
        }

        if entry.used >= self.capacity {
            return Decision::Denied {
                retry_after: self.window.saturating_sub(now.duration_since(entry.started)),
            };
        }

        entry.used += 1;
        Decision::Allowed {
            remaining: self.capacity - entry.used,
        }
    }

    #[cfg(test)]
    async fn tracked_keys(&self) -> usize {
        self.windows.lock().await.entries.len()
    }

    #[cfg(test)]
    async fn next_prune(&self) -> usize {
        self.windows.lock().await.next_prune
    }
}
