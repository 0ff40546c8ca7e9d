use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use dashmap::DashMap;
use parking_lot::Mutex;
use tokio::time::sleep;

/// One caller's window. `last_seen` drives eviction of idle entries.
#[derive(Debug)]
struct FixedWindow {
    window_start: Instant,
    count: u64,
    last_seen: Instant,
}

impl FixedWindow {
    fn new() -> Self {
        let now = Instant::now();
        Self {
            window_start: now,
            count: 0,
            last_seen: now,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RateDecision {
    pub allowed: bool,
    pub remaining: u64,
    pub retry_after_secs: u64,
}

/// In-process rate limiter keyed by caller address (or any caller-supplied
/// key, so a constant key produces a service-wide ceiling). One store per
/// limit; requests against different stores are independent.
#[derive(Clone)]
pub struct RateLimiterStore {
    map: Arc<DashMap<String, Arc<Mutex<FixedWindow>>>>,
    limit: u64,
    window: Duration,
}

impl RateLimiterStore {
    pub fn new(limit: u64, window: Duration) -> Self {
        let store = Self {
            map: Arc::new(DashMap::new()),
            limit,
            window,
        };

        // Evict entries idle for two full windows.
        {
            let map = store.map.clone();
            let ttl = window * 2;
            tokio::spawn(async move {
                let interval = Duration::from_secs(30);
                loop {
                    sleep(interval).await;
                    let now = Instant::now();
                    let stale: Vec<String> = map
                        .iter()
                        .filter_map(|entry| {
                            let window = entry.value().lock();
                            if now.duration_since(window.last_seen) > ttl {
                                Some(entry.key().clone())
                            } else {
                                None
                            }
                        })
                        .collect();

                    for key in stale {
                        map.remove(&key);
                    }
                }
            });
        }

        store
    }

    pub fn check(&self, key: &str) -> RateDecision {
        let entry = self.entry(key);
        let mut window = entry.lock();
        let now = Instant::now();
        window.last_seen = now;

        if now.duration_since(window.window_start) >= self.window {
            window.window_start = now;
            window.count = 0;
        }

        if window.count < self.limit {
            window.count += 1;
            RateDecision {
                allowed: true,
                remaining: self.limit - window.count,
                retry_after_secs: 0,
            }
        } else {
            let elapsed = now.duration_since(window.window_start);
            let retry = self.window.saturating_sub(elapsed).as_secs().max(1);
            RateDecision {
                allowed: false,
                remaining: 0,
                retry_after_secs: retry,
            }
        }
    }

    fn entry(&self, key: &str) -> Arc<Mutex<FixedWindow>> {
        if let Some(existing) = self.map.get(key) {
            return existing.clone();
        }
        match self.map.entry(key.to_string()) {
            dashmap::mapref::entry::Entry::Occupied(entry) => entry.get().clone(),
            dashmap::mapref::entry::Entry::Vacant(entry) => {
                let window = Arc::new(Mutex::new(FixedWindow::new()));
                entry.insert(window.clone());
                window
            }
        }
    }
}
