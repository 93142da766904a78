//! Response cache that never stores anything.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::models::{CacheKey, CacheStats};
use crate::domain::ports::ResponseCache;

/// Cache that stores nothing; every lookup is a miss.
#[derive(Debug, Default)]
pub struct NullResponseCache {
    misses: AtomicU64,
}

impl NullResponseCache {
    /// New cache with zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ResponseCache for NullResponseCache {
    fn name(&self) -> &'static str {
        "disabled"
    }

    async fn get(&self, _key: &CacheKey) -> Option<Value> {
        self.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    async fn set(&self, _key: &CacheKey, _value: &Value, _ttl: Option<Duration>) {}

    async fn invalidate_user(&self, _user_id: &str) -> usize {
        0
    }

    fn stats(&self) -> CacheStats {
        CacheStats {
            misses: self.misses.load(Ordering::Relaxed),
            ..CacheStats::default()
        }
    }
}
