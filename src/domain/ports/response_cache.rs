//! Agent response cache port.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::models::{CacheKey, CacheStats};

/// Key/value store for structured agent results.
///
/// Implementations never fail: backend errors are logged and turned into a
/// miss on read and a no-op on write.
#[async_trait]
pub trait ResponseCache: Send + Sync {
    /// Backend label for logs.
    fn name(&self) -> &'static str;

    /// Cached value for `key`, or `None` on miss or error.
    async fn get(&self, key: &CacheKey) -> Option<Value>;

    /// Overwrite the entry for `key`. `None` uses the backend's default TTL.
    async fn set(&self, key: &CacheKey, value: &Value, ttl: Option<Duration>);

    /// Delete every entry belonging to `user_id`; returns how many were removed.
    async fn invalidate_user(&self, user_id: &str) -> usize;

    /// Counters since construction.
    fn stats(&self) -> CacheStats;
}
