//! Shared response cache over redis.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use super::kv::{KvBackend, RedisKv};
use crate::domain::models::{CacheKey, CacheStats};
use crate::domain::ports::ResponseCache;

/// Default entry lifetime.
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

/// Shared TTL cache over a [`KvBackend`].
///
/// Physical keys are `agent:<agent>:<hex(user_id)>:<short_hash>`. The user
/// segment is hex-encoded so ids containing `:` or glob characters stay
/// inside their own invalidation pattern. Without a backend (never
/// connected) every operation is a no-op.
pub struct RemoteResponseCache {
    backend: Option<Arc<dyn KvBackend>>,
    default_ttl: Duration,
    hits: AtomicU64,
    misses: AtomicU64,
    writes: AtomicU64,
}

impl RemoteResponseCache {
    /// Cache over `backend`; `None` builds a disconnected no-op cache.
    pub fn new(backend: Option<Arc<dyn KvBackend>>, default_ttl: Duration) -> Self {
        Self {
            backend,
            default_ttl,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            writes: AtomicU64::new(0),
        }
    }

    /// Connect to redis at `url`; on failure the cache is built disconnected.
    pub async fn connect(url: &str, default_ttl: Duration) -> Self {
        match RedisKv::connect(url).await {
            Ok(kv) => {
                debug!("remote response cache connected");
                Self::new(Some(Arc::new(kv)), default_ttl)
            }
            Err(e) => {
                warn!(error = %e, "remote cache unavailable, caching disabled");
                Self::new(None, default_ttl)
            }
        }
    }

    /// Whether a backend was attached at construction.
    pub const fn is_connected(&self) -> bool {
        self.backend.is_some()
    }

    /// Backend key for `key`.
    pub fn physical_key(key: &CacheKey) -> String {
        format!(
            "agent:{}:{}:{}",
            key.agent_name,
            user_segment(&key.user_id),
            key.short_hash()
        )
    }

    fn user_pattern(user_id: &str) -> String {
        format!("agent:*:{}:*", user_segment(user_id))
    }

    fn miss(&self) -> Option<Value> {
        self.misses.fetch_add(1, Ordering::Relaxed);
        None
    }
}

fn user_segment(user_id: &str) -> String {
    hex::encode(user_id.as_bytes())
}

#[async_trait]
impl ResponseCache for RemoteResponseCache {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn get(&self, key: &CacheKey) -> Option<Value> {
        let Some(backend) = &self.backend else {
            return self.miss();
        };
        let physical = Self::physical_key(key);

        match backend.get(&physical).await {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(value) => {
                    self.hits.fetch_add(1, Ordering::Relaxed);
                    Some(value)
                }
                Err(e) => {
                    warn!(key = %physical, error = %e, "corrupt remote cache entry");
                    self.miss()
                }
            },
            Ok(None) => self.miss(),
            Err(e) => {
                warn!(key = %physical, error = %e, "remote cache read failed");
                self.miss()
            }
        }
    }

    async fn set(&self, key: &CacheKey, value: &Value, ttl: Option<Duration>) {
        let Some(backend) = &self.backend else {
            return;
        };
        let physical = Self::physical_key(key);
        let ttl = ttl.unwrap_or(self.default_ttl);

        match backend.set_ex(&physical, &value.to_string(), ttl).await {
            Ok(()) => {
                self.writes.fetch_add(1, Ordering::Relaxed);
                debug!(key = %physical, ttl_secs = ttl.as_secs(), "remote cache write");
            }
            Err(e) => warn!(key = %physical, error = %e, "remote cache write failed"),
        }
    }

    async fn invalidate_user(&self, user_id: &str) -> usize {
        let Some(backend) = &self.backend else {
            return 0;
        };
        match backend.delete_matching(&Self::user_pattern(user_id)).await {
            Ok(removed) => {
                debug!(user_id, removed, "invalidated remote cache entries");
                removed
            }
            Err(e) => {
                warn!(user_id, error = %e, "remote cache invalidation failed");
                0
            }
        }
    }

    fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            writes: self.writes.load(Ordering::Relaxed),
        }
    }
}
