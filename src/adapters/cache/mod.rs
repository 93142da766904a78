//! Response cache adapters.
//!
//! - `FileResponseCache`: durable, one JSON file per entry
//! - `RemoteResponseCache`: shared TTL cache over a key/value backend
//! - `NullResponseCache`: caching disabled

pub mod file_cache;
pub mod kv;
pub mod null_cache;
pub mod remote_cache;

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

pub use file_cache::FileResponseCache;
pub use kv::{InMemoryKv, KvBackend, RedisKv};
pub use null_cache::NullResponseCache;
pub use remote_cache::RemoteResponseCache;

use crate::domain::models::config::{CacheBackend, CacheConfig};
use crate::domain::ports::ResponseCache;

/// Build the response cache selected by configuration.
///
/// A remote backend without a `redis_url`, or one that cannot connect,
/// degrades to a disconnected no-op cache.
pub async fn build_response_cache(config: &CacheConfig) -> Arc<dyn ResponseCache> {
    let ttl = Duration::from_secs(config.default_ttl_secs);
    let cache: Arc<dyn ResponseCache> = match config.backend {
        CacheBackend::Local => Arc::new(FileResponseCache::new(&config.local_dir, Some(ttl))),
        CacheBackend::Remote => match config.redis_url.as_deref() {
            Some(url) => Arc::new(RemoteResponseCache::connect(url, ttl).await),
            None => {
                warn!("remote cache selected without redis_url, caching disabled");
                Arc::new(RemoteResponseCache::new(None, ttl))
            }
        },
        CacheBackend::Disabled => Arc::new(NullResponseCache::new()),
    };
    info!(backend = cache.name(), ttl_secs = config.default_ttl_secs, "response cache ready");
    cache
}
