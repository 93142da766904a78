//! Local file-backed response cache.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::models::{CacheKey, CacheStats};
use crate::domain::ports::ResponseCache;

/// On-disk entry wrapper.
#[derive(Debug, Serialize, Deserialize)]
struct CacheEnvelope {
    agent: String,
    user_id: String,
    created_at: DateTime<Utc>,
    #[serde(default)]
    expires_at: Option<DateTime<Utc>>,
    value: Value,
}

/// Durable cache storing one JSON file per key.
///
/// File names are `<agent>.<hex(user_id)>.<digest>.json`, so per-user
/// invalidation is a directory scan with no index to keep in sync.
pub struct FileResponseCache {
    dir: PathBuf,
    default_ttl: Option<Duration>,
    hits: AtomicU64,
    misses: AtomicU64,
    writes: AtomicU64,
}

impl FileResponseCache {
    /// Cache rooted at `dir`; `None` keeps entries until invalidated.
    pub fn new(dir: impl Into<PathBuf>, default_ttl: Option<Duration>) -> Self {
        Self {
            dir: dir.into(),
            default_ttl,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            writes: AtomicU64::new(0),
        }
    }

    /// Root directory of the cache files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file_name(key: &CacheKey) -> String {
        format!(
            "{}.{}.{}.json",
            key.agent_name,
            hex::encode(key.user_id.as_bytes()),
            key.digest
        )
    }

    fn path_for(&self, key: &CacheKey) -> PathBuf {
        self.dir.join(Self::file_name(key))
    }

    fn miss(&self) -> Option<Value> {
        self.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    async fn write_entry(&self, path: &Path, envelope: &CacheEnvelope) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let bytes = serde_json::to_vec(envelope)?;
        // Write-then-rename keeps readers from ever seeing a partial entry.
        let tmp = self.dir.join(format!(".tmp-{}", Uuid::new_v4()));
        tokio::fs::write(&tmp, bytes).await?;
        if let Err(e) = tokio::fs::rename(&tmp, path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e);
        }
        Ok(())
    }
}

#[async_trait]
impl ResponseCache for FileResponseCache {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn get(&self, key: &CacheKey) -> Option<Value> {
        let path = self.path_for(key);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return self.miss(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cache read failed");
                return self.miss();
            }
        };

        let envelope: CacheEnvelope = match serde_json::from_slice(&bytes) {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "corrupt cache entry");
                return self.miss();
            }
        };

        if envelope.expires_at.is_some_and(|at| at <= Utc::now()) {
            debug!(path = %path.display(), "cache entry expired");
            let _ = tokio::fs::remove_file(&path).await;
            return self.miss();
        }

        self.hits.fetch_add(1, Ordering::Relaxed);
        Some(envelope.value)
    }

    async fn set(&self, key: &CacheKey, value: &Value, ttl: Option<Duration>) {
        let path = self.path_for(key);
        let now = Utc::now();
        let expires_at = ttl
            .or(self.default_ttl)
            .and_then(|ttl| chrono::Duration::from_std(ttl).ok())
            .map(|ttl| now + ttl);

        let envelope = CacheEnvelope {
            agent: key.agent_name.clone(),
            user_id: key.user_id.clone(),
            created_at: now,
            expires_at,
            value: value.clone(),
        };

        match self.write_entry(&path, &envelope).await {
            Ok(()) => {
                self.writes.fetch_add(1, Ordering::Relaxed);
                debug!(path = %path.display(), "cache entry written");
            }
            Err(e) => warn!(path = %path.display(), error = %e, "cache write failed"),
        }
    }

    async fn invalidate_user(&self, user_id: &str) -> usize {
        let user_segment = hex::encode(user_id.as_bytes());
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return 0,
            Err(e) => {
                warn!(dir = %self.dir.display(), error = %e, "cache directory unreadable");
                return 0;
            }
        };

        let mut removed = 0;
        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    warn!(error = %e, "cache directory scan failed");
                    break;
                }
            };
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            let segments: Vec<&str> = name.split('.').collect();
            if segments.len() == 4 && segments[1] == user_segment && segments[3] == "json" {
                match tokio::fs::remove_file(entry.path()).await {
                    Ok(()) => removed += 1,
                    Err(e) => warn!(file = name, error = %e, "cache entry removal failed"),
                }
            }
        }

        debug!(user_id, removed, "invalidated local cache entries");
        removed
    }

    fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            writes: self.writes.load(Ordering::Relaxed),
        }
    }
}
