//! Cache keys and counters.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Content-addressed key for one cached agent result.
///
/// `digest` is the 64-char lowercase SHA-256 hex produced by the cache key
/// builder. Agent name and user id travel alongside so backends can namespace
/// physical keys and invalidate per user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
    /// Agent that produced the value.
    pub agent_name: String,
    /// Owner of the submission.
    pub user_id: String,
    /// SHA-256 hex of the normalized payload.
    pub digest: String,
}

impl CacheKey {
    /// Key from its parts.
    pub fn new(
        agent_name: impl Into<String>,
        user_id: impl Into<String>,
        digest: impl Into<String>,
    ) -> Self {
        Self {
            agent_name: agent_name.into(),
            user_id: user_id.into(),
            digest: digest.into(),
        }
    }

    /// Fold a personalization fingerprint into the digest.
    ///
    /// An empty fingerprint leaves the key unchanged, so users without history
    /// share entries with the unpersonalized key.
    #[must_use]
    pub fn personalized(&self, fingerprint: &str) -> Self {
        if fingerprint.is_empty() {
            return self.clone();
        }
        let mut hasher = Sha256::new();
        hasher.update(self.digest.as_bytes());
        hasher.update(b":");
        hasher.update(fingerprint.as_bytes());
        Self {
            agent_name: self.agent_name.clone(),
            user_id: self.user_id.clone(),
            digest: hex::encode(hasher.finalize()),
        }
    }

    /// First 16 hex chars of SHA-256 over the digest.
    pub fn short_hash(&self) -> String {
        let hashed = hex::encode(Sha256::digest(self.digest.as_bytes()));
        hashed[..16].to_string()
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.agent_name, self.user_id, self.digest)
    }
}

/// Aggregate counters exposed by every response cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Lookups that returned a value.
    pub hits: u64,
    /// Lookups that returned nothing.
    pub misses: u64,
    /// Successful stores.
    pub writes: u64,
}

impl CacheStats {
    /// Hits over lookups, `0.0` before any lookup.
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        let lookups = self.hits + self.misses;
        if lookups == 0 {
            0.0
        } else {
            self.hits as f64 / lookups as f64
        }
    }
}
