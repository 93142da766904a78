//! `codementor cache`: response cache maintenance.

use anyhow::Result;
use clap::{Args, Subcommand};
use serde::Serialize;

use crate::adapters::cache::build_response_cache;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{CacheStats, Config};

/// Arguments for `cache`.
#[derive(Args, Debug)]
pub struct CacheArgs {
    /// Cache subcommand to run.
    #[command(subcommand)]
    pub command: CacheCommands,
}

/// Cache subcommands.
#[derive(Subcommand, Debug)]
pub enum CacheCommands {
    /// Delete every cached agent result for a user
    Invalidate {
        /// User ID
        #[arg(short, long)]
        user: String,
    },
    /// Show the configured backend and its counters for this process
    Stats,
}

/// Result of `cache invalidate`.
#[derive(Debug, Serialize)]
pub struct InvalidateOutput {
    /// Active backend name.
    pub backend: String,
    /// User whose entries were removed.
    pub user_id: String,
    /// Number of entries removed.
    pub removed: usize,
}

impl CommandOutput for InvalidateOutput {
    fn to_human(&self) -> String {
        format!(
            "Removed {} cached result(s) for {} from the {} cache.",
            self.removed, self.user_id, self.backend
        )
    }
}

/// Result of `cache stats`.
#[derive(Debug, Serialize)]
pub struct StatsOutput {
    /// Active backend name.
    pub backend: String,
    /// Counters since the cache was built.
    #[serde(flatten)]
    pub stats: CacheStats,
    /// Hits over lookups.
    pub hit_rate: f64,
}

impl CommandOutput for StatsOutput {
    fn to_human(&self) -> String {
        format!(
            "Backend: {}\nHits:    {}\nMisses:  {}\nWrites:  {}\nHit rate: {:.1}%",
            self.backend,
            self.stats.hits,
            self.stats.misses,
            self.stats.writes,
            self.hit_rate * 100.0
        )
    }
}

/// Run a cache subcommand.
pub async fn execute(args: CacheArgs, config: Config, json_mode: bool) -> Result<()> {
    let cache = build_response_cache(&config.cache).await;

    match args.command {
        CacheCommands::Invalidate { user } => {
            let removed = cache.invalidate_user(&user).await;
            let out = InvalidateOutput {
                backend: cache.name().to_string(),
                user_id: user,
                removed,
            };
            output(&out, json_mode);
        }
        CacheCommands::Stats => {
            let stats = cache.stats();
            let out = StatsOutput {
                backend: cache.name().to_string(),
                hit_rate: stats.hit_rate(),
                stats,
            };
            output(&out, json_mode);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_json_is_flat() {
        let out = StatsOutput {
            backend: "local".to_string(),
            stats: CacheStats {
                hits: 3,
                misses: 1,
                writes: 1,
            },
            hit_rate: 0.75,
        };
        let json = out.to_json();
        assert_eq!(json["hits"], 3);
        assert_eq!(json["backend"], "local");
        assert!(out.to_human().contains("Hit rate: 75.0%"));
    }
}
