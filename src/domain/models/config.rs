//! Configuration model.

use serde::{Deserialize, Serialize};

/// Main configuration structure for codementor
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// LLM provider configuration
    #[serde(default)]
    pub llm: LlmConfig,

    /// Response cache configuration
    #[serde(default)]
    pub cache: CacheConfig,

    /// Workflow tuning and policies
    #[serde(default)]
    pub workflow: WorkflowConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Copy with every API key masked, for display.
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        copy.llm.primary.api_key = copy.llm.primary.api_key.as_deref().map(redact_secret);
        copy.llm.fallback.api_key = copy.llm.fallback.api_key.as_deref().map(redact_secret);
        copy
    }
}

/// Keep a short prefix of a secret and mask the rest.
pub fn redact_secret(secret: &str) -> String {
    let prefix: String = secret.chars().take(4).collect();
    format!("{prefix}***")
}

/// Connection settings for one OpenAI-compatible chat endpoint.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProviderConfig {
    /// API key; the provider is disabled when absent
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL up to (not including) `/chat/completions`
    pub base_url: String,

    /// Model identifier sent with every request
    pub model: String,
}

impl ProviderConfig {
    /// True when a non-blank credential is configured.
    pub fn has_credentials(&self) -> bool {
        self.api_key.as_deref().is_some_and(|key| !key.trim().is_empty())
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &self.api_key.as_deref().map(redact_secret))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

fn default_primary_provider() -> ProviderConfig {
    ProviderConfig {
        api_key: None,
        base_url: "https://api.groq.com/openai/v1".to_string(),
        model: "llama-3.3-70b-versatile".to_string(),
    }
}

fn default_fallback_provider() -> ProviderConfig {
    ProviderConfig {
        api_key: None,
        base_url: "https://generativelanguage.googleapis.com/v1beta/openai".to_string(),
        model: "gemini-2.0-flash".to_string(),
    }
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LlmConfig {
    /// Fast provider, tried first
    #[serde(default = "default_primary_provider")]
    pub primary: ProviderConfig,

    /// Reliable provider, used when the primary fails or cools down
    #[serde(default = "default_fallback_provider")]
    pub fallback: ProviderConfig,

    /// Per-request network timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retries for transient provider failures (5xx, network)
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Initial backoff delay in milliseconds
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    /// Maximum backoff delay in milliseconds
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,

    /// Primary cool-down after a rate-limit error
    #[serde(default = "default_primary_cooldown_secs")]
    pub primary_cooldown_secs: u64,

    /// Fallback cool-down after a rate-limit error
    #[serde(default = "default_fallback_cooldown_secs")]
    pub fallback_cooldown_secs: u64,
}

const fn default_timeout_secs() -> u64 {
    30
}

const fn default_max_retries() -> u32 {
    2
}

const fn default_initial_backoff_ms() -> u64 {
    500
}

const fn default_max_backoff_ms() -> u64 {
    5_000
}

const fn default_primary_cooldown_secs() -> u64 {
    60
}

const fn default_fallback_cooldown_secs() -> u64 {
    120
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            primary: default_primary_provider(),
            fallback: default_fallback_provider(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
            primary_cooldown_secs: default_primary_cooldown_secs(),
            fallback_cooldown_secs: default_fallback_cooldown_secs(),
        }
    }
}

/// Which response cache implementation to use
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// One JSON file per entry under `local_dir`
    #[default]
    Local,
    /// Redis with TTL, at `redis_url`
    Remote,
    /// No caching
    Disabled,
}

/// Response cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CacheConfig {
    /// Which response cache to build.
    #[serde(default)]
    pub backend: CacheBackend,

    /// Directory for the local file cache
    #[serde(default = "default_local_dir")]
    pub local_dir: String,

    /// Redis endpoint; remote caching is disabled when absent
    #[serde(default)]
    pub redis_url: Option<String>,

    /// Default entry lifetime in seconds
    #[serde(default = "default_ttl_secs")]
    pub default_ttl_secs: u64,
}

fn default_local_dir() -> String {
    ".codementor/cache".to_string()
}

const fn default_ttl_secs() -> u64 {
    3600
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackend::default(),
            local_dir: default_local_dir(),
            redis_url: None,
            default_ttl_secs: default_ttl_secs(),
        }
    }
}

/// When the mistake summary is written to memory
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryPolicy {
    /// Only for non-accepted verdicts.
    #[default]
    FailuresOnly,
    /// For every verdict.
    Always,
}

/// When the hint stage runs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HintPolicy {
    /// Only for non-accepted verdicts.
    #[default]
    FailuresOnly,
    /// For every verdict.
    Always,
}

/// Workflow tuning and policies
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct WorkflowConfig {
    /// Number of memory snippets retrieved per submission
    #[serde(default = "default_memory_k")]
    pub memory_k: usize,

    /// Character budget for the assembled agent context
    #[serde(default = "default_max_context_chars")]
    pub max_context_chars: usize,

    /// When to store the mistake summary.
    #[serde(default)]
    pub memory_policy: MemoryPolicy,

    /// When to run the hint stage.
    #[serde(default)]
    pub hint_policy: HintPolicy,

    /// Run learning and difficulty concurrently in the background workflow
    #[serde(default = "default_true")]
    pub parallel_fan_out: bool,
}

const fn default_memory_k() -> usize {
    3
}

const fn default_max_context_chars() -> usize {
    3500
}

const fn default_true() -> bool {
    true
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            memory_k: default_memory_k(),
            max_context_chars: default_max_context_chars(),
            memory_policy: MemoryPolicy::default(),
            hint_policy: HintPolicy::default(),
            parallel_fan_out: default_true(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rolling log files; stderr only when absent
    #[serde(default)]
    pub log_dir: Option<String>,

    /// File rotation: daily, hourly or never
    #[serde(default = "default_rotation")]
    pub rotation: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
            rotation: default_rotation(),
        }
    }
}
