//! Domain errors for the feedback pipeline.
//!
//! Only configuration errors are allowed to halt the process. Everything
//! declared here is recovered below the workflow boundary and turned into a
//! degraded, well-typed result.

use std::time::Duration;

use thiserror::Error;

/// Errors raised by chat-completion providers and the failover facade.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Every configured provider is inside its cool-down window.
    #[error("All LLM providers are rate limited; retry after {}s", retry_after.as_secs())]
    AllProvidersLimited {
        /// Shortest remaining cool-down across the limited providers.
        retry_after: Duration,
    },

    /// Provider answered with HTTP 429 or an equivalent quota signal.
    #[error("{provider}: rate limit exceeded (HTTP 429): {message}")]
    RateLimited {
        /// Provider label.
        provider: String,
        /// Response body or error text.
        message: String,
    },

    /// Provider returned a non-success status that is not a rate limit.
    #[error("{provider}: HTTP {status}: {body}")]
    Http {
        /// Provider label.
        provider: String,
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },

    /// Transport failure (connect, timeout, TLS).
    #[error("{provider}: network error: {message}")]
    Network {
        /// Provider label.
        provider: String,
        /// Transport error text.
        message: String,
    },

    /// Provider answered 2xx but the body was unusable.
    #[error("{provider}: invalid response: {message}")]
    InvalidResponse {
        /// Provider label.
        provider: String,
        /// What was wrong with the body.
        message: String,
    },

    /// Blocking call path could not build its runtime.
    #[error("Runtime error: {0}")]
    Runtime(String),
}

impl LlmError {
    /// Returns true if this error is worth retrying against the same provider.
    ///
    /// Rate limits are not transient here; failover routing owns them.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network { .. } => true,
            Self::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Best-effort rate-limit classification over the error text.
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, Self::RateLimited { .. } | Self::AllProvidersLimited { .. })
            || looks_like_rate_limit(&self.to_string())
    }
}

/// Heuristic classifier for rate-limit style failures.
///
/// Matches whole phrases (HTTP 429, "rate limit", "too many requests",
/// "quota", "resource exhausted") in the lowercase message. Bare "rate" or
/// "limit" are not enough: "generate" and "time limit exceeded" are
/// ordinary failures.
pub fn looks_like_rate_limit(message: &str) -> bool {
    const NEEDLES: [&str; 8] = [
        "429",
        "rate limit",
        "rate_limit",
        "ratelimit",
        "too many requests",
        "quota",
        "resource exhausted",
        "resource_exhausted",
    ];
    let lower = message.to_lowercase();
    NEEDLES.iter().any(|needle| lower.contains(needle))
}

/// Errors produced while turning raw model text into a typed agent output.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Model output contained no `{...}` object.
    #[error("No JSON object found in model output")]
    NoJsonObject,

    /// Object did not deserialize into the target type.
    #[error("JSON does not match expected schema: {0}")]
    Deserialize(#[from] serde_json::Error),

    /// A field parsed but failed a range or content check.
    #[error("Field '{field}' failed validation: {reason}")]
    Invalid {
        /// Offending field.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}

impl SchemaError {
    /// Shorthand for a field-level validation failure.
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_heuristic() {
        assert!(looks_like_rate_limit("HTTP 429 Too Many Requests"));
        assert!(looks_like_rate_limit("Rate limit reached for model"));
        assert!(looks_like_rate_limit("You exceeded your current quota"));
        assert!(looks_like_rate_limit("RESOURCE_EXHAUSTED"));
        assert!(looks_like_rate_limit("resource exhausted: try later"));
        assert!(!looks_like_rate_limit("connection refused"));
        assert!(!looks_like_rate_limit("invalid api key"));
    }

    #[test]
    fn test_rate_limit_heuristic_ignores_embedded_words() {
        assert!(!looks_like_rate_limit("failed to generate response"));
        assert!(!looks_like_rate_limit("moderate load on separate worker"));
        assert!(!looks_like_rate_limit("Time Limit Exceeded on test 3"));
        assert!(looks_like_rate_limit("error code: rate_limit_exceeded"));
        assert!(looks_like_rate_limit("Too Many Requests"));

        let generic = LlmError::Http {
            provider: "primary".to_string(),
            status: 500,
            body: "could not generate a completion".to_string(),
        };
        assert!(!generic.is_rate_limit());
    }

    #[test]
    fn test_transient_classification() {
        let server = LlmError::Http {
            provider: "primary".to_string(),
            status: 503,
            body: "unavailable".to_string(),
        };
        assert!(server.is_transient());

        let client = LlmError::Http {
            provider: "primary".to_string(),
            status: 400,
            body: "bad request".to_string(),
        };
        assert!(!client.is_transient());

        let limited = LlmError::RateLimited {
            provider: "primary".to_string(),
            message: "slow down".to_string(),
        };
        assert!(!limited.is_transient());
        assert!(limited.is_rate_limit());
    }

    #[test]
    fn test_all_providers_limited_message() {
        let err = LlmError::AllProvidersLimited {
            retry_after: Duration::from_secs(42),
        };
        assert_eq!(
            err.to_string(),
            "All LLM providers are rate limited; retry after 42s"
        );
    }
}
