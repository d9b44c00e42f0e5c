use thiserror::Error;

/// Errors an adapter's `analyze` call can fail with.
///
/// Retry policy lives with the caller (`arc-core`'s orchestrator), not here —
/// this type only reports what kind of failure occurred and whether retrying
/// is meaningful at all.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Missing or invalid API key (user-supplied BYOK or process env fallback).
    #[error("provider auth error for {provider}: {message}")]
    Auth { provider: String, message: String },

    /// HTTP 429. `retry_after` is the provider's `Retry-After` header, if sent.
    #[error("provider rate limit for {provider}: {message}")]
    RateLimit {
        provider: String,
        message: String,
        retry_after: Option<std::time::Duration>,
    },

    /// Structured-output request rejected by the provider (e.g. Grok's
    /// "Grammar too complex" 503).
    #[error("provider schema error for {provider}: {message}")]
    Schema { provider: String, message: String },

    /// Request exceeded the provider timeout budget: 30s for non-reasoning
    /// models, 15 minutes for reasoning models.
    #[error("provider timeout for {provider} after {elapsed_secs}s")]
    Timeout { provider: String, elapsed_secs: u64 },

    /// Response could not be understood as a valid API response at all
    /// (not the same as a JSON-payload parse failure — see `ParseError` in
    /// `arc-core`, which is one layer up and operates on already-successful
    /// HTTP responses).
    #[error("provider protocol error for {provider}: {message}")]
    Protocol { provider: String, message: String },

    /// A continuation was attempted with a `previous_response_id` that
    /// belongs to a different provider family than the one handling this
    /// call.
    #[error(
        "cannot continue chain for {requested_provider}: response id belongs to {owning_provider} — start a new chain"
    )]
    Mismatch {
        requested_provider: String,
        owning_provider: String,
    },

    /// Transport-level failure below the HTTP response (DNS, TLS, connection
    /// reset). Distinct from `Protocol` because it never reached a server.
    #[error("transport error calling {provider}: {source}")]
    Transport {
        provider: String,
        #[source]
        source: reqwest::Error,
    },
}

impl ProviderError {
    /// On 429 and 5xx: retryable with backoff. On auth/protocol/mismatch:
    /// fail-fast. On timeout: fail-fast.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ProviderError::RateLimit { .. })
            || matches!(self, ProviderError::Transport { .. })
    }

    pub fn retry_after(&self) -> Option<std::time::Duration> {
        match self {
            ProviderError::RateLimit { retry_after, .. } => *retry_after,
            _ => None,
        }
    }

    pub fn provider(&self) -> &str {
        match self {
            ProviderError::Auth { provider, .. }
            | ProviderError::RateLimit { provider, .. }
            | ProviderError::Schema { provider, .. }
            | ProviderError::Timeout { provider, .. }
            | ProviderError::Protocol { provider, .. }
            | ProviderError::Transport { provider, .. } => provider,
            ProviderError::Mismatch {
                requested_provider, ..
            } => requested_provider,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limit_is_retryable() {
        let e = ProviderError::RateLimit {
            provider: "openai".into(),
            message: "too many requests".into(),
            retry_after: Some(std::time::Duration::from_secs(5)),
        };
        assert!(e.is_retryable());
        assert_eq!(e.retry_after(), Some(std::time::Duration::from_secs(5)));
    }

    #[test]
    fn auth_error_is_not_retryable() {
        let e = ProviderError::Auth {
            provider: "anthropic".into(),
            message: "missing key".into(),
        };
        assert!(!e.is_retryable());
    }

    #[test]
    fn mismatch_names_both_providers() {
        let e = ProviderError::Mismatch {
            requested_provider: "grok".into(),
            owning_provider: "openai".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("grok"));
        assert!(msg.contains("openai"));
    }
}
