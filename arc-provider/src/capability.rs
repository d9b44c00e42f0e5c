/// Provider family a model key belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderFamily {
    OpenAi,
    Grok,
    Anthropic,
    Gemini,
    DeepSeek,
    OpenRouter,
}

impl ProviderFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderFamily::OpenAi => "openai",
            ProviderFamily::Grok => "grok",
            ProviderFamily::Anthropic => "anthropic",
            ProviderFamily::Gemini => "gemini",
            ProviderFamily::DeepSeek => "deepseek",
            ProviderFamily::OpenRouter => "openrouter",
        }
    }

    /// Whether this family supports server-side stored reasoning reloaded
    /// via a response id — the single consolidated predicate that replaces
    /// the historical `isReasoningModel` / `supportsResponses` overlap.
    pub fn supports_response_chaining(&self) -> bool {
        matches!(self, ProviderFamily::OpenAi | ProviderFamily::Grok)
    }
}

/// Per-model capability facts, resolved once from a model key and consulted
/// by prompt assembly, adapters, and the orchestrator alike — the single
/// source of truth for what a model supports.
#[derive(Debug, Clone, Copy)]
pub struct ModelCapabilities {
    pub family: ProviderFamily,
    /// True for models that spend hidden "reasoning tokens" (o-series,
    /// gpt-5 family, grok-4 reasoning variants, claude extended thinking).
    pub is_reasoning_model: bool,
    /// True when the provider accepts a JSON-schema-constrained structured
    /// output request at all (independent of whether that schema must be
    /// relaxed — see `arc-xai`'s fallback).
    pub supports_structured_output: bool,
}

/// Resolve capabilities for a model key. Model keys may carry a routing
/// prefix (`openrouter/`, `grover-`) which is stripped before matching.
pub fn capabilities_for(model_key: &str) -> ModelCapabilities {
    let stripped = model_key
        .strip_prefix("openrouter/")
        .or_else(|| model_key.strip_prefix("grover-"))
        .unwrap_or(model_key);
    let lower = stripped.to_ascii_lowercase();

    if model_key.starts_with("openrouter/") {
        return ModelCapabilities {
            family: ProviderFamily::OpenRouter,
            is_reasoning_model: lower.contains("o1")
                || lower.contains("o3")
                || lower.contains("o4")
                || lower.contains("reasoning"),
            supports_structured_output: false,
        };
    }

    if lower.contains("gpt") || lower.contains("o3") || lower.contains("o4") {
        return ModelCapabilities {
            family: ProviderFamily::OpenAi,
            is_reasoning_model: lower.starts_with("o3")
                || lower.starts_with("o4")
                || lower.contains("gpt-5"),
            supports_structured_output: true,
        };
    }
    if lower.contains("grok") {
        return ModelCapabilities {
            family: ProviderFamily::Grok,
            is_reasoning_model: lower.contains("reasoning") || lower.contains("grok-4"),
            supports_structured_output: true,
        };
    }
    if lower.contains("claude") {
        return ModelCapabilities {
            family: ProviderFamily::Anthropic,
            is_reasoning_model: lower.contains("thinking") || lower.contains("opus"),
            supports_structured_output: false,
        };
    }
    if lower.contains("gemini") {
        return ModelCapabilities {
            family: ProviderFamily::Gemini,
            is_reasoning_model: lower.contains("thinking") || lower.contains("pro"),
            supports_structured_output: true,
        };
    }
    if lower.contains("deepseek") {
        return ModelCapabilities {
            family: ProviderFamily::DeepSeek,
            is_reasoning_model: lower.contains("reasoner") || lower.contains("r1"),
            supports_structured_output: false,
        };
    }

    // Unknown falls back to OpenRouter-compatible behavior rather than
    // panicking; the service factory is responsible for rejecting truly
    // unrecognized model keys at the HTTP boundary.
    ModelCapabilities {
        family: ProviderFamily::OpenRouter,
        is_reasoning_model: false,
        supports_structured_output: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatches_openai() {
        assert_eq!(
            capabilities_for("gpt-5-2025-08-07").family,
            ProviderFamily::OpenAi
        );
    }

    #[test]
    fn dispatches_grok() {
        assert_eq!(
            capabilities_for("grok-4-fast-reasoning").family,
            ProviderFamily::Grok
        );
    }

    #[test]
    fn dispatches_anthropic() {
        assert_eq!(
            capabilities_for("claude-opus-4").family,
            ProviderFamily::Anthropic
        );
    }

    #[test]
    fn openrouter_prefix_wins_over_substring() {
        let caps = capabilities_for("openrouter/anthropic/claude-3.5-sonnet");
        assert_eq!(caps.family, ProviderFamily::OpenRouter);
    }

    #[test]
    fn grover_prefix_is_stripped_before_matching() {
        let caps = capabilities_for("grover-gpt-5-nano");
        assert_eq!(caps.family, ProviderFamily::OpenAi);
    }

    #[test]
    fn only_openai_and_grok_chain_natively() {
        assert!(ProviderFamily::OpenAi.supports_response_chaining());
        assert!(ProviderFamily::Grok.supports_response_chaining());
        assert!(!ProviderFamily::Anthropic.supports_response_chaining());
        assert!(!ProviderFamily::Gemini.supports_response_chaining());
    }
}
