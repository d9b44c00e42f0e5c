/// Settings for the OpenRouter chat-completions adapter, shaped after
/// `llm-kit-openai-compatible::OpenAICompatibleProviderSettings`.
#[derive(Debug, Clone, Default)]
pub struct OpenRouterSettings {
    /// Defaults to `https://openrouter.ai/api/v1`.
    pub base_url: Option<String>,
    /// Falls back to `userApiKey` per call, then `OPENROUTER_API_KEY`.
    pub api_key: Option<String>,
}

impl OpenRouterSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn resolved_base_url(&self) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| "https://openrouter.ai/api/v1".to_string())
            .trim_end_matches('/')
            .to_string()
    }

    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key.clone().or_else(|| std::env::var("OPENROUTER_API_KEY").ok())
    }
}

/// Strips the `openrouter/` routing prefix before the model id is sent
/// upstream — OpenRouter's own API doesn't know about the prefix the
/// service factory dispatch table uses to route here.
pub fn strip_routing_prefix(model_key: &str) -> &str {
    model_key.strip_prefix("openrouter/").unwrap_or(model_key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_openrouter_prefix() {
        assert_eq!(strip_routing_prefix("openrouter/anthropic/claude-3.5-sonnet"), "anthropic/claude-3.5-sonnet");
    }

    #[test]
    fn leaves_unprefixed_model_alone() {
        assert_eq!(strip_routing_prefix("anthropic/claude-3.5-sonnet"), "anthropic/claude-3.5-sonnet");
    }
}
