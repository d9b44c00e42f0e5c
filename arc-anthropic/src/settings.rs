/// Settings for configuring the Anthropic Messages adapter, mirroring
/// `llm-kit-anthropic::AnthropicProviderSettings`.
#[derive(Debug, Clone, Default)]
pub struct AnthropicSettings {
    /// Defaults to `https://api.anthropic.com/v1`.
    pub base_url: Option<String>,
    /// Sent via the `x-api-key` header. Falls back to `userApiKey` per call,
    /// then the `ANTHROPIC_API_KEY` environment variable.
    pub api_key: Option<String>,
    pub anthropic_version: Option<String>,
}

impl AnthropicSettings {
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
            .or_else(|| std::env::var("ANTHROPIC_BASE_URL").ok())
            .unwrap_or_else(|| "https://api.anthropic.com/v1".to_string())
            .trim_end_matches('/')
            .to_string()
    }

    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key.clone().or_else(|| std::env::var("ANTHROPIC_API_KEY").ok())
    }

    pub fn resolved_version(&self) -> String {
        self.anthropic_version.clone().unwrap_or_else(|| "2023-06-01".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_anthropic_base_url() {
        assert_eq!(AnthropicSettings::new().resolved_base_url(), "https://api.anthropic.com/v1");
    }

    #[test]
    fn defaults_api_version() {
        assert_eq!(AnthropicSettings::new().resolved_version(), "2023-06-01");
    }
}
