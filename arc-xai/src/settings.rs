/// Settings for configuring the xAI Grok Responses adapter, mirroring
/// `llm-kit-xai::XaiProviderSettings`.
#[derive(Debug, Clone, Default)]
pub struct XaiSettings {
    /// Defaults to `https://api.x.ai/v1`.
    pub base_url: Option<String>,
    /// Default API key; falls back to `userApiKey` per call, then the
    /// `XAI_API_KEY` environment variable.
    pub api_key: Option<String>,
    /// `XAI_MAX_RETRIES` — overrides the shared retry helper's fixed count
    /// when set.
    pub max_retries: Option<u32>,
    /// `XAI_RETRY_BASE_DELAY_MS`.
    pub retry_base_delay_ms: Option<u64>,
}

impl XaiSettings {
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
            .or_else(|| std::env::var("XAI_BASE_URL").ok())
            .unwrap_or_else(|| "https://api.x.ai/v1".to_string())
            .trim_end_matches('/')
            .to_string()
    }

    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key.clone().or_else(|| std::env::var("XAI_API_KEY").ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_grok_base_url() {
        assert_eq!(XaiSettings::new().resolved_base_url(), "https://api.x.ai/v1");
    }
}
