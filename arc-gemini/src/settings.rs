/// Settings for configuring the Gemini adapter, in the URL-generator-closure
/// idiom `llm-kit-huggingface::HuggingFaceClientConfig` uses for providers
/// whose URL depends on the model id rather than being a fixed path suffix.
#[derive(Debug, Clone, Default)]
pub struct GeminiSettings {
    /// Defaults to `https://generativelanguage.googleapis.com/v1beta`.
    pub base_url: Option<String>,
    /// Falls back to `userApiKey` per call, then `GEMINI_API_KEY`.
    pub api_key: Option<String>,
}

impl GeminiSettings {
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
            .or_else(|| std::env::var("GEMINI_BASE_URL").ok())
            .unwrap_or_else(|| "https://generativelanguage.googleapis.com/v1beta".to_string())
            .trim_end_matches('/')
            .to_string()
    }

    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key.clone().or_else(|| std::env::var("GEMINI_API_KEY").ok())
    }

    /// Builds the `:generateContent` URL for a model id — Gemini's
    /// per-model path, unlike the fixed `/chat/completions` suffix OpenAI-
    /// compatible providers use.
    pub fn generate_content_url(&self, model_key: &str) -> String {
        format!("{}/models/{}:generateContent", self.resolved_base_url(), model_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_per_model_url() {
        let s = GeminiSettings::new();
        assert_eq!(
            s.generate_content_url("gemini-2.0-flash"),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }
}
