use std::collections::HashMap;

/// Settings for configuring the OpenAI Responses adapter, mirroring
/// `llm-kit-openai::OpenAIProviderSettings`.
#[derive(Debug, Clone, Default)]
pub struct OpenAiSettings {
    /// Base URL for the Responses API. Defaults to `https://api.openai.com/v1`.
    pub base_url: Option<String>,
    /// Default API key, used when a call doesn't supply its own bring-your-own
    /// `userApiKey`. Falls back to the `OPENAI_API_KEY` environment variable
    /// if unset here too.
    pub api_key: Option<String>,
    pub organization: Option<String>,
    pub project: Option<String>,
    pub headers: Option<HashMap<String, String>>,
}

impl OpenAiSettings {
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

    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = Some(organization.into());
        self
    }

    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }

    pub fn resolved_base_url(&self) -> String {
        self.base_url
            .clone()
            .or_else(|| std::env::var("OPENAI_BASE_URL").ok())
            .unwrap_or_else(|| "https://api.openai.com/v1".to_string())
            .trim_end_matches('/')
            .to_string()
    }

    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key.clone().or_else(|| std::env::var("OPENAI_API_KEY").ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let s = OpenAiSettings::new().with_base_url("https://api.openai.com/v1/");
        assert_eq!(s.resolved_base_url(), "https://api.openai.com/v1");
    }

    #[test]
    fn defaults_to_official_base_url() {
        let s = OpenAiSettings::new();
        assert_eq!(s.resolved_base_url(), "https://api.openai.com/v1");
    }
}
