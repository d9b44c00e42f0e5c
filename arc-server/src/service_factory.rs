use crate::config::Config;
use arc_anthropic::AnthropicAdapter;
use arc_gemini::GeminiAdapter;
use arc_openai::OpenAiAdapter;
use arc_openrouter::{OpenRouterAdapter, OpenRouterSettings};
use arc_provider::ProviderAdapter;
use arc_xai::XaiAdapter;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum FactoryError {
    #[error("unrecognized model key: {0}")]
    UnknownModel(String),
}

/// One resolved dispatch: the adapter to call, the model key string to pass
/// to it (routing prefixes stripped), and whether the caller should wrap
/// the call in the Grover iterative loop rather than a single `analyze`.
pub struct ResolvedProvider {
    pub adapter: Arc<dyn ProviderAdapter>,
    pub model_key: String,
    pub is_grover: bool,
}

/// Builds every provider adapter once at startup rather than per-request —
/// each adapter only owns a `reqwest::Client` and static settings, so one
/// shared client per provider avoids the anti-pattern of constructing a
/// new one per call.
pub struct ServiceFactory {
    openai: Arc<OpenAiAdapter>,
    xai: Arc<XaiAdapter>,
    anthropic: Arc<AnthropicAdapter>,
    gemini: Arc<GeminiAdapter>,
    openrouter: Arc<OpenRouterAdapter>,
    deepseek: Arc<OpenRouterAdapter>,
}

impl ServiceFactory {
    pub fn new(config: &Config) -> Self {
        let mut openai_settings = arc_openai::OpenAiSettings::new();
        if let Some(key) = &config.openai_api_key {
            openai_settings = openai_settings.with_api_key(key.clone());
        }

        let mut xai_settings = arc_xai::XaiSettings::new();
        if let Some(key) = &config.xai_api_key {
            xai_settings = xai_settings.with_api_key(key.clone());
        }

        let mut anthropic_settings = arc_anthropic::AnthropicSettings::new();
        if let Some(key) = &config.anthropic_api_key {
            anthropic_settings = anthropic_settings.with_api_key(key.clone());
        }

        let mut gemini_settings = arc_gemini::GeminiSettings::new();
        if let Some(key) = &config.gemini_api_key {
            gemini_settings = gemini_settings.with_api_key(key.clone());
        }

        let mut openrouter_settings = OpenRouterSettings::new();
        if let Some(key) = &config.openrouter_api_key {
            openrouter_settings = openrouter_settings.with_api_key(key.clone());
        }

        // DeepSeek has no dedicated adapter crate — its chat/completions
        // wire format is OpenAI-compatible, the same shape `arc-openrouter`
        // already speaks, so it is dispatched through the same adapter
        // pointed at DeepSeek's own base URL and key (documented in
        // DESIGN.md rather than duplicating the adapter).
        let mut deepseek_settings = OpenRouterSettings::new().with_base_url("https://api.deepseek.com");
        if let Some(key) = &config.deepseek_api_key {
            deepseek_settings = deepseek_settings.with_api_key(key.clone());
        }

        Self {
            openai: Arc::new(OpenAiAdapter::new(openai_settings)),
            xai: Arc::new(XaiAdapter::new(xai_settings)),
            anthropic: Arc::new(AnthropicAdapter::new(anthropic_settings)),
            gemini: Arc::new(GeminiAdapter::new(gemini_settings)),
            openrouter: Arc::new(OpenRouterAdapter::new(openrouter_settings)),
            deepseek: Arc::new(OpenRouterAdapter::new(deepseek_settings)),
        }
    }

    /// Resolves a model key to a concrete adapter. `openrouter/` and
    /// `grover-` are routing prefixes and are stripped from what's
    /// ultimately sent to the provider; everything else is substring
    /// matching on the remaining key.
    pub fn resolve(&self, model_key: &str) -> Result<ResolvedProvider, FactoryError> {
        let is_grover = model_key.starts_with("grover-");
        let stripped = model_key.strip_prefix("grover-").unwrap_or(model_key);

        if let Some(routed) = stripped.strip_prefix("openrouter/") {
            return Ok(ResolvedProvider {
                adapter: self.openrouter.clone(),
                model_key: routed.to_string(),
                is_grover,
            });
        }

        let lower = stripped.to_ascii_lowercase();
        let adapter: Arc<dyn ProviderAdapter> = if lower.contains("gpt") || lower.contains("o3") || lower.contains("o4") {
            self.openai.clone()
        } else if lower.contains("grok") {
            self.xai.clone()
        } else if lower.contains("claude") {
            self.anthropic.clone()
        } else if lower.contains("gemini") {
            self.gemini.clone()
        } else if lower.contains("deepseek") {
            self.deepseek.clone()
        } else {
            return Err(FactoryError::UnknownModel(model_key.to_string()));
        };

        Ok(ResolvedProvider { adapter, model_key: stripped.to_string(), is_grover })
    }
}
