use arc_provider::TokenUsage;

/// USD per million tokens. `AnalysisResponse.usage.cost_usd` needs something
/// to populate it; rates are illustrative flat published list prices,
/// refreshed by hand as providers change them.
#[derive(Debug, Clone, Copy)]
pub struct ModelRate {
    pub input_per_million: f64,
    pub output_per_million: f64,
    /// Reasoning tokens are billed at the output rate unless overridden here.
    pub reasoning_per_million: Option<f64>,
}

fn rate_table(model_key: &str) -> ModelRate {
    let key = model_key.to_ascii_lowercase();
    if key.contains("gpt-5") {
        ModelRate { input_per_million: 1.25, output_per_million: 10.0, reasoning_per_million: Some(10.0) }
    } else if key.contains("o3") || key.contains("o4") {
        ModelRate { input_per_million: 2.0, output_per_million: 8.0, reasoning_per_million: Some(8.0) }
    } else if key.contains("grok") {
        ModelRate { input_per_million: 0.2, output_per_million: 0.5, reasoning_per_million: None }
    } else if key.contains("claude") {
        ModelRate { input_per_million: 3.0, output_per_million: 15.0, reasoning_per_million: None }
    } else if key.contains("gemini") {
        ModelRate { input_per_million: 1.25, output_per_million: 5.0, reasoning_per_million: None }
    } else if key.contains("deepseek") {
        ModelRate { input_per_million: 0.14, output_per_million: 0.28, reasoning_per_million: None }
    } else {
        ModelRate { input_per_million: 1.0, output_per_million: 2.0, reasoning_per_million: None }
    }
}

/// Computes `cost_usd` for a [`TokenUsage`] given the model it was billed
/// under. Called by the orchestrator once token counts are known — adapters
/// themselves leave `cost_usd` as `None`.
pub fn cost_for(model_key: &str, usage: &TokenUsage) -> f64 {
    let rate = rate_table(model_key);
    let input_cost = usage.input_tokens as f64 / 1_000_000.0 * rate.input_per_million;
    let output_cost = usage.output_tokens as f64 / 1_000_000.0 * rate.output_per_million;
    let reasoning_rate = rate.reasoning_per_million.unwrap_or(rate.output_per_million);
    let reasoning_cost = usage.reasoning_tokens as f64 / 1_000_000.0 * reasoning_rate;
    input_cost + output_cost + reasoning_cost
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_usage_costs_nothing() {
        assert_eq!(cost_for("gpt-5-2025-08-07", &TokenUsage::default()), 0.0);
    }

    #[test]
    fn reasoning_tokens_are_billed() {
        let usage = TokenUsage { input_tokens: 0, output_tokens: 0, reasoning_tokens: 1_000_000, total_tokens: 1_000_000, cost_usd: None };
        assert!(cost_for("gpt-5-2025-08-07", &usage) > 0.0);
    }
}
