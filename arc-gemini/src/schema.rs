//! ARC JSON output schema for `generationConfig.responseSchema`.
//!
//! Gemini's structured-output mode is schema-driven like OpenAI's, so the
//! same single-test-only gating applies: multi-test puzzles need a variable
//! `predictedOutput1..N` key set a fixed schema can't express, and fall back
//! to the prompt-level JSON instructions instead.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
struct ArcAnalysisSchema {
    predicted_output: Vec<Vec<i32>>,
    pattern_description: String,
    solving_strategy: String,
    hints: Vec<String>,
    confidence: u8,
}

/// Builds the ARC analysis schema sent as `generationConfig.responseSchema`.
/// Gemini's schema dialect has no `additionalProperties`/strict-mode
/// concept, so this is just the plain JSON schema with `$schema`/`title`
/// stripped.
pub fn response_schema() -> Value {
    let mut schema = serde_json::to_value(schemars::schema_for!(ArcAnalysisSchema))
        .expect("ArcAnalysisSchema always serializes");

    if let Some(obj) = schema.as_object_mut() {
        obj.remove("$schema");
        obj.remove("title");
    }
    schema
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_describes_grid_fields() {
        let schema = response_schema();
        let props = schema["properties"].as_object().unwrap();
        assert!(props.contains_key("predictedOutput"));
        assert!(props.contains_key("confidence"));
    }
}
