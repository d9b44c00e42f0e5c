//! Strict ARC JSON output schema.
//!
//! OpenAI's `json_schema` strict mode requires every property in `required`
//! and forbids `additionalProperties`. That is exactly representable for
//! single-test puzzles (`predictedOutput`), but not for multi-test puzzles,
//! whose `predictedOutput1..N` keys vary in count per puzzle — a strict
//! schema can't describe a variable property set. So this adapter only
//! requests structured output for single-test puzzles; multi-test calls fall
//! back to the prompt-level JSON instructions from `arc_core::prompt`.

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

/// Builds the strict ARC analysis schema sent as `text.format.schema`.
pub fn strict_response_schema() -> Value {
    let mut schema = serde_json::to_value(schemars::schema_for!(ArcAnalysisSchema))
        .expect("ArcAnalysisSchema always serializes");

    if let Some(obj) = schema.as_object_mut() {
        obj.remove("$schema");
        obj.remove("title");
        obj.insert("additionalProperties".into(), Value::Bool(false));
        obj.insert(
            "required".into(),
            serde_json::json!([
                "predictedOutput",
                "patternDescription",
                "solvingStrategy",
                "hints",
                "confidence"
            ]),
        );
    }
    schema
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_forbids_additional_properties() {
        let schema = strict_response_schema();
        assert_eq!(schema["additionalProperties"], Value::Bool(false));
    }

    #[test]
    fn schema_requires_all_grid_fields() {
        let schema = strict_response_schema();
        let required = schema["required"].as_array().unwrap();
        assert!(required.iter().any(|v| v == "predictedOutput"));
        assert!(required.iter().any(|v| v == "confidence"));
    }
}
