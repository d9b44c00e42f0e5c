use arc_provider::grid::sanitize;
use arc_provider::Grid;
use serde::Deserialize;

/// Raw shape the JSON payload (however it was extracted) is expected to
/// take. All fields optional at this layer — validation of which
/// combination is acceptable happens in [`parse_analysis`].
///
/// `predicted_output` is kept as a raw [`serde_json::Value`] rather than a
/// typed grid: a single null/malformed row inside it must not abort
/// deserialization of the rest of the payload. Row-level filtering happens
/// afterwards in [`grid_from_value`].
#[derive(Debug, Deserialize, Default)]
struct RawPayload {
    #[serde(rename = "predictedOutput")]
    predicted_output: Option<serde_json::Value>,
    #[serde(rename = "multiplePredictedOutputs")]
    multiple_predicted_outputs: Option<bool>,
    #[serde(rename = "patternDescription")]
    pattern_description: Option<String>,
    #[serde(rename = "solvingStrategy")]
    solving_strategy: Option<String>,
    hints: Option<Vec<String>>,
    confidence: Option<u8>,
    #[serde(flatten)]
    extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone)]
pub struct ParsedAnalysis {
    pub predicted_output: Option<Grid>,
    pub multi_test_prediction_grids: Option<Vec<Option<Grid>>>,
    pub pattern_description: String,
    pub solving_strategy: String,
    pub hints: Vec<String>,
    pub confidence: u8,
}

/// Providers that return content blocks (Anthropic) should concatenate
/// their `text` blocks with this before calling [`parse_analysis`] (spec
/// §4.3 step 3).
pub fn concat_text_blocks(blocks: &[String]) -> String {
    blocks.join("")
}

fn try_parse_json(text: &str) -> Option<serde_json::Value> {
    if let Ok(v) = serde_json::from_str::<serde_json::Value>(text) {
        return Some(v);
    }
    // Scan for the first balanced `{...}` span.
    if let Some(start) = text.find('{') {
        let mut depth = 0i32;
        for (offset, ch) in text[start..].char_indices() {
            match ch {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        let end = start + offset + 1;
                        if let Ok(v) = serde_json::from_str::<serde_json::Value>(&text[start..end]) {
                            return Some(v);
                        }
                        break;
                    }
                }
                _ => {}
            }
        }
    }
    // Fenced ```json block.
    if let Some(fence_start) = text.find("```json") {
        let after = &text[fence_start + 7..];
        if let Some(fence_end) = after.find("```") {
            let candidate = after[..fence_end].trim();
            if let Ok(v) = serde_json::from_str::<serde_json::Value>(candidate) {
                return Some(v);
            }
        }
    }
    None
}

/// Builds a [`Grid`] from a raw `predictedOutput`-shaped JSON value.
///
/// Walks each row individually rather than deserializing the whole array at
/// once: a null/undefined or non-array row is dropped (with a warning) and
/// parsing continues with the remaining rows, instead of discarding the
/// entire prediction over one bad row. [`sanitize`] then rejects the result
/// if it ends up empty or ragged.
fn grid_from_value(value: &serde_json::Value) -> Option<Grid> {
    let rows = value.as_array()?;
    let mut filtered = Vec::with_capacity(rows.len());
    for row in rows {
        match row {
            serde_json::Value::Array(cells) => match cells.iter().map(|c| c.as_i64().map(|n| n as i32)).collect::<Option<Vec<i32>>>() {
                Some(parsed_row) => filtered.push(parsed_row),
                None => log::warn!("grid sanitize: dropping row with a non-integer cell"),
            },
            serde_json::Value::Null => log::warn!("grid sanitize: dropping null row"),
            _ => log::warn!("grid sanitize: dropping non-array row"),
        }
    }
    sanitize(Grid(filtered))
}

/// Extracts a normalized analysis record from a provider's textual/structured
/// output. `structured_output` is `Some` only when the provider call used a
/// strict JSON-schema response format and the provider confirmed it
/// matched — that path is trusted without re-parsing (precedence rule 1).
pub fn parse_analysis(
    structured_output: Option<&serde_json::Value>,
    raw_text: &str,
    test_count: usize,
) -> Result<ParsedAnalysis, crate::error::CoreError> {
    let value = if let Some(v) = structured_output {
        v.clone()
    } else {
        try_parse_json(raw_text).ok_or(crate::error::CoreError::Parse)?
    };

    let payload: RawPayload = serde_json::from_value(value).map_err(|_| crate::error::CoreError::Parse)?;

    let multi_test = test_count >= 2;
    let multi_test_prediction_grids = if multi_test {
        let explicit_multi = payload.multiple_predicted_outputs.unwrap_or(false);
        let mut grids: Vec<Option<Grid>> = Vec::with_capacity(test_count);
        if explicit_multi {
            for i in 1..=test_count {
                let key = format!("predictedOutput{i}");
                let grid = payload
                    .extra
                    .get(&key)
                    .and_then(grid_from_value);
                grids.push(grid);
            }
        } else {
            // Single-prediction-for-first-test (partial): only the first
            // test case gets a grid, the rest are left unscoreable.
            grids.push(payload.predicted_output.as_ref().and_then(grid_from_value));
            for _ in 1..test_count {
                grids.push(None);
            }
        }
        Some(grids)
    } else {
        None
    };

    Ok(ParsedAnalysis {
        predicted_output: payload.predicted_output.as_ref().and_then(grid_from_value),
        multi_test_prediction_grids,
        pattern_description: payload.pattern_description.unwrap_or_default(),
        solving_strategy: payload.solving_strategy.unwrap_or_default(),
        hints: payload.hints.unwrap_or_default(),
        confidence: payload.confidence.unwrap_or(0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_json() {
        let text = r#"{"predictedOutput":[[1,2],[3,4]],"patternDescription":"p","solvingStrategy":"s","hints":[],"confidence":80}"#;
        let parsed = parse_analysis(None, text, 1).unwrap();
        assert_eq!(parsed.predicted_output, Some(Grid(vec![vec![1, 2], vec![3, 4]])));
        assert_eq!(parsed.confidence, 80);
    }

    #[test]
    fn scans_for_first_balanced_object_in_noisy_text() {
        let text = "Here is my answer: {\"predictedOutput\":[[1]],\"patternDescription\":\"p\",\"solvingStrategy\":\"s\",\"hints\":[],\"confidence\":50} Thanks!";
        let parsed = parse_analysis(None, text, 1).unwrap();
        assert_eq!(parsed.predicted_output, Some(Grid(vec![vec![1]])));
    }

    #[test]
    fn parses_fenced_json_block() {
        let text = "```json\n{\"predictedOutput\":[[9]],\"patternDescription\":\"p\",\"solvingStrategy\":\"s\",\"hints\":[],\"confidence\":10}\n```";
        let parsed = parse_analysis(None, text, 1).unwrap();
        assert_eq!(parsed.predicted_output, Some(Grid(vec![vec![9]])));
    }

    #[test]
    fn multi_test_explicit_grids() {
        let text = r#"{"multiplePredictedOutputs":true,"predictedOutput1":[[1]],"predictedOutput2":[[2]],"patternDescription":"p","solvingStrategy":"s","hints":[],"confidence":50}"#;
        let parsed = parse_analysis(None, text, 2).unwrap();
        let grids = parsed.multi_test_prediction_grids.unwrap();
        assert_eq!(grids.len(), 2);
        assert_eq!(grids[0], Some(Grid(vec![vec![1]])));
        assert_eq!(grids[1], Some(Grid(vec![vec![2]])));
    }

    #[test]
    fn multi_test_partial_single_prediction() {
        let text = r#"{"predictedOutput":[[1]],"patternDescription":"p","solvingStrategy":"s","hints":[],"confidence":50}"#;
        let parsed = parse_analysis(None, text, 3).unwrap();
        let grids = parsed.multi_test_prediction_grids.unwrap();
        assert_eq!(grids.len(), 3);
        assert_eq!(grids[0], Some(Grid(vec![vec![1]])));
        assert_eq!(grids[1], None);
    }

    #[test]
    fn null_row_is_dropped_not_fatal() {
        let text = r#"{"predictedOutput":[[1,2],null,[3,4]],"patternDescription":"p","solvingStrategy":"s","hints":["h"],"confidence":70}"#;
        let parsed = parse_analysis(None, text, 1).unwrap();
        assert_eq!(parsed.predicted_output, Some(Grid(vec![vec![1, 2], vec![3, 4]])));
        assert_eq!(parsed.pattern_description, "p");
        assert_eq!(parsed.hints, vec!["h".to_string()]);
    }

    #[test]
    fn grid_that_is_nothing_but_bad_rows_is_nulled() {
        let text = r#"{"predictedOutput":[null,"not a row"],"patternDescription":"p","solvingStrategy":"s","hints":[],"confidence":0}"#;
        let parsed = parse_analysis(None, text, 1).unwrap();
        assert_eq!(parsed.predicted_output, None);
    }

    #[test]
    fn unparseable_text_is_parse_error() {
        assert!(parse_analysis(None, "not json at all", 1).is_err());
    }

    #[test]
    fn structured_output_is_trusted_without_reparsing() {
        let value = serde_json::json!({
            "predictedOutput": [[5]],
            "patternDescription": "p",
            "solvingStrategy": "s",
            "hints": [],
            "confidence": 99
        });
        let parsed = parse_analysis(Some(&value), "garbage that would fail to parse {{{", 1).unwrap();
        assert_eq!(parsed.confidence, 99);
    }
}
