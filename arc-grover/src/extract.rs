use regex::Regex;
use std::sync::LazyLock;

static FENCED_PYTHON_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```python\s*\n([\s\S]*?)```").unwrap());

/// Extracts fenced ```python code blocks from a provider's raw text output.
/// Grover does not use the structured-output / JSON-extraction pipeline at
/// all — its prompt asks for Python directly.
pub fn extract_python_blocks(raw_text: &str) -> Vec<String> {
    FENCED_PYTHON_RE
        .captures_iter(raw_text)
        .map(|cap| cap[1].trim_end().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_single_block() {
        let text = "Here's my program:\n```python\ndef solve(grid):\n    return grid\n```\nDone.";
        let blocks = extract_python_blocks(text);
        assert_eq!(blocks.len(), 1);
        assert!(blocks[0].contains("def solve"));
    }

    #[test]
    fn extracts_multiple_blocks_in_order() {
        let text = "```python\na = 1\n```\nsome text\n```python\nb = 2\n```";
        let blocks = extract_python_blocks(text);
        assert_eq!(blocks, vec!["a = 1", "b = 2"]);
    }

    #[test]
    fn no_blocks_returns_empty() {
        assert!(extract_python_blocks("no code here").is_empty());
    }
}
