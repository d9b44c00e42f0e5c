use regex::Regex;
use std::sync::LazyLock;

const WHITELISTED_IMPORTS: &[&str] = &["numpy", "scipy.ndimage", "math", "itertools", "collections"];

static IMPORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*(?:import|from)\s+([A-Za-z0-9_.]+)").unwrap()
});

static FORBIDDEN_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(open|file|exec|eval|__import__|socket|urllib|requests|subprocess|os\.system)\b").unwrap()
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError(pub String);

/// Static pre-execution validation. This is a pragmatic source-text scan
/// rather than a full AST walk — it checks for a fixed denylist (imports,
/// I/O names, network names, `exec`/`eval`/`__import__`) without pulling in
/// a Python parser dependency for a single-purpose gate.
///
/// Known gap: a regex scan over source text cannot catch every way those
/// names could be reached (string-built attribute access, re-exported
/// aliases). An AST walk would close that gap; until then this trades
/// completeness for not depending on a Python parser.
pub fn validate_source(source: &str) -> Result<(), ValidationError> {
    for capture in IMPORT_RE.captures_iter(source) {
        let module = &capture[1];
        let allowed = WHITELISTED_IMPORTS
            .iter()
            .any(|w| module == *w || module.starts_with(&format!("{w}.")));
        if !allowed {
            return Err(ValidationError(format!("import of non-whitelisted module: {module}")));
        }
    }

    if let Some(m) = FORBIDDEN_NAME_RE.find(source) {
        return Err(ValidationError(format!("use of forbidden name: {}", m.as_str())));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allows_whitelisted_imports() {
        assert!(validate_source("import numpy as np\nimport math\n").is_ok());
    }

    #[test]
    fn rejects_non_whitelisted_import() {
        assert!(validate_source("import socket\n").is_err());
    }

    #[test]
    fn rejects_open() {
        assert!(validate_source("f = open('x')\n").is_err());
    }

    #[test]
    fn rejects_eval() {
        assert!(validate_source("eval('1+1')\n").is_err());
    }

    #[test]
    fn allows_scipy_ndimage_submodule() {
        assert!(validate_source("from scipy.ndimage import label\n").is_ok());
    }
}
