use crate::validate::validate_source;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;
use tokio::time::timeout;

const OUTPUT_TRUNCATE_BYTES: usize = 8 * 1024;
const GROVER_TIMEOUT: Duration = Duration::from_secs(5);
const ANALYZE_GRID_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SandboxPurpose {
    /// Grover program execution against a training/test pair.
    GroverProgram,
    /// The `analyze_grid` ARC-3 tool call.
    AnalyzeGrid,
}

impl SandboxPurpose {
    fn timeout(self) -> Duration {
        match self {
            SandboxPurpose::GroverProgram => GROVER_TIMEOUT,
            SandboxPurpose::AnalyzeGrid => ANALYZE_GRID_TIMEOUT,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SandboxError {
    #[error("syntax error: {0}")]
    Syntax(String),
    #[error("runtime exception: {0}")]
    Runtime(String),
    #[error("execution timed out")]
    Timeout,
    #[error("rejected by static validation: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct SandboxOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Python harness wrapping user source with the execution context dict and
/// an exit-code convention the caller can classify on: 0 success, 2 syntax
/// error (caught at compile()), 3 runtime exception (traceback on stderr).
/// Passed as a `-c` argument rather than a temp file, since the child is
/// short-lived and there is nothing worth persisting to disk.
fn build_harness(source: &str, context_json: &str, purpose: SandboxPurpose) -> String {
    let helpers = match purpose {
        SandboxPurpose::AnalyzeGrid => crate::helpers::GRID_ANALYSIS_HELPERS,
        SandboxPurpose::GroverProgram => "",
    };
    format!(
        r#"
import sys, json, traceback

{helpers}

_context = json.loads({context_json!r})
_globals = dict(_context)
_globals.update({{k: v for k, v in globals().items() if not k.startswith("_")}})

_source = {source!r}
try:
    _compiled = compile(_source, "<sandbox>", "exec")
except SyntaxError as e:
    sys.stderr.write(f"SyntaxError: {{e}}")
    sys.exit(2)

try:
    exec(_compiled, _globals)
except Exception:
    traceback.print_exc()
    sys.exit(3)

if "result" in _globals:
    sys.stdout.write(json.dumps(_globals["result"]))
sys.exit(0)
"#
    )
}

fn truncate(bytes: Vec<u8>) -> String {
    let text = String::from_utf8_lossy(&bytes);
    if text.len() > OUTPUT_TRUNCATE_BYTES {
        format!("{}... [truncated]", &text[..OUTPUT_TRUNCATE_BYTES])
    } else {
        text.into_owned()
    }
}

/// Runs `source` with `python3`, passing `context` as JSON-decoded globals.
/// The script is expected to assign a JSON-serializable value to a
/// top-level `result` variable; that becomes `SandboxOutput::stdout`.
pub async fn run(
    source: &str,
    context: &serde_json::Value,
    purpose: SandboxPurpose,
) -> Result<SandboxOutput, SandboxError> {
    validate_source(source).map_err(|e| SandboxError::Validation(e.0))?;

    let context_json = serde_json::to_string(context).unwrap_or_else(|_| "{}".to_string());
    let harness = build_harness(source, &context_json, purpose);

    let mut child = Command::new("python3")
        .arg("-c")
        .arg(&harness)
        .stdin(std::process::Stdio::null())
        .stdout(std::process::Stdio::piped())
        .stderr(std::process::Stdio::piped())
        .spawn()
        .map_err(|e| SandboxError::Runtime(format!("failed to spawn python3: {e}")))?;

    // Drain stdout/stderr concurrently with waiting on the child rather than
    // after: a child that writes more than the OS pipe buffer before exiting
    // would otherwise block on a full pipe while we block on `wait()`,
    // surfacing as a spurious timeout instead of a completed run.
    let mut stdout_pipe = child.stdout.take();
    let mut stderr_pipe = child.stderr.take();

    let drained = async {
        use tokio::io::AsyncReadExt;
        let mut stdout_buf = Vec::new();
        let mut stderr_buf = Vec::new();
        let stdout_read = async {
            if let Some(pipe) = stdout_pipe.as_mut() {
                let _ = pipe.read_to_end(&mut stdout_buf).await;
            }
        };
        let stderr_read = async {
            if let Some(pipe) = stderr_pipe.as_mut() {
                let _ = pipe.read_to_end(&mut stderr_buf).await;
            }
        };
        let (status, _, _) = tokio::join!(child.wait(), stdout_read, stderr_read);
        (status, stdout_buf, stderr_buf)
    };

    let (status, stdout_buf, stderr_buf) = match timeout(purpose.timeout(), drained).await {
        Ok(result) => result,
        Err(_) => {
            let _ = child.start_kill();
            return Err(SandboxError::Timeout);
        }
    };

    let status = status.map_err(|e| SandboxError::Runtime(format!("wait failed: {e}")))?;
    let stdout = truncate(stdout_buf);
    let stderr = truncate(stderr_buf);

    match status.code() {
        Some(0) => Ok(SandboxOutput { stdout, stderr }),
        Some(2) => Err(SandboxError::Syntax(stderr)),
        Some(3) => Err(SandboxError::Runtime(stderr)),
        _ => Err(SandboxError::Runtime(format!("process exited abnormally: {stderr}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn harness_embeds_source_safely() {
        let harness = build_harness("result = 1 + 1", "{}", SandboxPurpose::GroverProgram);
        assert!(harness.contains("compile("));
    }

    #[test]
    fn analyze_grid_harness_includes_helpers() {
        let harness = build_harness("result = 1", "{}", SandboxPurpose::AnalyzeGrid);
        assert!(harness.contains("find_connected_components"));
    }
}
