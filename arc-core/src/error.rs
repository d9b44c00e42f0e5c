use thiserror::Error;

/// Orchestration-layer error taxonomy. Provider-level errors stay
/// in `arc_provider::ProviderError` and are wrapped here rather than
/// flattened, so callers can still match on the provider variant.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid request: {0}")]
    InputValidation(String),

    #[error(transparent)]
    Provider(#[from] arc_provider::ProviderError),

    #[error("continuation attempted across incompatible providers: {requested} chained from {owning}; start a new chain")]
    ProviderMismatch { requested: String, owning: String },

    #[error("could not extract a JSON payload from the provider response")]
    Parse,

    #[error("grid validation failed: {0}")]
    GridValidation(String),

    #[error("sandbox execution failed: {0}")]
    Sandbox(#[from] SandboxErrorKind),

    #[error("operation cancelled")]
    Cancelled,

    #[error("persistence error: {0}")]
    Persistence(String),
}

impl CoreError {
    /// HTTP status code to surface this error as.
    pub fn status_code(&self) -> u16 {
        match self {
            CoreError::InputValidation(_) => 400,
            CoreError::ProviderMismatch { .. } => 400,
            CoreError::Provider(e) if !e.is_retryable() => 502,
            CoreError::Provider(_) => 503,
            CoreError::Parse => 502,
            CoreError::GridValidation(_) => 200,
            CoreError::Sandbox(_) => 200,
            CoreError::Cancelled => 499,
            CoreError::Persistence(_) => 500,
        }
    }

    pub fn retryable(&self) -> bool {
        matches!(self, CoreError::Provider(e) if e.is_retryable())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            CoreError::InputValidation(_) => "InputValidationError",
            CoreError::Provider(_) => "ProviderError",
            CoreError::ProviderMismatch { .. } => "ProviderMismatchError",
            CoreError::Parse => "ParseError",
            CoreError::GridValidation(_) => "GridValidationError",
            CoreError::Sandbox(_) => "SandboxError",
            CoreError::Cancelled => "CancellationError",
            CoreError::Persistence(_) => "PersistenceError",
        }
    }
}

/// Sandbox failure classification. Recorded per-program;
/// the Grover loop continues past these rather than aborting.
#[derive(Debug, Clone, Error)]
pub enum SandboxErrorKind {
    #[error("syntax error: {0}")]
    Syntax(String),
    #[error("runtime exception: {0}")]
    Runtime(String),
    #[error("execution timed out")]
    Timeout,
    #[error("rejected by static validation: {0}")]
    Validation(String),
}
