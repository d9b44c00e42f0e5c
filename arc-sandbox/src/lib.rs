//! Restricted Python subprocess sandbox: AST-adjacent static
//! validation plus a timeout-bounded `python3` subprocess, used both by the
//! Grover solver (`arc-grover`) and the ARC-3 `analyze_grid` tool
//! (`arc-arc3`).

mod execute;
mod helpers;
mod validate;

pub use execute::{run, SandboxError, SandboxOutput, SandboxPurpose};
pub use validate::{validate_source, ValidationError};
