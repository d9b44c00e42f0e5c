//! Grover iterative code-search solver: generate Python
//! programs, grade them against training examples in the sandbox, amplify
//! the best into the next continuation prompt, repeat.

mod amplify;
mod extract;
mod grade;
mod prompt;
mod solver;

pub use amplify::AMPLIFY_TOP_K;
pub use extract::extract_python_blocks;
pub use grade::{execute_against, grade_program};
pub use solver::{run_grover, GroverResult};
