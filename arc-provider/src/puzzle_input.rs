use crate::grid::Grid;
use serde::{Deserialize, Serialize};

/// One training example: an input grid paired with its expected output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingPair {
    pub input: Grid,
    pub output: Grid,
}

/// One test case. `expected_output` is present for locally-scored evaluation
/// sets but must never be sent to a provider unless `omit_answer` is false.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCase {
    pub input: Grid,
    pub expected_output: Option<Grid>,
}

/// The minimal puzzle shape a provider adapter needs: ordered training pairs
/// and test cases. Deliberately decoupled from `arc-core::Puzzle` (which
/// also carries the on-disk id and metadata) so this crate has no dependency
/// on the orchestration layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PuzzleInput {
    pub id: String,
    pub train: Vec<TrainingPair>,
    pub test: Vec<TestCase>,
}

impl PuzzleInput {
    pub fn is_multi_test(&self) -> bool {
        self.test.len() >= 2
    }
}
