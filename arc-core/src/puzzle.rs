use arc_provider::{Grid, PuzzleInput, TestCase, TrainingPair};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Immutable puzzle loaded from disk, keyed by 8-char hex id.
///
/// Puzzles are read-only singletons: once loaded, a `Puzzle` is never
/// mutated. Loading is idempotent — re-reading the same file yields an
/// equal value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Puzzle {
    pub id: String,
    pub train: Vec<TrainingPair>,
    pub test: Vec<TestCase>,
}

/// On-disk JSON shape, as distributed by the ARC-AGI dataset repositories:
/// `{"train": [{"input": [[..]], "output": [[..]]}], "test": [...]}`.
#[derive(Debug, Deserialize)]
struct RawPair {
    input: Vec<Vec<i32>>,
    output: Option<Vec<Vec<i32>>>,
}

#[derive(Debug, Deserialize)]
struct RawPuzzleFile {
    train: Vec<RawTrainPair>,
    test: Vec<RawPair>,
}

#[derive(Debug, Deserialize)]
struct RawTrainPair {
    input: Vec<Vec<i32>>,
    output: Vec<Vec<i32>>,
}

#[derive(Debug, thiserror::Error)]
pub enum PuzzleLoadError {
    #[error("puzzle file not found or unreadable: {0}")]
    Io(#[from] std::io::Error),
    #[error("puzzle file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("puzzle {0} has a row of unequal length")]
    RaggedGrid(String),
}

impl Puzzle {
    /// Load a puzzle from its on-disk JSON file. The id is derived from the
    /// file stem (the 8-char hex convention used by the puzzle corpus).
    pub fn load_from_file(path: &Path) -> Result<Puzzle, PuzzleLoadError> {
        let id = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let raw = std::fs::read_to_string(path)?;
        let parsed: RawPuzzleFile = serde_json::from_str(&raw)?;
        Self::from_raw(id, parsed)
    }

    fn from_raw(id: String, raw: RawPuzzleFile) -> Result<Puzzle, PuzzleLoadError> {
        let mut train = Vec::with_capacity(raw.train.len());
        for pair in raw.train {
            check_rectangular(&id, &pair.input)?;
            check_rectangular(&id, &pair.output)?;
            train.push(TrainingPair {
                input: Grid(pair.input),
                output: Grid(pair.output),
            });
        }

        let mut test = Vec::with_capacity(raw.test.len());
        for case in raw.test {
            check_rectangular(&id, &case.input)?;
            if let Some(ref out) = case.output {
                check_rectangular(&id, out)?;
            }
            test.push(TestCase {
                input: Grid(case.input),
                expected_output: case.output.map(Grid),
            });
        }

        Ok(Puzzle { id, train, test })
    }

    /// Number of test cases, used by the orchestrator to enforce Testable
    /// Property 10 (0 test cases is an InputValidationError).
    pub fn test_count(&self) -> usize {
        self.test.len()
    }

    pub fn is_multi_test(&self) -> bool {
        self.test.len() >= 2
    }

    /// Converts to the lightweight shape adapters consume, decoupling
    /// `arc-provider` from this crate's on-disk loading concerns.
    pub fn to_input(&self) -> PuzzleInput {
        PuzzleInput {
            id: self.id.clone(),
            train: self.train.clone(),
            test: self.test.clone(),
        }
    }
}

fn check_rectangular(id: &str, rows: &[Vec<i32>]) -> Result<(), PuzzleLoadError> {
    if rows.is_empty() {
        return Ok(());
    }
    let width = rows[0].len();
    if rows.iter().any(|r| r.len() != width) {
        return Err(PuzzleLoadError::RaggedGrid(id.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_puzzle() {
        let raw = RawPuzzleFile {
            train: vec![RawTrainPair {
                input: vec![vec![0, 1], vec![1, 0]],
                output: vec![vec![1, 0], vec![0, 1]],
            }],
            test: vec![RawPair {
                input: vec![vec![0, 0], vec![0, 0]],
                output: Some(vec![vec![1, 1], vec![1, 1]]),
            }],
        };
        let puzzle = Puzzle::from_raw("00d62c1b".into(), raw).unwrap();
        assert_eq!(puzzle.train.len(), 1);
        assert_eq!(puzzle.test.len(), 1);
        assert!(!puzzle.is_multi_test());
    }

    #[test]
    fn rejects_ragged_training_grid() {
        let raw = RawPuzzleFile {
            train: vec![RawTrainPair {
                input: vec![vec![0, 1], vec![1]],
                output: vec![vec![1, 0], vec![0, 1]],
            }],
            test: vec![],
        };
        assert!(matches!(
            Puzzle::from_raw("bad".into(), raw),
            Err(PuzzleLoadError::RaggedGrid(_))
        ));
    }
}
