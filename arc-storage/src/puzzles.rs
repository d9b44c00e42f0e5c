use crate::error::to_core_error;
use arc_core::repository::PuzzleRepository;
use arc_core::{CoreError, Puzzle};
use async_trait::async_trait;
use sqlx::{PgPool, Row};
use std::path::{Path, PathBuf};

/// Loads puzzle metadata from Postgres and the actual train/test grids from
/// disk. The `puzzles` row only tells us which dataset directory a given id
/// lives under; `Puzzle::load_from_file` does the parsing and
/// rectangularity checks.
pub struct FsPuzzleRepository {
    pool: PgPool,
    dataset_root: PathBuf,
}

impl FsPuzzleRepository {
    pub fn new(pool: PgPool, dataset_root: impl Into<PathBuf>) -> Self {
        Self { pool, dataset_root: dataset_root.into() }
    }

    /// Registers (or re-registers) a puzzle's dataset membership, called by
    /// the ingestion pipeline after parsing a puzzle file from disk.
    pub async fn register_puzzle(&self, puzzle: &Puzzle, dataset: &str) -> Result<(), CoreError> {
        sqlx::query(
            r#"
            INSERT INTO puzzles (id, dataset, train_count, test_count)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE SET dataset = EXCLUDED.dataset, train_count = EXCLUDED.train_count, test_count = EXCLUDED.test_count
            "#,
        )
        .bind(&puzzle.id)
        .bind(dataset)
        .bind(puzzle.train.len() as i16)
        .bind(puzzle.test.len() as i16)
        .execute(&self.pool)
        .await
        .map_err(|e| to_core_error("register_puzzle", e))?;

        Ok(())
    }

    async fn dataset_for(&self, puzzle_id: &str) -> Result<String, CoreError> {
        let row = sqlx::query("SELECT dataset FROM puzzles WHERE id = $1")
            .bind(puzzle_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| to_core_error("dataset_for", e))?
            .ok_or_else(|| CoreError::InputValidation(format!("unknown puzzle id: {puzzle_id}")))?;

        row.try_get("dataset").map_err(|e| to_core_error("dataset_for column", e))
    }

    fn puzzle_path(&self, dataset: &str, puzzle_id: &str) -> PathBuf {
        Path::new(&self.dataset_root).join(dataset).join(format!("{puzzle_id}.json"))
    }

    /// All puzzle ids registered under a dataset, used by `/api/model-dataset/
    /// performance/:modelName/:datasetName` to compute `notAttempted`
    /// as the set difference against explained puzzle ids.
    pub async fn list_dataset_puzzle_ids(&self, dataset: &str) -> Result<Vec<String>, CoreError> {
        let rows = sqlx::query("SELECT id FROM puzzles WHERE dataset = $1")
            .bind(dataset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| to_core_error("list_dataset_puzzle_ids", e))?;

        rows.iter().map(|row| row.try_get("id").map_err(|e| to_core_error("list_dataset_puzzle_ids id", e))).collect()
    }
}

#[async_trait]
impl PuzzleRepository for FsPuzzleRepository {
    async fn load(&self, puzzle_id: &str) -> Result<Puzzle, CoreError> {
        let dataset = self.dataset_for(puzzle_id).await?;
        let path = self.puzzle_path(&dataset, puzzle_id);
        Puzzle::load_from_file(&path).map_err(|e| CoreError::Persistence(format!("loading puzzle {puzzle_id} from {path:?}: {e}")))
    }
}
