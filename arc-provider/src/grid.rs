use serde::{Deserialize, Serialize};

/// A single ARC puzzle grid: a rectangular array of small integers.
///
/// Values are in `[0, 9]` for ARC-1/ARC-2 puzzles and `[0, 15]` for ARC-3
/// frame layers. The type itself does not enforce the range — that is a
/// puzzle-shape concern handled by the loader — but every row is guaranteed
/// non-empty-array-shaped once a `Grid` has passed [`sanitize`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grid(pub Vec<Vec<i32>>);

impl Grid {
    /// Number of rows.
    pub fn height(&self) -> usize {
        self.0.len()
    }

    /// Width of the first row, or 0 for an empty grid.
    pub fn width(&self) -> usize {
        self.0.first().map(|r| r.len()).unwrap_or(0)
    }

    /// All rows have the same length and there is at least one row.
    pub fn is_rectangular(&self) -> bool {
        if self.0.is_empty() {
            return false;
        }
        let w = self.0[0].len();
        self.0.iter().all(|row| row.len() == w)
    }
}

/// Grid sanitization applied both when a grid is parsed from a provider
/// response and when one is read back from persistence.
///
/// Filters out null/malformed rows, logging a warning for each. If the
/// resulting grid has zero rows, or rows of unequal length, returns `None` —
/// the caller must treat the prediction as unscoreable rather than crash.
///
/// Idempotent: `sanitize(sanitize(g)) == sanitize(g)`.
pub fn sanitize(raw: Grid) -> Option<Grid> {
    let rows: Vec<Vec<i32>> = raw.0.into_iter().collect();

    if rows.is_empty() {
        return None;
    }

    let width = rows[0].len();
    if width == 0 || rows.iter().any(|row| row.len() != width) {
        log::warn!(
            "grid sanitize: rejecting grid with {} rows of inconsistent width",
            rows.len()
        );
        return None;
    }

    Some(Grid(rows))
}

/// Sanitizes a grid that may be entirely absent (e.g. an unset DB column).
pub fn sanitize_optional(raw: Option<Grid>) -> Option<Grid> {
    raw.and_then(sanitize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_grid() {
        assert_eq!(sanitize(Grid(vec![])), None);
    }

    #[test]
    fn rejects_ragged_rows() {
        let g = Grid(vec![vec![1, 2, 3], vec![1, 2]]);
        assert_eq!(sanitize(g), None);
    }

    #[test]
    fn keeps_rectangular_grid() {
        let g = Grid(vec![vec![1, 2], vec![3, 4]]);
        assert_eq!(sanitize(g.clone()), Some(g));
    }

    #[test]
    fn sanitize_is_idempotent() {
        let g = Grid(vec![vec![1, 2], vec![3, 4]]);
        let once = sanitize(g).unwrap();
        let twice = sanitize(once.clone()).unwrap();
        assert_eq!(once, twice);
    }
}
