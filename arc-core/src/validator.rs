use arc_provider::Grid;

/// Correctness verdicts for one analysis. Computed eagerly at
/// analysis time and stored on the explanation row — never recomputed
/// lazily on read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrectnessVerdict {
    pub is_prediction_correct: Option<bool>,
    pub multi_test_all_correct: Option<bool>,
    pub per_test_correctness: Vec<bool>,
}

fn grids_equal(predicted: &Grid, expected: &Grid) -> bool {
    predicted.0 == expected.0
}

/// Compares each predicted grid against its ground truth via deep structural
/// equality (same dimensions, same integers). `predictions` and
/// `expected` must be the same length as the puzzle's test cases; a `None`
/// on either side counts as not-correct for that test.
pub fn validate(predictions: &[Option<Grid>], expected: &[Option<Grid>]) -> CorrectnessVerdict {
    let per_test: Vec<bool> = predictions
        .iter()
        .zip(expected.iter())
        .map(|(pred, exp)| match (pred, exp) {
            (Some(p), Some(e)) => grids_equal(p, e),
            _ => false,
        })
        .collect();

    if per_test.len() <= 1 {
        CorrectnessVerdict {
            is_prediction_correct: per_test.first().copied(),
            multi_test_all_correct: None,
            per_test_correctness: per_test,
        }
    } else {
        let all_correct = per_test.iter().all(|&c| c);
        CorrectnessVerdict {
            is_prediction_correct: None,
            multi_test_all_correct: Some(all_correct),
            per_test_correctness: per_test,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_test_correct() {
        let g = Grid(vec![vec![1, 2]]);
        let v = validate(&[Some(g.clone())], &[Some(g)]);
        assert_eq!(v.is_prediction_correct, Some(true));
        assert_eq!(v.multi_test_all_correct, None);
    }

    #[test]
    fn single_test_missing_prediction_is_incorrect() {
        let v = validate(&[None], &[Some(Grid(vec![vec![1]]))]);
        assert_eq!(v.is_prediction_correct, Some(false));
    }

    #[test]
    fn multi_test_all_correct_requires_every_match() {
        let a = Grid(vec![vec![1]]);
        let b = Grid(vec![vec![2]]);
        let v = validate(&[Some(a.clone()), Some(b.clone())], &[Some(a), Some(Grid(vec![vec![9]]))]);
        assert_eq!(v.multi_test_all_correct, Some(false));
        assert_eq!(v.per_test_correctness, vec![true, false]);
    }
}
