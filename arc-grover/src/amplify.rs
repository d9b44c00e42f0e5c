use arc_core::GroverProgramResult;

/// Top-K kept across iterations before amplification. Treated as a tuning
/// knob rather than a fixed algorithmic constant.
pub const AMPLIFY_TOP_K: usize = 3;

/// Sorts ascending by score, then keeps the top K with the best LAST — the
/// LLM pays most attention to the tail of its conversation.
pub fn select_and_order(mut programs: Vec<GroverProgramResult>) -> Vec<GroverProgramResult> {
    programs.sort_by(|a, b| a.score.partial_cmp(&b.score).unwrap_or(std::cmp::Ordering::Equal));
    let keep = programs.len().saturating_sub(AMPLIFY_TOP_K.min(programs.len()));
    programs.split_off(keep)
}

/// Renders the cumulative "best programs so far" block injected into the
/// next iteration's continuation prompt, annotated with each program's
/// training score (to one decimal) and the iteration it came from.
pub fn render_context(ordered: &[(u32, GroverProgramResult)]) -> String {
    let mut out = String::from("Best programs found so far, worst to best:\n\n");
    for (iteration, program) in ordered {
        out.push_str(&format!(
            "// from iteration {iteration}, training score {:.1}/10\n```python\n{}\n```\n\n",
            program.score, program.code
        ));
    }
    out.push_str("Refine these into improved programs that score higher on the training examples.");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prog(score: f64) -> GroverProgramResult {
        GroverProgramResult { code: format!("# score {score}"), score, error: None }
    }

    #[test]
    fn keeps_top_k_best_last() {
        let programs = vec![prog(1.0), prog(9.0), prog(3.0), prog(7.0), prog(5.0)];
        let ordered = select_and_order(programs);
        assert_eq!(ordered.len(), AMPLIFY_TOP_K);
        assert_eq!(ordered.last().unwrap().score, 9.0);
        assert!(ordered[0].score <= ordered[1].score);
    }

    #[test]
    fn fewer_than_k_keeps_all() {
        let programs = vec![prog(1.0), prog(2.0)];
        let ordered = select_and_order(programs);
        assert_eq!(ordered.len(), 2);
    }
}
