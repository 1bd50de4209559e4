//! Semantic invariants for persisted problem state.

use crate::core::problem::ProblemState;

/// Check the problem-state invariants:
/// - `current_step_index <= steps.len()`
/// - `cumulative_results.len() == current_step_index`
/// - `solved` implies a non-empty step list that has been fully executed
pub fn validate_problem(state: &ProblemState) -> Vec<String> {
    let mut errors = Vec::new();
    let steps = state.steps.len();

    if state.current_step_index > steps {
        errors.push(format!(
            "current_step_index {} exceeds step count {}",
            state.current_step_index, steps
        ));
    }

    if state.cumulative_results.len() != state.current_step_index {
        errors.push(format!(
            "cumulative_results has {} entries but current_step_index is {}",
            state.cumulative_results.len(),
            state.current_step_index
        ));
    }

    if state.solved {
        if steps == 0 {
            errors.push("solved problem must have at least one step".to_string());
        } else if state.current_step_index != steps {
            errors.push(format!(
                "solved problem stopped at step {} of {}",
                state.current_step_index, steps
            ));
        }
    }

    errors
}
