//! Problem state machine: reset, step assignment, step completion.

use serde::{Deserialize, Serialize};

/// Progress through the current decomposed problem.
///
/// Only two transitions mutate this state: [`ProblemState::for_question`] followed by
/// [`ProblemState::assign_steps`] (decomposition), and [`ProblemState::record_step_result`]
/// (execution). See [`crate::core::invariants::validate_problem`] for the invariants.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemState {
    pub question: Option<String>,
    pub steps: Vec<String>,
    pub current_step_index: usize,
    pub cumulative_results: Vec<String>,
    pub solved: bool,
}

/// The next step awaiting execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingStep<'a> {
    /// Zero-based index into `steps`.
    pub index: usize,
    pub text: &'a str,
}

impl PendingStep<'_> {
    /// One-based step number, as shown to the model and the operator.
    pub fn number(&self) -> usize {
        self.index + 1
    }
}

impl ProblemState {
    /// Fresh state for a new question. Any previous progress is discarded.
    pub fn for_question(question: impl Into<String>) -> Self {
        Self {
            question: Some(question.into()),
            ..Self::default()
        }
    }

    /// Install the decomposed step list. Progress counters are left as reset.
    pub fn assign_steps(&mut self, steps: Vec<String>) {
        self.steps = steps;
    }

    /// The step to execute next, if the problem is decomposed and unsolved.
    pub fn pending_step(&self) -> Option<PendingStep<'_>> {
        if self.solved || self.current_step_index >= self.steps.len() {
            return None;
        }
        Some(PendingStep {
            index: self.current_step_index,
            text: &self.steps[self.current_step_index],
        })
    }

    /// True when an idle timeout should advance this problem.
    pub fn has_pending_step(&self) -> bool {
        self.pending_step().is_some()
    }

    /// Record the output of the pending step and move to the next one.
    ///
    /// Returns `Ok(true)` when this completed the final step. Fails without mutating
    /// anything when there is no pending step.
    pub fn record_step_result(&mut self, result: impl Into<String>) -> Result<bool, String> {
        if self.pending_step().is_none() {
            return Err(format!(
                "no pending step (steps={}, current_step_index={}, solved={})",
                self.steps.len(),
                self.current_step_index,
                self.solved
            ));
        }
        self.cumulative_results.push(result.into());
        self.current_step_index += 1;
        if self.current_step_index == self.steps.len() {
            self.solved = true;
        }
        Ok(self.solved)
    }

    /// Number of steps already executed.
    pub fn completed_steps(&self) -> usize {
        self.current_step_index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_step_problem() -> ProblemState {
        let mut state = ProblemState::for_question("P");
        state.assign_steps(vec!["first".to_string(), "second".to_string()]);
        state
    }

    #[test]
    fn for_question_resets_progress() {
        let state = ProblemState::for_question("why?");
        assert_eq!(state.question.as_deref(), Some("why?"));
        assert!(state.steps.is_empty());
        assert_eq!(state.current_step_index, 0);
        assert!(state.cumulative_results.is_empty());
        assert!(!state.solved);
        assert!(!state.has_pending_step());
    }

    #[test]
    fn recording_last_step_marks_solved() {
        let mut state = two_step_problem();

        let pending = state.pending_step().expect("pending");
        assert_eq!(pending.number(), 1);
        assert_eq!(pending.text, "first");
        assert_eq!(state.record_step_result("r1"), Ok(false));

        assert_eq!(state.pending_step().expect("pending").text, "second");
        assert_eq!(state.record_step_result("r2"), Ok(true));

        assert!(state.solved);
        assert_eq!(state.current_step_index, 2);
        assert_eq!(state.cumulative_results, vec!["r1", "r2"]);
        assert!(state.pending_step().is_none());
    }

    #[test]
    fn record_without_pending_step_is_rejected_unchanged() {
        let mut state = ProblemState::for_question("no steps yet");
        let before = state.clone();
        let err = state.record_step_result("x").unwrap_err();
        assert!(err.contains("no pending step"));
        assert_eq!(state, before);
    }
}
