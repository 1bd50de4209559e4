//! Deterministic routing of operator input and idle timeouts.

use crate::core::problem::ProblemState;

const GOAL_PREFIX: &str = "goal:";

/// What a line of operator input asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `exit` or `quit`.
    Exit,
    /// `goal: <text>`; `None` when the text after the prefix is blank.
    Goal(Option<String>),
    /// Anything else starts a new problem.
    Problem(String),
}

/// Work to do when the operator has been idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdleAction {
    AdvanceProblem,
    PonderGoals,
}

/// Classify a line of input. Commands are matched case-insensitively.
pub fn classify_input(text: &str) -> Command {
    let trimmed = text.trim();
    if trimmed.eq_ignore_ascii_case("exit") || trimmed.eq_ignore_ascii_case("quit") {
        return Command::Exit;
    }
    if let Some(rest) = strip_prefix_ignore_case(trimmed, GOAL_PREFIX) {
        let goal = rest.trim();
        return Command::Goal((!goal.is_empty()).then(|| goal.to_string()));
    }
    Command::Problem(text.to_string())
}

/// Advance the problem while it has a pending step; otherwise ponder goals.
pub fn idle_action(problem: &ProblemState) -> IdleAction {
    if problem.has_pending_step() {
        IdleAction::AdvanceProblem
    } else {
        IdleAction::PonderGoals
    }
}

fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &text[prefix.len()..])
}
