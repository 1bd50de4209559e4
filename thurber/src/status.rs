//! Read-only summary of the durable records for `thurber status`.

use std::fmt::Write;

use crate::core::goals::GoalStore;
use crate::core::problem::ProblemState;

/// Render the problem and goal records as plain text.
pub fn render_status(problem: &ProblemState, goals: &GoalStore) -> String {
    let mut out = String::new();
    match &problem.question {
        None => out.push_str("Problem: none\n"),
        Some(question) => {
            let _ = writeln!(out, "Problem: {question}");
            let state = if problem.solved { "solved" } else { "in progress" };
            let _ = writeln!(
                out,
                "Steps: {}/{} ({state})",
                problem.completed_steps(),
                problem.steps.len()
            );
            for (idx, step) in problem.steps.iter().enumerate() {
                let mark = if idx < problem.completed_steps() { 'x' } else { ' ' };
                let _ = writeln!(out, "  [{mark}] {}. {step}", idx + 1);
            }
        }
    }

    if goals.is_empty() {
        out.push_str("Goals: none\n");
    } else {
        let _ = writeln!(out, "Goals: {}", goals.len());
        for goal in goals.goals() {
            let _ = writeln!(out, "  - {} ({} progress)", goal.text, goal.progress.len());
        }
    }
    out
}
