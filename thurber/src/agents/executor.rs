//! Executor: advance the current problem by exactly one step.

use thiserror::Error;
use tracing::{info, instrument};

use crate::io::completion::{CompletionClient, CompletionError};
use crate::io::prompt::step_prompt;
use crate::session::Session;

/// Why a step could not be advanced.
#[derive(Debug, Error)]
pub enum AdvanceError {
    /// The problem is not decomposed yet, or already solved.
    #[error("no pending step to advance")]
    NoPendingStep,
    #[error("step {number} failed: {source}")]
    Completion {
        number: usize,
        #[source]
        source: CompletionError,
    },
    #[error(transparent)]
    Prompt(#[from] anyhow::Error),
}

/// A successfully executed step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepAdvance {
    /// One-based step number.
    pub number: usize,
    pub total: usize,
    pub step: String,
    pub result: String,
    pub solved: bool,
}

/// Execute the pending step of the session's problem.
///
/// On success the result is appended to the cumulative results, the step index
/// moves forward, the reply is recorded as an assistant message, and the problem
/// state is persisted once. On any error nothing is mutated, so the same step is
/// attempted again on the next call.
#[instrument(skip_all)]
pub async fn advance<C>(session: &mut Session, client: &C) -> Result<StepAdvance, AdvanceError>
where
    C: CompletionClient + ?Sized,
{
    let pending = session
        .problem
        .pending_step()
        .ok_or(AdvanceError::NoPendingStep)?;
    let number = pending.number();
    let step = pending.text.to_string();
    let total = session.problem.steps.len();

    let prompt = step_prompt(number, &step, &session.problem.cumulative_results)?;
    let messages = session.history.with_prompt(&prompt);
    let result = client
        .complete(&messages)
        .await
        .map_err(|source| AdvanceError::Completion { number, source })?;

    let solved = session
        .problem
        .record_step_result(result.clone())
        .map_err(|_| AdvanceError::NoPendingStep)?;
    session.history.push_assistant(result.clone());
    session.persist_problem();
    info!(number, total, solved, "step advanced");

    Ok(StepAdvance {
        number,
        total,
        step,
        result,
        solved,
    })
}
