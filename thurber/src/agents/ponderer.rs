//! Ponderer: one background reasoning pass over every persistent goal.

use tracing::{info, instrument, warn};

use crate::io::completion::CompletionClient;
use crate::io::prompt::ponder_prompt;
use crate::session::Session;

/// Result of pondering a single goal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PonderOutcome {
    /// The reply was appended to the goal's progress and saved.
    Recorded { goal: String, entry: String },
    /// The pass for this goal failed; its progress is unchanged.
    Failed { goal: String, error: String },
}

/// Counts for a full pondering pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PonderSummary {
    pub goals: usize,
    pub recorded: usize,
    pub failed: usize,
}

/// Ponder each goal in store order, reporting every outcome through `on_outcome`.
///
/// Each goal's prompt is recorded in the conversation history before its
/// completion call. Successful replies are recorded too, appended to that goal's
/// progress, and the whole goal store is persisted before moving on, so a later
/// failure never loses earlier progress. A failure for one goal does not stop
/// the pass.
#[instrument(skip_all, fields(goals = session.goals.len()))]
pub async fn ponder_all<C, F>(session: &mut Session, client: &C, mut on_outcome: F) -> PonderSummary
where
    C: CompletionClient + ?Sized,
    F: FnMut(&PonderOutcome),
{
    let mut summary = PonderSummary {
        goals: session.goals.len(),
        ..PonderSummary::default()
    };

    for idx in 0..summary.goals {
        let goal = &session.goals.goals()[idx];
        let text = goal.text.clone();
        let outcome = match ponder_prompt(&goal.text, &goal.progress) {
            Ok(prompt) => {
                session.history.push_user(prompt);
                match client.complete(session.history.messages()).await {
                    Ok(entry) => {
                        session.history.push_assistant(entry.clone());
                        match session.goals.record_progress(idx, entry.clone()) {
                            Ok(()) => {
                                session.persist_goals();
                                PonderOutcome::Recorded { goal: text, entry }
                            }
                            Err(error) => PonderOutcome::Failed { goal: text, error },
                        }
                    }
                    Err(err) => PonderOutcome::Failed {
                        goal: text,
                        error: err.to_string(),
                    },
                }
            }
            Err(err) => PonderOutcome::Failed {
                goal: text,
                error: format!("{err:#}"),
            },
        };

        match &outcome {
            PonderOutcome::Recorded { goal, .. } => {
                summary.recorded += 1;
                info!(goal = %goal, "goal progress recorded");
            }
            PonderOutcome::Failed { goal, error } => {
                summary.failed += 1;
                warn!(goal = %goal, err = %error, "pondering goal failed");
            }
        }
        on_outcome(&outcome);
    }

    summary
}
