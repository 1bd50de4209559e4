//! Decomposer: turn a new problem statement into an ordered step list.

use anyhow::{Context, Result};
use tracing::{info, instrument};

use crate::core::steps::{ExtractedSteps, extract_steps};
use crate::io::completion::CompletionClient;
use crate::io::prompt::decompose_prompt;
use crate::session::Session;

/// Ask the model for a step plan and install it on the session's problem.
///
/// The caller resets the problem state first. On failure no steps are assigned
/// and the reset state stays as it is. The instruction itself is not recorded in
/// the conversation history.
#[instrument(skip_all, fields(question_len = question.len()))]
pub async fn decompose<C>(
    session: &mut Session,
    client: &C,
    question: &str,
) -> Result<ExtractedSteps>
where
    C: CompletionClient + ?Sized,
{
    let prompt = decompose_prompt(question)?;
    let messages = session.history.with_prompt(&prompt);
    let reply = client
        .complete(&messages)
        .await
        .context("decompose problem")?;

    let extracted = extract_steps(&reply);
    info!(
        strategy = extracted.strategy,
        steps = extracted.steps.len(),
        "problem decomposed"
    );
    session.problem.assign_steps(extracted.steps.clone());
    session.persist_problem();
    Ok(extracted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::goals::GoalStore;
    use crate::core::history::{Message, Role};
    use crate::core::problem::ProblemState;
    use crate::test_support::{ScriptedClient, TestState};

    #[tokio::test]
    async fn assigns_numbered_steps_and_persists() {
        let state = TestState::new().expect("state");
        let mut session = state.session(ProblemState::for_question("P"), GoalStore::new());
        session.history.push_user("earlier");
        let client = ScriptedClient::new(vec![Ok("1. Gather data\n2. Analyze\n3. Report".into())]);

        let extracted = decompose(&mut session, &client, "P").await.expect("decompose");

        assert_eq!(extracted.strategy, "numbered");
        assert_eq!(session.problem.steps, vec!["Gather data", "Analyze", "Report"]);
        assert_eq!(session.problem.current_step_index, 0);
        assert_eq!(state.store.load_problem(), session.problem);

        let requests = client.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0][0], Message::user("earlier"));
        let last = requests[0].last().expect("prompt");
        assert_eq!(last.role, Role::User);
        assert!(last.content.contains("sequential steps: P"));
        // The instruction is not recorded in history.
        assert_eq!(session.history.len(), 1);
    }

    #[tokio::test]
    async fn unparseable_reply_becomes_single_step() {
        let state = TestState::new().expect("state");
        let mut session = state.session(ProblemState::for_question("P"), GoalStore::new());
        let client = ScriptedClient::new(vec![Ok("  Just think about it.  ".into())]);

        decompose(&mut session, &client, "P").await.expect("decompose");

        assert_eq!(session.problem.steps, vec!["Just think about it."]);
    }

    #[tokio::test]
    async fn transport_failure_leaves_reset_state() {
        let state = TestState::new().expect("state");
        let mut session = state.session(ProblemState::for_question("P"), GoalStore::new());
        let client = ScriptedClient::new(vec![Err("service unavailable".into())]);

        let err = decompose(&mut session, &client, "P").await.unwrap_err();

        assert!(format!("{err:#}").contains("service unavailable"));
        assert_eq!(session.problem, ProblemState::for_question("P"));
        assert!(!state.store.paths().problem_path.exists());
    }
}
