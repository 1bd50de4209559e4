//! Session context shared by the scheduler and its delegates.

use tracing::warn;

use crate::core::goals::GoalStore;
use crate::core::history::ConversationHistory;
use crate::core::problem::ProblemState;
use crate::io::store::StateStore;

/// All mutable state of one interactive session.
///
/// Built once at startup from the durable records. Every mutation of `problem`
/// or `goals` is followed by the matching `persist_*` call; save failures are
/// logged and queued as operator notices, never propagated.
#[derive(Debug)]
pub struct Session {
    pub history: ConversationHistory,
    pub problem: ProblemState,
    pub goals: GoalStore,
    store: StateStore,
    notices: Vec<String>,
}

impl Session {
    /// Load both durable records (falling back to defaults) with an empty history.
    pub fn load(store: StateStore) -> Self {
        let problem = store.load_problem();
        let goals = store.load_goals();
        Self::new(store, problem, goals)
    }

    pub fn new(store: StateStore, problem: ProblemState, goals: GoalStore) -> Self {
        Self {
            history: ConversationHistory::new(),
            problem,
            goals,
            store,
            notices: Vec::new(),
        }
    }

    pub fn persist_problem(&mut self) {
        if let Err(err) = self.store.save_problem(&self.problem) {
            warn!(err = %format!("{err:#}"), "failed to save problem state");
            self.notices
                .push(format!("Warning: failed to save problem state: {err:#}"));
        }
    }

    pub fn persist_goals(&mut self) {
        if let Err(err) = self.store.save_goals(&self.goals) {
            warn!(err = %format!("{err:#}"), "failed to save goals");
            self.notices
                .push(format!("Warning: failed to save goals: {err:#}"));
        }
    }

    /// Drain operator notices queued since the last call.
    pub fn take_notices(&mut self) -> Vec<String> {
        std::mem::take(&mut self.notices)
    }
}
