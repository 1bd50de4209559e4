//! Test-only helpers: scripted completion client and temp-dir sessions.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tempfile::TempDir;

use crate::core::goals::GoalStore;
use crate::core::history::Message;
use crate::core::problem::ProblemState;
use crate::io::completion::{CompletionClient, CompletionError};
use crate::io::init::ThurberPaths;
use crate::io::store::StateStore;
use crate::session::Session;

/// One scripted reply: `Ok(text)` or a transport failure with the given body.
pub type ScriptedReply = Result<String, String>;

/// Completion client that replays queued replies and records every request.
///
/// Tracks how many calls are in flight at once so tests can assert that the
/// scheduler never overlaps completion requests.
#[derive(Debug, Default)]
pub struct ScriptedClient {
    replies: Mutex<VecDeque<ScriptedReply>>,
    requests: Mutex<Vec<Vec<Message>>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedClient {
    pub fn new(replies: Vec<ScriptedReply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            ..Self::default()
        }
    }

    /// Every message list sent so far, in call order.
    pub fn requests(&self) -> Vec<Vec<Message>> {
        self.requests.lock().expect("requests lock").clone()
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().expect("requests lock").len()
    }

    /// Highest number of simultaneously running `complete` calls observed.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    async fn complete(&self, messages: &[Message]) -> Result<String, CompletionError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        self.requests
            .lock()
            .expect("requests lock")
            .push(messages.to_vec());

        tokio::task::yield_now().await;

        let reply = self.replies.lock().expect("replies lock").pop_front();
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        match reply {
            Some(Ok(text)) => Ok(text),
            Some(Err(body)) => Err(CompletionError::Status { status: 500, body }),
            None => Err(CompletionError::Status {
                status: 500,
                body: "no scripted reply left".to_string(),
            }),
        }
    }
}

/// A temporary project root with a state store.
pub struct TestState {
    pub dir: TempDir,
    pub store: StateStore,
}

impl TestState {
    pub fn new() -> std::io::Result<Self> {
        let dir = tempfile::tempdir()?;
        let store = StateStore::new(ThurberPaths::new(dir.path()));
        Ok(Self { dir, store })
    }

    /// Fresh session over this state with the given in-memory records.
    pub fn session(&self, problem: ProblemState, goals: GoalStore) -> Session {
        Session::new(self.store.clone(), problem, goals)
    }

    /// Session loaded from whatever is currently on disk.
    pub fn load_session(&self) -> Session {
        Session::load(self.store.clone())
    }
}

/// Problem already decomposed into `steps`, nothing executed yet.
pub fn decomposed_problem(question: &str, steps: &[&str]) -> ProblemState {
    let mut problem = ProblemState::for_question(question);
    problem.assign_steps(steps.iter().map(|s| s.to_string()).collect());
    problem
}

/// Goal store with the given goals, none with progress.
pub fn goals(texts: &[&str]) -> GoalStore {
    let mut store = GoalStore::new();
    for text in texts {
        store.add(text);
    }
    store
}
