//! Top-level interaction loop.
//!
//! Each iteration waits for either a line of operator input or the idle timeout
//! and performs exactly one action. Delegates are awaited one at a time, so at
//! most one completion request is ever in flight.

use std::fmt::Display;
use std::io::Write;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::agents::decomposer::decompose;
use crate::agents::executor::advance;
use crate::agents::ponderer::{PonderOutcome, ponder_all};
use crate::core::goals::AddGoal;
use crate::core::problem::ProblemState;
use crate::core::router::{Command, IdleAction, classify_input, idle_action};
use crate::io::completion::CompletionClient;
use crate::io::input::{Event, InputSlot};
use crate::session::Session;

/// Whether the loop keeps going after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Drives a [`Session`] from operator input and idle timeouts.
pub struct Scheduler<'a, C: ?Sized, W> {
    session: &'a mut Session,
    client: &'a C,
    console: W,
    idle: Duration,
}

impl<'a, C, W> Scheduler<'a, C, W>
where
    C: CompletionClient + ?Sized,
    W: Write,
{
    pub fn new(session: &'a mut Session, client: &'a C, console: W, idle: Duration) -> Self {
        Self {
            session,
            client,
            console,
            idle,
        }
    }

    pub fn session(&self) -> &Session {
        self.session
    }

    pub fn console(&self) -> &W {
        &self.console
    }

    /// Run until the operator exits or input closes.
    pub async fn run(&mut self, input: &mut InputSlot) {
        info!(idle_secs = self.idle.as_secs(), "scheduler started");
        loop {
            let event = input.wait_for_event(self.idle).await;
            if self.handle_event(event).await == Flow::Exit {
                break;
            }
        }
        info!("scheduler stopped");
    }

    /// Dispatch one event. Delegate failures are reported, never returned.
    pub async fn handle_event(&mut self, event: Event) -> Flow {
        debug!(?event, "event");
        let flow = match event {
            Event::Input(text) => self.handle_input(text).await,
            Event::Timeout => {
                self.handle_idle().await;
                Flow::Continue
            }
            Event::Closed => {
                info!("input closed");
                Flow::Exit
            }
        };
        for notice in self.session.take_notices() {
            say(&mut self.console, notice);
        }
        flow
    }

    async fn handle_input(&mut self, text: String) -> Flow {
        match classify_input(&text) {
            Command::Exit => {
                say(&mut self.console, "Goodbye.");
                Flow::Exit
            }
            Command::Goal(None) => {
                say(&mut self.console, "No goal provided.");
                Flow::Continue
            }
            Command::Goal(Some(goal)) => {
                self.add_goal(&goal);
                Flow::Continue
            }
            Command::Problem(question) => {
                self.start_problem(question).await;
                Flow::Continue
            }
        }
    }

    fn add_goal(&mut self, goal: &str) {
        match self.session.goals.add(goal) {
            AddGoal::Added => {
                self.session.persist_goals();
                info!(goal, "goal added");
                say(&mut self.console, format!("Goal added: {goal}"));
            }
            AddGoal::AlreadyExists => {
                say(&mut self.console, format!("Goal already exists: {goal}"));
            }
        }
    }

    async fn start_problem(&mut self, question: String) {
        let previous = &self.session.problem;
        if previous.has_pending_step() {
            say(
                &mut self.console,
                format!(
                    "Discarding unfinished problem ({} of {} steps done).",
                    previous.completed_steps(),
                    previous.steps.len()
                ),
            );
        }

        self.session.problem = ProblemState::for_question(question.clone());
        self.session.persist_problem();

        match decompose(self.session, self.client, &question).await {
            Ok(extracted) => {
                say(
                    &mut self.console,
                    format!("Planned {} step(s):", extracted.steps.len()),
                );
                for (idx, step) in extracted.steps.iter().enumerate() {
                    say(&mut self.console, format!("  {}. {step}", idx + 1));
                }
            }
            Err(err) => say(
                &mut self.console,
                format!("Error: could not plan the problem: {err:#}"),
            ),
        }

        self.session.history.push_user(question);
    }

    async fn handle_idle(&mut self) {
        match idle_action(&self.session.problem) {
            IdleAction::AdvanceProblem => self.advance_problem().await,
            IdleAction::PonderGoals => self.ponder_goals().await,
        }
    }

    async fn advance_problem(&mut self) {
        match advance(self.session, self.client).await {
            Ok(step) => {
                say(
                    &mut self.console,
                    format!("Step {}/{}: {}", step.number, step.total, step.step),
                );
                say(&mut self.console, &step.result);
                if step.solved {
                    say(&mut self.console, "Problem solved.");
                }
            }
            Err(err) => say(&mut self.console, format!("Error: {err}")),
        }
    }

    async fn ponder_goals(&mut self) {
        if self.session.goals.is_empty() {
            say(&mut self.console, "Nothing to ponder.");
            return;
        }
        let console = &mut self.console;
        let summary = ponder_all(self.session, self.client, |outcome| match outcome {
            PonderOutcome::Recorded { goal, entry } => {
                say(&mut *console, format!("Pondering goal: {goal}"));
                say(&mut *console, entry);
            }
            PonderOutcome::Failed { goal, error } => {
                say(&mut *console, format!("Error pondering goal '{goal}': {error}"));
            }
        })
        .await;
        debug!(?summary, "pondering pass finished");
    }
}

/// Write one line of operator-facing output.
fn say<W: Write>(console: &mut W, message: impl Display) {
    if let Err(err) = writeln!(console, "{message}").and_then(|()| console.flush()) {
        warn!(err = %err, "failed to write to console");
    }
}
