//! Durable records: the goal store and the problem state.
//!
//! Loads never fail: a missing, unreadable, malformed, or wrongly shaped record
//! falls back to the type's default and is logged. Saves are best-effort full
//! overwrites; callers decide how to report a failed save.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::core::goals::{Goal, GoalStore};
use crate::core::invariants::validate_problem;
use crate::core::problem::ProblemState;

use super::init::ThurberPaths;

const PROBLEM_KEYS: &[&str] = &[
    "question",
    "steps",
    "current_step_index",
    "cumulative_results",
    "solved",
];
const GOAL_KEYS: &[&str] = &["text", "progress"];

/// File-backed store for the two durable records.
#[derive(Debug, Clone)]
pub struct StateStore {
    paths: ThurberPaths,
}

impl StateStore {
    pub fn new(paths: ThurberPaths) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &ThurberPaths {
        &self.paths
    }

    /// Load goals, promoting legacy plain-string entries to goals without progress.
    pub fn load_goals(&self) -> GoalStore {
        let path = &self.paths.goals_path;
        match read_goals(path) {
            Ok(Some(goals)) => {
                debug!(path = %path.display(), goals = goals.len(), "goals loaded");
                goals
            }
            Ok(None) => {
                debug!(path = %path.display(), "no goal record, starting empty");
                GoalStore::default()
            }
            Err(err) => {
                warn!(path = %path.display(), err = %format!("{err:#}"), "ignoring goal record");
                GoalStore::default()
            }
        }
    }

    pub fn load_problem(&self) -> ProblemState {
        let path = &self.paths.problem_path;
        match read_problem(path) {
            Ok(Some(state)) => {
                debug!(
                    path = %path.display(),
                    steps = state.steps.len(),
                    current_step_index = state.current_step_index,
                    solved = state.solved,
                    "problem state loaded"
                );
                state
            }
            Ok(None) => {
                debug!(path = %path.display(), "no problem record, starting empty");
                ProblemState::default()
            }
            Err(err) => {
                warn!(path = %path.display(), err = %format!("{err:#}"), "ignoring problem record");
                ProblemState::default()
            }
        }
    }

    pub fn save_goals(&self, goals: &GoalStore) -> Result<()> {
        debug!(path = %self.paths.goals_path.display(), goals = goals.len(), "writing goals");
        write_json(&self.paths.goals_path, goals)
    }

    pub fn save_problem(&self, state: &ProblemState) -> Result<()> {
        debug!(
            path = %self.paths.problem_path.display(),
            current_step_index = state.current_step_index,
            solved = state.solved,
            "writing problem state"
        );
        write_json(&self.paths.problem_path, state)
    }
}

fn read_goals(path: &Path) -> Result<Option<GoalStore>> {
    let Some(value) = read_json(path)? else {
        return Ok(None);
    };
    let entries = value
        .as_array()
        .ok_or_else(|| anyhow!("goal record must be an array"))?;

    let mut goals = Vec::with_capacity(entries.len());
    let mut promoted = 0usize;
    for (idx, entry) in entries.iter().enumerate() {
        match entry {
            Value::String(text) => {
                goals.push(Goal::new(text.clone()));
                promoted += 1;
            }
            Value::Object(_) => {
                ensure_keys(entry, GOAL_KEYS).with_context(|| format!("goal entry {idx}"))?;
                let goal: Goal = serde_json::from_value(entry.clone())
                    .with_context(|| format!("parse goal entry {idx}"))?;
                goals.push(goal);
            }
            other => bail!("goal entry {idx}: expected string or object, got {other}"),
        }
    }
    if promoted > 0 {
        info!(promoted, "promoted legacy goal entries");
    }
    Ok(Some(GoalStore::from_goals(goals)))
}

fn read_problem(path: &Path) -> Result<Option<ProblemState>> {
    let Some(value) = read_json(path)? else {
        return Ok(None);
    };
    ensure_keys(&value, PROBLEM_KEYS)?;
    let state: ProblemState = serde_json::from_value(value).context("parse problem state")?;
    let errors = validate_problem(&state);
    if !errors.is_empty() {
        bail!("problem state invariants failed: {}", errors.join("; "));
    }
    Ok(Some(state))
}

fn read_json(path: &Path) -> Result<Option<Value>> {
    if !path.exists() {
        return Ok(None);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let value = serde_json::from_str(&contents)
        .with_context(|| format!("parse {}", path.display()))?;
    Ok(Some(value))
}

/// Require `value` to be an object whose key set is exactly `expected`.
fn ensure_keys(value: &Value, expected: &[&str]) -> Result<()> {
    let object = value
        .as_object()
        .ok_or_else(|| anyhow!("expected a JSON object"))?;
    let actual: BTreeSet<&str> = object.keys().map(String::as_str).collect();
    let expected: BTreeSet<&str> = expected.iter().copied().collect();
    if actual != expected {
        let missing: Vec<&str> = expected.difference(&actual).copied().collect();
        let unexpected: Vec<&str> = actual.difference(&expected).copied().collect();
        bail!("key mismatch (missing: {missing:?}, unexpected: {unexpected:?})");
    }
    Ok(())
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut buf = serde_json::to_string_pretty(value).context("serialize json")?;
    buf.push('\n');
    super::write_atomic(path, &buf)
}
