//! Persistent goals and their progress logs.

use serde::{Deserialize, Serialize};

/// A long-lived goal revisited whenever the operator is idle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub text: String,
    pub progress: Vec<String>,
}

impl Goal {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            progress: Vec::new(),
        }
    }
}

/// Result of [`GoalStore::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddGoal {
    Added,
    AlreadyExists,
}

/// Insertion-ordered set of goals keyed by exact text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GoalStore {
    goals: Vec<Goal>,
}

impl GoalStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_goals(goals: Vec<Goal>) -> Self {
        let mut store = Self::new();
        for goal in goals {
            if store.get(&goal.text).is_none() {
                store.goals.push(goal);
            }
        }
        store
    }

    /// Register a goal unless one with exactly this text already exists.
    pub fn add(&mut self, text: &str) -> AddGoal {
        if self.get(text).is_some() {
            return AddGoal::AlreadyExists;
        }
        self.goals.push(Goal::new(text));
        AddGoal::Added
    }

    pub fn get(&self, text: &str) -> Option<&Goal> {
        self.goals.iter().find(|goal| goal.text == text)
    }

    /// Append a progress entry to the goal at `index` (store order).
    pub fn record_progress(&mut self, index: usize, entry: impl Into<String>) -> Result<(), String> {
        let goals = self.goals.len();
        let goal = self
            .goals
            .get_mut(index)
            .ok_or_else(|| format!("goal index {index} out of range ({goals} goals)"))?;
        goal.progress.push(entry.into());
        Ok(())
    }

    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    pub fn len(&self) -> usize {
        self.goals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.goals.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_is_idempotent_on_exact_text() {
        let mut store = GoalStore::new();
        assert_eq!(store.add("learn rust"), AddGoal::Added);
        store.record_progress(0, "read the book").expect("progress");

        assert_eq!(store.add("learn rust"), AddGoal::AlreadyExists);

        assert_eq!(store.len(), 1);
        assert_eq!(store.goals()[0].progress, vec!["read the book"]);
    }

    #[test]
    fn uniqueness_is_case_sensitive() {
        let mut store = GoalStore::new();
        store.add("Learn Rust");
        assert_eq!(store.add("learn rust"), AddGoal::Added);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn preserves_insertion_order() {
        let mut store = GoalStore::new();
        store.add("b");
        store.add("a");
        store.add("c");
        let texts: Vec<&str> = store.goals().iter().map(|g| g.text.as_str()).collect();
        assert_eq!(texts, vec!["b", "a", "c"]);
    }

    #[test]
    fn from_goals_drops_duplicates_keeping_first() {
        let mut first = Goal::new("dup");
        first.progress.push("kept".to_string());
        let store = GoalStore::from_goals(vec![first, Goal::new("dup"), Goal::new("other")]);
        assert_eq!(store.len(), 2);
        assert_eq!(store.goals()[0].progress, vec!["kept"]);
    }

    #[test]
    fn serializes_as_plain_array() {
        let mut store = GoalStore::new();
        store.add("g");
        let json = serde_json::to_string(&store).expect("serialize");
        assert_eq!(json, r#"[{"text":"g","progress":[]}]"#);
    }
}
