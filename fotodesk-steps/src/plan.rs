//! Task plan state and JSON persistence
//!
//! The plan file is best-effort: a missing or corrupt file loads as an empty
//! plan, saves create the parent directory on demand.

use fotodesk_common::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One task broken into ordered steps, with a completion cursor
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TaskPlan {
    /// The large task as entered
    #[serde(default)]
    pub task: String,
    /// Generated steps, in order
    #[serde(default)]
    pub steps: Vec<String>,
    /// Index of the first not-yet-done step; equals `steps.len()` when done
    #[serde(default)]
    pub current_index: usize,
}

impl TaskPlan {
    /// Start over with a new task and steps
    pub fn reset(&mut self, task: String, steps: Vec<String>) {
        self.task = task;
        self.steps = steps;
        self.current_index = 0;
    }

    /// Text of the step currently being worked on
    pub fn current_step(&self) -> Option<&str> {
        self.steps.get(self.current_index).map(String::as_str)
    }

    /// Mark the current step done and advance
    pub fn mark_done(&mut self) {
        if self.current_index < self.steps.len() {
            self.current_index += 1;
        }
    }

    /// Whether every step has been marked done
    pub fn is_complete(&self) -> bool {
        !self.steps.is_empty() && self.current_index >= self.steps.len()
    }

    /// Progress as (done, total)
    pub fn progress(&self) -> (usize, usize) {
        (self.current_index.min(self.steps.len()), self.steps.len())
    }
}

/// JSON-file-backed store for a [`TaskPlan`]
pub struct PlanStore {
    path: PathBuf,
}

impl PlanStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Load the persisted plan; missing or unreadable files load empty
    pub fn load(&self) -> TaskPlan {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(plan) => plan,
                Err(e) => {
                    tracing::warn!(
                        file = %self.path.display(),
                        error = %e,
                        "Plan file is corrupt, starting empty"
                    );
                    TaskPlan::default()
                }
            },
            Err(_) => TaskPlan::default(),
        }
    }

    /// Persist the plan, creating the parent directory if needed
    pub fn save(&self, plan: &TaskPlan) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(plan)
            .map_err(|e| fotodesk_common::Error::Internal(e.to_string()))?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }

    /// Remove the plan file; missing files are not an error
    pub fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan_with_steps() -> TaskPlan {
        TaskPlan {
            task: "clean the studio".to_string(),
            steps: vec![
                "gather loose cables".to_string(),
                "wipe the desk".to_string(),
                "vacuum".to_string(),
            ],
            current_index: 0,
        }
    }

    #[test]
    fn mark_done_advances_to_completion() {
        let mut plan = plan_with_steps();
        assert_eq!(plan.current_step(), Some("gather loose cables"));

        plan.mark_done();
        assert_eq!(plan.current_step(), Some("wipe the desk"));
        assert_eq!(plan.progress(), (1, 3));

        plan.mark_done();
        plan.mark_done();
        assert!(plan.is_complete());
        assert_eq!(plan.current_step(), None);
        assert_eq!(plan.progress(), (3, 3));

        // Marking past the end stays put
        plan.mark_done();
        assert_eq!(plan.progress(), (3, 3));
    }

    #[test]
    fn empty_plan_is_not_complete() {
        let plan = TaskPlan::default();
        assert!(!plan.is_complete());
        assert_eq!(plan.current_step(), None);
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = PlanStore::new(dir.path().join("nested").join("tasks.json"));

        let mut plan = plan_with_steps();
        plan.mark_done();
        store.save(&plan).unwrap();

        let loaded = store.load();
        assert_eq!(loaded, plan);
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = PlanStore::new(dir.path().join("tasks.json"));
        assert_eq!(store.load(), TaskPlan::default());
    }

    #[test]
    fn corrupt_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        std::fs::write(&path, "{not json").unwrap();

        let store = PlanStore::new(path);
        assert_eq!(store.load(), TaskPlan::default());
    }

    #[test]
    fn clear_tolerates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = PlanStore::new(dir.path().join("tasks.json"));
        store.clear().unwrap();

        store.save(&plan_with_steps()).unwrap();
        store.clear().unwrap();
        assert!(!store.path().exists());
    }
}
