//! Task session: the command surface joining plan store and step generator

use crate::generator::StepGenerator;
use crate::plan::{PlanStore, TaskPlan};
use fotodesk_common::Result;

/// Completion status of one step in the history view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Done,
    Current,
    Pending,
}

/// One task-breakdown session over a persisted plan
pub struct TaskSession {
    store: PlanStore,
    generator: StepGenerator,
    plan: TaskPlan,
}

impl TaskSession {
    /// Open a session, loading whatever plan the store holds
    pub fn open(store: PlanStore, generator: StepGenerator) -> Self {
        let plan = store.load();
        Self {
            store,
            generator,
            plan,
        }
    }

    /// Break a new task into steps and persist the fresh plan
    pub async fn submit_task(&mut self, task: &str) -> Result<()> {
        let steps = self.generator.generate(task).await;
        tracing::info!(task = %task, steps = steps.len(), "New task submitted");
        self.plan.reset(task.to_string(), steps);
        self.store.save(&self.plan)
    }

    /// Mark the current step done, advance, persist
    pub async fn mark_done(&mut self) -> Result<()> {
        self.plan.mark_done();
        self.store.save(&self.plan)
    }

    /// Forget the stored plan
    pub fn clear(&mut self) -> Result<()> {
        self.plan = TaskPlan::default();
        self.store.clear()
    }

    pub fn task(&self) -> &str {
        &self.plan.task
    }

    pub fn current_step(&self) -> Option<&str> {
        self.plan.current_step()
    }

    pub fn is_complete(&self) -> bool {
        self.plan.is_complete()
    }

    /// Progress as (done, total)
    pub fn progress(&self) -> (usize, usize) {
        self.plan.progress()
    }

    /// All steps with their completion status
    pub fn history(&self) -> Vec<(String, StepStatus)> {
        self.plan
            .steps
            .iter()
            .enumerate()
            .map(|(index, step)| {
                let status = if index < self.plan.current_index {
                    StepStatus::Done
                } else if index == self.plan.current_index {
                    StepStatus::Current
                } else {
                    StepStatus::Pending
                };
                (step.clone(), status)
            })
            .collect()
    }
}
