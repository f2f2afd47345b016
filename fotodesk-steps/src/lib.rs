//! fotodesk-steps - task-breakdown assistant engine
//!
//! Splits a large task into short steps via a language-model API and tracks
//! completion progress, persisting the plan to a local JSON file. Headless:
//! the bundled CLI is one front end, any other can drive [`TaskSession`].

pub mod generator;
pub mod plan;
pub mod session;

pub use generator::StepGenerator;
pub use plan::{PlanStore, TaskPlan};
pub use session::{StepStatus, TaskSession};
