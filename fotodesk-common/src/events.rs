//! Event types for the fotodesk job event system
//!
//! Provides the shared event definitions and `EventBus` used to report batch
//! job progress to whatever presentation layer is attached. Events are
//! broadcast; delivery is safe from any thread/task and subscribers do their
//! own marshaling into a UI context if they have one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Lifecycle states of a batch job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobState {
    /// No job has started (or the last start attempt failed validation)
    Idle,
    /// Worker task is iterating work items
    Running,
    /// All items were attempted
    Completed,
    /// Cancellation was observed at an item boundary
    Cancelled,
}

impl std::fmt::Display for JobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobState::Idle => write!(f, "Idle"),
            JobState::Running => write!(f, "Running"),
            JobState::Completed => write!(f, "Completed"),
            JobState::Cancelled => write!(f, "Cancelled"),
        }
    }
}

/// Job events broadcast via [`EventBus`]
///
/// Serializable so a front end can forward them over SSE or similar verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum JobEvent {
    /// Job transitioned between lifecycle states
    JobStateChanged {
        job_id: Uuid,
        old_state: JobState,
        new_state: JobState,
        timestamp: DateTime<Utc>,
    },

    /// Progress update, emitted once per attempted work item
    JobProgress {
        job_id: Uuid,
        /// Items attempted so far (including failed ones)
        current: usize,
        /// Total items discovered for this job
        total: usize,
    },

    /// Human-readable log line for the presentation layer's log pane
    JobLog { job_id: Uuid, line: String },

    /// One work item finished successfully
    ItemProcessed {
        job_id: Uuid,
        source: String,
        output: String,
        latitude: f64,
        longitude: f64,
    },

    /// One work item failed and was skipped
    ItemFailed {
        job_id: Uuid,
        source: String,
        reason: String,
    },
}

/// Broadcast bus for [`JobEvent`]s
///
/// Thin wrapper around `tokio::sync::broadcast`; events emitted while no
/// subscriber is attached are dropped silently.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<JobEvent>,
}

impl EventBus {
    /// Create a new EventBus buffering up to `capacity` events per subscriber
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Subscribe to all future events
    ///
    /// Events emitted before subscription are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<JobEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all current subscribers
    pub fn emit(&self, event: JobEvent) {
        if self.tx.send(event).is_err() {
            tracing::trace!("Event emitted with no subscribers");
        }
    }
}
