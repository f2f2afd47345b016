//! fotodesk-geotag - batch image geotagging engine
//!
//! Assigns randomized location/keyword metadata to a folder of images via a
//! rate-limited geocoding lookup, embeds the result into EXIF/PNG metadata,
//! and writes renamed copies into an output subdirectory.
//!
//! The engine is presentation-agnostic: a front end issues `start_job` /
//! `cancel_job` commands on [`GeotagApp`] and subscribes to the
//! [`EventBus`](fotodesk_common::events::EventBus) for progress and log
//! events. The bundled CLI binary is one such front end.

pub mod job;
pub mod services;

pub use job::{ItemOutcome, ItemResult, JobOutcome, JobSpec};

use fotodesk_common::events::EventBus;
use fotodesk_common::{Error, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Handle to a spawned job
///
/// Cancellation is cooperative: the worker observes it at the next item
/// boundary, never mid-item.
pub struct JobHandle {
    pub job_id: Uuid,
    cancel_token: CancellationToken,
    join: JoinHandle<Result<JobOutcome>>,
}

impl JobHandle {
    /// Request cooperative cancellation
    pub fn cancel(&self) {
        self.cancel_token.cancel();
    }

    /// Wait for the job's terminal outcome
    pub async fn wait(&mut self) -> Result<JobOutcome> {
        (&mut self.join)
            .await
            .map_err(|e| Error::Internal(format!("job task failed: {}", e)))?
    }
}

/// Releases the single-job slot when the worker task ends, panicked or not
struct RunningGuard(Arc<AtomicBool>);

impl Drop for RunningGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Command surface of the geotag engine
///
/// At most one job runs at a time; starting a second one while the first is
/// active is rejected. Cloning shares the same single-job slot.
#[derive(Clone)]
pub struct GeotagApp {
    event_bus: EventBus,
    geocoder_url: Option<String>,
    current_cancel: Arc<Mutex<Option<CancellationToken>>>,
    running: Arc<AtomicBool>,
}

impl GeotagApp {
    pub fn new(event_bus: EventBus) -> Self {
        Self {
            event_bus,
            geocoder_url: None,
            current_cancel: Arc::new(Mutex::new(None)),
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Point jobs at a non-default geocoding endpoint (used by tests)
    pub fn with_geocoder_url(mut self, url: impl Into<String>) -> Self {
        self.geocoder_url = Some(url.into());
        self
    }

    /// Start a job on a background worker task
    ///
    /// Fails with a validation error, while the engine stays idle and nothing
    /// is created on disk, when the spec is invalid or a job is already
    /// running. Must be called within a tokio runtime.
    pub fn start_job(&self, spec: JobSpec) -> Result<JobHandle> {
        spec.validate()?;

        if self.running.swap(true, Ordering::SeqCst) {
            return Err(Error::Validation("a job is already running".to_string()));
        }

        let job_id = Uuid::new_v4();
        let cancel_token = CancellationToken::new();
        *self.current_cancel.lock().unwrap() = Some(cancel_token.clone());

        let mut runner = services::JobRunner::new(self.event_bus.clone());
        if let Some(url) = &self.geocoder_url {
            runner = runner.with_geocoder_url(url.clone());
        }

        let slot = RunningGuard(Arc::clone(&self.running));
        let worker_token = cancel_token.clone();
        let join = tokio::spawn(async move {
            let _slot = slot;
            runner.run(job_id, spec, worker_token).await
        });

        Ok(JobHandle {
            job_id,
            cancel_token,
            join,
        })
    }

    /// Request cancellation of the active job, if any
    pub fn cancel_job(&self) {
        if let Some(token) = self.current_cancel.lock().unwrap().as_ref() {
            tracing::info!("Cancelling current job");
            token.cancel();
        }
    }

    /// Whether a job is currently running
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}
