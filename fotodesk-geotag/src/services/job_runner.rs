//! Batch job orchestrator
//!
//! Drives one job through `Idle → Running → {Completed, Cancelled}`:
//! directory listing, then a per-image loop of rate-limited geocode lookup,
//! metadata write, and progress/log events. Item failures are isolated: they
//! are logged and the loop moves on. The cancellation token is checked once
//! per item boundary, so a cancel never deletes partially written output and
//! never interrupts an item midway.

use crate::job::{ItemOutcome, ItemResult, JobOutcome, JobSpec};
use crate::services::{Geocoder, ImageScanner, MetadataWriter, NameAllocator};
use fotodesk_common::events::{EventBus, JobEvent, JobState};
use fotodesk_common::{Error, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Orchestrator for batch geotag jobs
pub struct JobRunner {
    event_bus: EventBus,
    geocoder_url: Option<String>,
    scanner: ImageScanner,
    writer: MetadataWriter,
}

impl JobRunner {
    pub fn new(event_bus: EventBus) -> Self {
        Self {
            event_bus,
            geocoder_url: None,
            scanner: ImageScanner::new(),
            writer: MetadataWriter::new(),
        }
    }

    /// Point the geocoder at a non-default endpoint (used by tests)
    pub fn with_geocoder_url(mut self, url: impl Into<String>) -> Self {
        self.geocoder_url = Some(url.into());
        self
    }

    /// Execute one job to its terminal state
    ///
    /// Validation failures return before anything is created on disk and
    /// before the job leaves `Idle`. Everything after that point resolves to
    /// a `JobOutcome` ending in `Completed` or `Cancelled`.
    pub async fn run(
        &self,
        job_id: Uuid,
        spec: JobSpec,
        cancel_token: CancellationToken,
    ) -> Result<JobOutcome> {
        spec.validate()?;

        self.transition(job_id, JobState::Idle, JobState::Running);
        tracing::info!(job_id = %job_id, folder = %spec.folder.display(), "Job started");

        let images = self
            .scanner
            .scan(&spec.folder)
            .map_err(|e| Error::Internal(e.to_string()))?;
        let total = images.len();

        if total == 0 {
            self.log(job_id, "No images found in selected folder.".to_string());
            self.log(job_id, "Done".to_string());
            self.transition(job_id, JobState::Running, JobState::Completed);
            return Ok(JobOutcome {
                state: JobState::Completed,
                items: Vec::new(),
                processed: 0,
                errored: 0,
                skipped: 0,
            });
        }

        // Output directory lives inside the source folder, created once
        let out_dir = spec.output_dir();
        std::fs::create_dir_all(&out_dir)?;

        let geocoder = match &self.geocoder_url {
            Some(url) => Geocoder::with_base_url(spec.requests_per_second, url.clone()),
            None => Geocoder::new(spec.requests_per_second),
        }
        .map_err(|e| Error::Internal(e.to_string()))?;

        // Assignment RNG and name counters are local to this job run
        let mut rng = match spec.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut allocator = NameAllocator::new();

        self.progress(job_id, 0, total);

        let mut items = Vec::with_capacity(total);
        let mut processed = 0usize;
        let mut errored = 0usize;
        let mut cancelled = false;

        for (index, image_path) in images.iter().enumerate() {
            if cancel_token.is_cancelled() {
                cancelled = true;
                tracing::info!(
                    job_id = %job_id,
                    attempted = index,
                    remaining = total - index,
                    "Job cancelled at item boundary"
                );
                break;
            }

            let image_name = image_path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| image_path.display().to_string());

            let location = spec.locations[rng.gen_range(0..spec.locations.len())].clone();
            let keyword = spec.keywords[rng.gen_range(0..spec.keywords.len())].clone();

            let extension = image_path
                .extension()
                .map(|e| format!(".{}", e.to_string_lossy()))
                .unwrap_or_default();
            let new_name = allocator.allocate(&keyword, &extension);
            let out_path = out_dir.join(&new_name);

            let outcome = self
                .process_item(&geocoder, image_path, &out_path, &location, &keyword)
                .await;

            match outcome {
                Ok(coordinates) => {
                    processed += 1;
                    self.log(
                        job_id,
                        format!(
                            "Processed {} -> {} ({}, {}) as {}",
                            image_name,
                            location,
                            coordinates.latitude,
                            coordinates.longitude,
                            new_name
                        ),
                    );
                    self.event_bus.emit(JobEvent::ItemProcessed {
                        job_id,
                        source: image_name.clone(),
                        output: new_name,
                        latitude: coordinates.latitude,
                        longitude: coordinates.longitude,
                    });
                    items.push(ItemResult {
                        source: image_name,
                        outcome: ItemOutcome::Processed {
                            output: out_path,
                            coordinates,
                        },
                    });
                }
                Err(e) => {
                    errored += 1;
                    tracing::warn!(
                        job_id = %job_id,
                        file = %image_name,
                        error = %e,
                        "Item failed, skipping"
                    );
                    self.log(job_id, format!("Error processing {}: {}", image_name, e));
                    self.event_bus.emit(JobEvent::ItemFailed {
                        job_id,
                        source: image_name.clone(),
                        reason: e.to_string(),
                    });
                    items.push(ItemResult {
                        source: image_name,
                        outcome: ItemOutcome::Failed {
                            reason: e.to_string(),
                        },
                    });
                }
            }

            self.progress(job_id, index + 1, total);
        }

        let skipped = total - items.len();
        let final_state = if cancelled {
            JobState::Cancelled
        } else {
            JobState::Completed
        };

        self.log(
            job_id,
            if cancelled { "Cancelled" } else { "Done" }.to_string(),
        );
        self.transition(job_id, JobState::Running, final_state);
        tracing::info!(
            job_id = %job_id,
            state = %final_state,
            processed,
            errored,
            skipped,
            "Job finished"
        );

        Ok(JobOutcome {
            state: final_state,
            items,
            processed,
            errored,
            skipped,
        })
    }

    /// Geocode and write one work item; any error here is per-item
    async fn process_item(
        &self,
        geocoder: &Geocoder,
        source: &std::path::Path,
        dest: &std::path::Path,
        location: &str,
        keyword: &str,
    ) -> Result<crate::services::Coordinates> {
        let coordinates = geocoder.lookup(location).await?;
        self.writer
            .write_tagged_copy(source, dest, coordinates, keyword)?;
        Ok(coordinates)
    }

    fn transition(&self, job_id: Uuid, old_state: JobState, new_state: JobState) {
        self.event_bus.emit(JobEvent::JobStateChanged {
            job_id,
            old_state,
            new_state,
            timestamp: chrono::Utc::now(),
        });
    }

    fn progress(&self, job_id: Uuid, current: usize, total: usize) {
        self.event_bus.emit(JobEvent::JobProgress {
            job_id,
            current,
            total,
        });
    }

    fn log(&self, job_id: Uuid, line: String) {
        self.event_bus.emit(JobEvent::JobLog { job_id, line });
    }
}
