//! Job input and outcome types for batch geotagging

use crate::services::geocoder::Coordinates;
use fotodesk_common::events::JobState;
use fotodesk_common::{Error, Result};
use std::path::PathBuf;

/// Input for one batch geotagging job
///
/// Locations and keywords are each chosen independently at random per image.
/// The optional seed makes those choices reproducible; when absent the RNG is
/// seeded from entropy.
#[derive(Debug, Clone)]
pub struct JobSpec {
    /// Source directory to scan for images (immediate children only)
    pub folder: PathBuf,
    /// Candidate location names, queried against the geocoding service
    pub locations: Vec<String>,
    /// Candidate keywords, embedded as image description / title
    pub keywords: Vec<String>,
    /// Maximum geocode request rate
    pub requests_per_second: f64,
    /// Optional RNG seed for reproducible location/keyword assignment
    pub seed: Option<u64>,
}

impl JobSpec {
    /// Guard checked before any processing starts
    ///
    /// A failing spec leaves the job in `Idle`; nothing is created on disk.
    pub fn validate(&self) -> Result<()> {
        if self.folder.as_os_str().is_empty() {
            return Err(Error::Validation("no source folder selected".to_string()));
        }
        if !self.folder.is_dir() {
            return Err(Error::Validation(format!(
                "not a directory: {}",
                self.folder.display()
            )));
        }
        if self.locations.is_empty() {
            return Err(Error::Validation("location list is empty".to_string()));
        }
        if self.keywords.is_empty() {
            return Err(Error::Validation("keyword list is empty".to_string()));
        }
        if !(self.requests_per_second > 0.0) || !self.requests_per_second.is_finite() {
            return Err(Error::Validation(format!(
                "requests per second must be positive, got {}",
                self.requests_per_second
            )));
        }
        Ok(())
    }

    /// Output directory for this job: `<folder>/geotagged_<folder_basename>`
    pub fn output_dir(&self) -> PathBuf {
        let basename = self
            .folder
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        self.folder.join(format!("geotagged_{}", basename))
    }
}

/// Result of one work item
#[derive(Debug, Clone)]
pub enum ItemOutcome {
    /// Tagged copy written
    Processed {
        output: PathBuf,
        coordinates: Coordinates,
    },
    /// Item failed and was skipped; the job continued
    Failed { reason: String },
}

/// Per-item record in a [`JobOutcome`]
#[derive(Debug, Clone)]
pub struct ItemResult {
    /// Source file name within the job folder
    pub source: String,
    pub outcome: ItemOutcome,
}

/// Aggregate outcome of a finished job
#[derive(Debug)]
pub struct JobOutcome {
    /// Terminal state, either `Completed` or `Cancelled`
    pub state: JobState,
    /// One entry per attempted item, in processing order
    pub items: Vec<ItemResult>,
    /// Items whose tagged copy was written
    pub processed: usize,
    /// Items that failed and were skipped
    pub errored: usize,
    /// Items never attempted because the job was cancelled first
    pub skipped: usize,
}
