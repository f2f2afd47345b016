//! Image file discovery
//!
//! Lists the immediate children of a directory, keeping files whose extension
//! is one of `.jpg`/`.jpeg`/`.png` (case-insensitive). The listing is sorted
//! by file name so a job processes items in a stable order. Extension is the
//! only filter here: a misnamed file still enters the batch and surfaces as a
//! per-item failure when the metadata writer inspects its actual bytes.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Image scanner errors
#[derive(Debug, Error)]
pub enum ScanError {
    /// Specified path does not exist
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// Path exists but is not a directory
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Cannot access file or directory
    #[error("File access error {0}: {1}")]
    FileAccessError(PathBuf, String),
}

/// Non-recursive image file scanner
pub struct ImageScanner;

impl ImageScanner {
    pub fn new() -> Self {
        Self
    }

    /// List image files directly inside `folder`, sorted by file name
    pub fn scan(&self, folder: &Path) -> Result<Vec<PathBuf>, ScanError> {
        if !folder.exists() {
            return Err(ScanError::PathNotFound(folder.to_path_buf()));
        }
        if !folder.is_dir() {
            return Err(ScanError::NotADirectory(folder.to_path_buf()));
        }

        let entries = std::fs::read_dir(folder)
            .map_err(|e| ScanError::FileAccessError(folder.to_path_buf(), e.to_string()))?;

        let mut images = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Error accessing entry: {}", e);
                    continue;
                }
            };

            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            if self.has_image_extension(&path) {
                images.push(path);
            }
        }

        images.sort();

        tracing::debug!(
            folder = %folder.display(),
            count = images.len(),
            "Image scan complete"
        );

        Ok(images)
    }

    fn has_image_extension(&self, path: &Path) -> bool {
        path.extension()
            .map(|ext| self.is_image_extension(&ext.to_string_lossy().to_lowercase()))
            .unwrap_or(false)
    }

    fn is_image_extension(&self, ext: &str) -> bool {
        matches!(ext, "jpg" | "jpeg" | "png")
    }
}

impl Default for ImageScanner {
    fn default() -> Self {
        Self::new()
    }
}
