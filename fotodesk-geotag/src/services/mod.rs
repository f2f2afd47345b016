//! Service layer for the batch geotag processor

pub mod geocoder;
pub mod image_scanner;
pub mod job_runner;
pub mod metadata_writer;
pub mod name_allocator;
pub mod rate_limiter;

pub use geocoder::{Coordinates, GeocodeError, Geocoder};
pub use image_scanner::{ImageScanner, ScanError};
pub use job_runner::JobRunner;
pub use metadata_writer::{ImageKind, MetadataWriter, WriteError};
pub use name_allocator::NameAllocator;
pub use rate_limiter::RateLimiter;
