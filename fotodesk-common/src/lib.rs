//! # fotodesk Common Library
//!
//! Shared code for the fotodesk desktop tools:
//! - Error taxonomy shared by all tools
//! - Event types and EventBus for job progress reporting
//! - Per-user config/data path resolution

pub mod config;
pub mod error;
pub mod events;

pub use error::{Error, Result};
