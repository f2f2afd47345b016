//! Per-user path resolution for config and data files
//!
//! Resolution priority for data files:
//! 1. Explicit override (highest priority, used by tests and CLI flags)
//! 2. Environment variable
//! 3. OS-dependent per-user data directory (fallback)

use std::path::PathBuf;

/// Resolve the path of a per-tool data file
///
/// `override_path` wins outright when given; otherwise `env_var` is consulted;
/// otherwise the file lands under the platform data directory, in a
/// `fotodesk/` subdirectory.
pub fn resolve_data_file(
    override_path: Option<&str>,
    env_var: &str,
    file_name: &str,
) -> PathBuf {
    if let Some(path) = override_path {
        return PathBuf::from(path);
    }

    if let Ok(path) = std::env::var(env_var) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    default_data_dir().join(file_name)
}

/// OS-dependent default data directory for fotodesk tools
pub fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("fotodesk"))
        .unwrap_or_else(|| PathBuf::from("./fotodesk_data"))
}
