//! The display fields produced by one pass over the facade

use serde::Serialize;

/// Bare display values; unit labels are added when rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Overview {
    pub os_name: String,
    pub system_path: String,
    /// Installed memory in MB
    pub total_memory_mb: String,
    /// Memory usable by the OS in MB
    pub usable_memory_mb: String,
    pub available_memory_mb: String,
    /// Percentage of physical memory that is free
    pub free_percent: String,
    /// RFC 3339 local time the values were read
    pub captured_at: String,
}
