//! Plain-text rendering of host information
//!
//! The facade hands back bare values; unit labels and the "(N%)" suffix are
//! added here.

use crate::info::Overview;
use crate::platform::MemoryStatus;

const MB: u64 = 1024 * 1024;

/// The five overview lines.
pub fn render_overview(overview: &Overview) -> String {
    format!(
r#"OS:               {}
System path:      {}
Total memory:     {} MB
Usable memory:    {} MB
Available memory: {} MB ({}%)"#,
        overview.os_name,
        overview.system_path,
        overview.total_memory_mb,
        overview.usable_memory_mb,
        overview.available_memory_mb,
        overview.free_percent,
    )
}

/// Every field of a memory-status snapshot, in MB.
pub fn render_memory_status(status: &MemoryStatus) -> String {
    format!(
r#"================ Memory Status ================
Load:                      {:>10}%
Total physical:            {:>10} MB
Available physical:        {:>10} MB
Total page file:           {:>10} MB
Available page file:       {:>10} MB
Total virtual:             {:>10} MB
Available virtual:         {:>10} MB
Available ext. virtual:    {:>10} MB
==============================================="#,
        status.memory_load,
        status.total_physical / MB,
        status.available_physical / MB,
        status.total_page_file / MB,
        status.available_page_file / MB,
        status.total_virtual / MB,
        status.available_virtual / MB,
        status.available_extended_virtual / MB,
    )
}
