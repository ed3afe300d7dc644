//! Linux Platform Support
//!
//! Linux has no configuration registry, so registry lookups report
//! `NotSupported`. The OS identity comes from os-release instead:
//!
//! - **memory**: /proc/meminfo snapshot and sysfs memory blocks
//! - OS name: `PRETTY_NAME` from /etc/os-release (or /usr/lib/os-release)
//! - System directory: the filesystem root

pub mod memory;

use std::fs;

use tracing::debug;

use super::{HostQuery, MemoryStatus, OsKey, QueryError, QueryResult, RegistryLookup};

pub use memory::Meminfo;

const OS_RELEASE_PATHS: [&str; 2] = ["/etc/os-release", "/usr/lib/os-release"];

/// Host queries backed by procfs, sysfs and os-release.
#[derive(Debug, Default, Clone, Copy)]
pub struct LinuxHost;

impl LinuxHost {
    pub fn new() -> Self {
        Self
    }
}

impl HostQuery for LinuxHost {
    fn memory_status(&self) -> QueryResult<MemoryStatus> {
        memory::read_memory_status()
    }

    fn installed_memory_kb(&self) -> QueryResult<u64> {
        memory::read_installed_memory_kb()
    }

    fn registry_value(&self, lookup: &RegistryLookup) -> QueryResult<String> {
        Err(QueryError::NotSupported(format!("registry lookup {} on Linux", lookup)))
    }

    fn os_display_name(&self, _key: &OsKey) -> QueryResult<String> {
        let mut last_err = QueryError::NotFound("os-release".into());
        for path in OS_RELEASE_PATHS {
            match fs::read_to_string(path) {
                Ok(content) => {
                    return parse_pretty_name(&content)
                        .ok_or_else(|| QueryError::NotFound(format!("PRETTY_NAME in {}", path)));
                }
                Err(e) => {
                    debug!("Cannot read {}: {}", path, e);
                    last_err = e.into();
                }
            }
        }
        Err(last_err)
    }

    fn system_directory(&self, _key: &OsKey) -> QueryResult<String> {
        Ok("/".to_string())
    }

    fn backend_name(&self) -> &'static str {
        "linux"
    }
}

/// Extract `PRETTY_NAME` from os-release content, unquoted.
pub fn parse_pretty_name(content: &str) -> Option<String> {
    content
        .lines()
        .find_map(|line| line.trim().strip_prefix("PRETTY_NAME="))
        .map(|value| value.trim().trim_matches('"').trim_matches('\'').to_string())
        .filter(|value| !value.is_empty())
}
