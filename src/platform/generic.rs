//! Fallback implementation for platforms without a dedicated backend
//!
//! Uses the `sysinfo` crate. Installed memory and the registry have no
//! portable source and report `NotSupported`.

use sysinfo::System;

use super::{HostQuery, MemoryStatus, OsKey, QueryError, QueryResult, RegistryLookup};

#[derive(Debug, Default, Clone, Copy)]
pub struct GenericHost;

impl GenericHost {
    pub fn new() -> Self {
        Self
    }
}

impl HostQuery for GenericHost {
    fn memory_status(&self) -> QueryResult<MemoryStatus> {
        let mut sys = System::new();
        sys.refresh_memory();

        let total = sys.total_memory();
        if total == 0 {
            return Err(QueryError::UnderlyingCallFailed {
                code: -1,
                message: "sysinfo reported no physical memory".into(),
            });
        }
        let available = sys.available_memory().min(total);
        let load = ((total - available) as u128 * 100 / total as u128) as u32;

        Ok(MemoryStatus {
            memory_load: load,
            total_physical: total,
            available_physical: available,
            total_page_file: total + sys.total_swap(),
            available_page_file: available + sys.free_swap(),
            ..Default::default()
        })
    }

    fn installed_memory_kb(&self) -> QueryResult<u64> {
        Err(QueryError::NotSupported("installed memory query".into()))
    }

    fn registry_value(&self, lookup: &RegistryLookup) -> QueryResult<String> {
        Err(QueryError::NotSupported(format!("registry lookup {}", lookup)))
    }

    fn os_display_name(&self, _key: &OsKey) -> QueryResult<String> {
        System::long_os_version()
            .or_else(System::name)
            .ok_or_else(|| QueryError::NotFound("OS name".into()))
    }

    fn system_directory(&self, _key: &OsKey) -> QueryResult<String> {
        Ok("/".to_string())
    }

    fn backend_name(&self) -> &'static str {
        "generic"
    }
}
