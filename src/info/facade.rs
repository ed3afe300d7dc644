//! Host information facade
//!
//! Each accessor issues its own query and returns a display-ready string,
//! or the failure sentinel when the query fails. The `try_` variants return
//! the underlying [`QueryError`] instead.

use tracing::debug;

use super::overview::Overview;
use crate::core::config::AppConfig;
use crate::platform::{
    HostQuery, MemoryStatus, OsKey, PlatformHost, QueryResult, RegistryLookup, RegistryRoot,
};

/// Placeholder shown in place of any value that could not be read.
pub const FAILURE_SENTINEL: &str = "<read failed>";

/// Stateless read-only accessors for host facts.
#[derive(Debug, Clone)]
pub struct HostInfo<Q: HostQuery = PlatformHost> {
    source: Q,
    os_key: OsKey,
}

impl HostInfo<PlatformHost> {
    /// Facade over the backend for the current platform.
    pub fn new() -> Self {
        Self::with_source(PlatformHost::default())
    }

    /// Facade over the current platform, with the OS key from `config`.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new().with_os_key(config.os_key.clone())
    }
}

impl Default for HostInfo<PlatformHost> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Q: HostQuery> HostInfo<Q> {
    pub fn with_source(source: Q) -> Self {
        Self {
            source,
            os_key: OsKey::default(),
        }
    }

    pub fn with_os_key(mut self, os_key: OsKey) -> Self {
        self.os_key = os_key;
        self
    }

    pub fn source(&self) -> &Q {
        &self.source
    }

    // ------------------------------------------------------------------
    // Fallible accessors
    // ------------------------------------------------------------------

    pub fn try_os_display_name(&self) -> QueryResult<String> {
        self.source.os_display_name(&self.os_key)
    }

    pub fn try_system_directory_path(&self) -> QueryResult<String> {
        self.source.system_directory(&self.os_key)
    }

    /// Installed memory in whole megabytes (remainder truncated).
    pub fn try_total_physical_memory_mb(&self) -> QueryResult<u64> {
        Ok(self.source.installed_memory_kb()? / 1024)
    }

    pub fn try_usable_physical_memory_mb(&self) -> QueryResult<u64> {
        Ok(self.source.memory_status()?.total_physical_mb())
    }

    pub fn try_available_physical_memory_mb(&self) -> QueryResult<u64> {
        Ok(self.source.memory_status()?.available_physical_mb())
    }

    pub fn try_memory_load_free_percent(&self) -> QueryResult<u32> {
        Ok(self.source.memory_status()?.free_percent())
    }

    pub fn try_memory_status(&self) -> QueryResult<MemoryStatus> {
        self.source.memory_status()
    }

    pub fn try_registry_value(&self, lookup: &RegistryLookup) -> QueryResult<String> {
        self.source.registry_value(lookup)
    }

    // ------------------------------------------------------------------
    // Display accessors
    // ------------------------------------------------------------------

    pub fn os_display_name(&self) -> String {
        self.or_sentinel("OS name", self.try_os_display_name())
    }

    pub fn system_directory_path(&self) -> String {
        self.or_sentinel("system directory", self.try_system_directory_path())
    }

    pub fn total_physical_memory_mb(&self) -> String {
        self.or_sentinel("installed memory", self.try_total_physical_memory_mb())
    }

    pub fn usable_physical_memory_mb(&self) -> String {
        self.or_sentinel("usable memory", self.try_usable_physical_memory_mb())
    }

    pub fn available_physical_memory_mb(&self) -> String {
        self.or_sentinel("available memory", self.try_available_physical_memory_mb())
    }

    pub fn memory_load_free_percent(&self) -> String {
        self.or_sentinel("free memory percent", self.try_memory_load_free_percent())
    }

    pub fn registry_value(
        &self,
        root: RegistryRoot,
        subpath: &str,
        value_name: &str,
    ) -> String {
        let lookup = RegistryLookup::new(root, subpath, value_name);
        let result = self.try_registry_value(&lookup);
        self.or_sentinel("registry value", result)
    }

    /// Every display field in one pass, sharing a single memory snapshot.
    pub fn overview(&self) -> Overview {
        let snapshot = self.source.memory_status();
        Overview {
            os_name: self.os_display_name(),
            system_path: self.system_directory_path(),
            total_memory_mb: self.total_physical_memory_mb(),
            usable_memory_mb: self.or_sentinel(
                "usable memory",
                snapshot.clone().map(|s| s.total_physical_mb()),
            ),
            available_memory_mb: self.or_sentinel(
                "available memory",
                snapshot.clone().map(|s| s.available_physical_mb()),
            ),
            free_percent: self.or_sentinel("free memory percent", snapshot.map(|s| s.free_percent())),
            captured_at: chrono::Local::now().to_rfc3339(),
        }
    }

    fn or_sentinel<T: ToString>(&self, what: &str, result: QueryResult<T>) -> String {
        match result {
            Ok(value) => value.to_string(),
            Err(e) => {
                debug!("{} unavailable from {} backend: {}", what, self.source.backend_name(), e);
                FAILURE_SENTINEL.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::QueryError;
    use std::cell::Cell;
    use std::collections::HashMap;

    const MB: u64 = 1024 * 1024;

    /// In-memory backend with a call counter on the snapshot query.
    #[derive(Default)]
    struct FakeHost {
        status: Option<MemoryStatus>,
        installed_kb: Option<u64>,
        registry: HashMap<(RegistryRoot, String, String), String>,
        snapshots_taken: Cell<usize>,
    }

    impl FakeHost {
        fn healthy() -> Self {
            let mut registry = HashMap::new();
            registry.insert(
                (
                    RegistryRoot::LocalMachine,
                    r"SOFTWARE\Microsoft\Windows NT\CurrentVersion".to_string(),
                    "ProductName".to_string(),
                ),
                "Windows 10 Home".to_string(),
            );
            registry.insert(
                (
                    RegistryRoot::LocalMachine,
                    r"SOFTWARE\Microsoft\Windows NT\CurrentVersion".to_string(),
                    "SystemRoot".to_string(),
                ),
                r"C:\WINDOWS".to_string(),
            );
            Self {
                status: Some(MemoryStatus {
                    memory_load: 42,
                    total_physical: 16_307 * MB + 512,
                    available_physical: 9_001 * MB + 7,
                    total_page_file: 18_000 * MB,
                    available_page_file: 10_000 * MB,
                    total_virtual: 128 * 1024 * 1024 * MB,
                    available_virtual: 127 * 1024 * 1024 * MB,
                    available_extended_virtual: 0,
                }),
                installed_kb: Some(16_777_216),
                registry,
                snapshots_taken: Cell::new(0),
            }
        }
    }

    impl HostQuery for FakeHost {
        fn memory_status(&self) -> QueryResult<MemoryStatus> {
            self.snapshots_taken.set(self.snapshots_taken.get() + 1);
            self.status.ok_or(QueryError::UnderlyingCallFailed {
                code: 87,
                message: "The parameter is incorrect.".into(),
            })
        }

        fn installed_memory_kb(&self) -> QueryResult<u64> {
            self.installed_kb
                .ok_or(QueryError::UnderlyingCallFailed { code: 1, message: "no SMBIOS".into() })
        }

        fn registry_value(&self, lookup: &RegistryLookup) -> QueryResult<String> {
            let key = (lookup.root, lookup.subpath.clone(), lookup.value_name.clone());
            self.registry
                .get(&key)
                .cloned()
                .ok_or_else(|| QueryError::NotFound(lookup.to_string()))
        }

        fn backend_name(&self) -> &'static str {
            "fake"
        }
    }

    #[test]
    fn test_os_display_name_from_registry() {
        let info = HostInfo::with_source(FakeHost::healthy());
        assert_eq!(info.os_display_name(), "Windows 10 Home");
        assert_eq!(info.system_directory_path(), r"C:\WINDOWS");
    }

    #[test]
    fn test_registry_value_exact_and_missing() {
        let info = HostInfo::with_source(FakeHost::healthy());
        let subpath = r"SOFTWARE\Microsoft\Windows NT\CurrentVersion";

        assert_eq!(
            info.registry_value(RegistryRoot::LocalMachine, subpath, "ProductName"),
            "Windows 10 Home"
        );
        assert_eq!(
            info.registry_value(RegistryRoot::LocalMachine, subpath, "NoSuchValue"),
            FAILURE_SENTINEL
        );
        assert_eq!(
            info.registry_value(RegistryRoot::LocalMachine, r"SOFTWARE\Nowhere", "ProductName"),
            FAILURE_SENTINEL
        );
        assert_eq!(
            info.registry_value(RegistryRoot::CurrentUser, subpath, "ProductName"),
            FAILURE_SENTINEL
        );
    }

    #[test]
    fn test_try_registry_value_keeps_error_kind() {
        let info = HostInfo::with_source(FakeHost::healthy());
        let lookup = RegistryLookup::new(RegistryRoot::Users, "Missing", "Value");
        assert!(matches!(info.try_registry_value(&lookup), Err(QueryError::NotFound(_))));
    }

    #[test]
    fn test_total_memory_truncates_to_mb() {
        let info = HostInfo::with_source(FakeHost::healthy());
        assert_eq!(info.total_physical_memory_mb(), "16384");

        let odd = HostInfo::with_source(FakeHost {
            installed_kb: Some(16_777_216 + 1023),
            ..FakeHost::healthy()
        });
        assert_eq!(odd.total_physical_memory_mb(), "16384");
    }

    #[test]
    fn test_total_memory_failure_is_sentinel_not_zero() {
        let info = HostInfo::with_source(FakeHost { installed_kb: None, ..FakeHost::healthy() });
        assert_eq!(info.total_physical_memory_mb(), FAILURE_SENTINEL);
        assert_eq!(info.usable_physical_memory_mb(), "16307");
    }

    #[test]
    fn test_snapshot_accessors() {
        let info = HostInfo::with_source(FakeHost::healthy());
        assert_eq!(info.usable_physical_memory_mb(), "16307");
        assert_eq!(info.available_physical_memory_mb(), "9001");
        assert_eq!(info.memory_load_free_percent(), "58");
    }

    #[test]
    fn test_free_percent_complements_load() {
        for load in [0u32, 1, 42, 99, 100] {
            let mut host = FakeHost::healthy();
            host.status.as_mut().unwrap().memory_load = load;
            let info = HostInfo::with_source(host);
            let free: u32 = info.memory_load_free_percent().parse().unwrap();
            assert_eq!(free + load, 100);
        }
    }

    #[test]
    fn test_usable_not_below_available() {
        let info = HostInfo::with_source(FakeHost::healthy());
        let usable: u64 = info.usable_physical_memory_mb().parse().unwrap();
        let available: u64 = info.available_physical_memory_mb().parse().unwrap();
        assert!(usable >= available);
    }

    #[test]
    fn test_snapshot_failure_only_affects_snapshot_fields() {
        let info = HostInfo::with_source(FakeHost { status: None, ..FakeHost::healthy() });

        assert_eq!(info.usable_physical_memory_mb(), FAILURE_SENTINEL);
        assert_eq!(info.available_physical_memory_mb(), FAILURE_SENTINEL);
        assert_eq!(info.memory_load_free_percent(), FAILURE_SENTINEL);

        assert_eq!(info.total_physical_memory_mb(), "16384");
        assert_eq!(info.os_display_name(), "Windows 10 Home");
        assert_eq!(info.system_directory_path(), r"C:\WINDOWS");
    }

    #[test]
    fn test_each_accessor_takes_fresh_snapshot() {
        let info = HostInfo::with_source(FakeHost::healthy());
        info.usable_physical_memory_mb();
        info.available_physical_memory_mb();
        info.memory_load_free_percent();
        assert_eq!(info.source().snapshots_taken.get(), 3);
    }

    #[test]
    fn test_overview_shares_one_snapshot() {
        let info = HostInfo::with_source(FakeHost::healthy());
        let overview = info.overview();

        assert_eq!(info.source().snapshots_taken.get(), 1);
        assert_eq!(overview.os_name, "Windows 10 Home");
        assert_eq!(overview.system_path, r"C:\WINDOWS");
        assert_eq!(overview.total_memory_mb, "16384");
        assert_eq!(overview.usable_memory_mb, "16307");
        assert_eq!(overview.available_memory_mb, "9001");
        assert_eq!(overview.free_percent, "58");
        assert!(chrono::DateTime::parse_from_rfc3339(&overview.captured_at).is_ok());
    }

    #[test]
    fn test_config_cannot_change_placeholder() {
        let config: AppConfig = toml::from_str("failure_sentinel = \"0\"\n").unwrap();
        let info = HostInfo::with_source(FakeHost {
            status: None,
            installed_kb: None,
            ..FakeHost::healthy()
        })
        .with_os_key(config.os_key.clone());

        assert_eq!(info.total_physical_memory_mb(), FAILURE_SENTINEL);
        assert_eq!(info.memory_load_free_percent(), FAILURE_SENTINEL);
        assert_ne!(info.total_physical_memory_mb(), "0");
    }

    #[test]
    fn test_custom_os_key() {
        let mut host = FakeHost::healthy();
        host.registry.insert(
            (RegistryRoot::LocalMachine, r"SOFTWARE\Custom".into(), "Edition".into()),
            "Custom Edition".into(),
        );
        let info = HostInfo::with_source(host).with_os_key(OsKey {
            subpath: r"SOFTWARE\Custom".into(),
            product_name_value: "Edition".into(),
            system_root_value: "Root".into(),
        });
        assert_eq!(info.os_display_name(), "Custom Edition");
        assert_eq!(info.system_directory_path(), FAILURE_SENTINEL);
    }

    #[test]
    fn test_accessors_are_idempotent() {
        let info = HostInfo::with_source(FakeHost::healthy());
        assert_eq!(info.os_display_name(), info.os_display_name());
        assert_eq!(info.total_physical_memory_mb(), info.total_physical_memory_mb());
        assert_eq!(info.usable_physical_memory_mb(), info.usable_physical_memory_mb());
        assert_eq!(info.memory_load_free_percent(), info.memory_load_free_percent());
    }

    #[test]
    fn test_borrowed_source() {
        let host = FakeHost::healthy();
        let info = HostInfo::with_source(&host);
        assert_eq!(info.os_display_name(), "Windows 10 Home");
        assert_eq!(host.snapshots_taken.get(), 0);
    }

    #[test]
    fn test_platform_facade_never_panics() {
        let info = HostInfo::new();
        let overview = info.overview();
        assert!(!overview.os_name.is_empty());
        assert!(!overview.usable_memory_mb.is_empty());
    }
}
