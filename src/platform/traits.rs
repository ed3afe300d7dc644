//! Platform Abstraction Traits for Host Information Queries
//!
//! This module defines the seam between the host information facade and the
//! operating system. Each platform backend (Windows, Linux, generic) implements
//! [`HostQuery`] and returns raw facts; the facade turns them into display
//! strings.
//!
//! # Architecture
//!
//! ```text
//! +-------------------+
//! |  HostInfo facade  |  <- string accessors, sentinel on failure
//! +-------------------+
//!          |
//! +-------------------+
//! |     HostQuery     |  <- This module (defines interfaces)
//! +-------------------+
//!          |
//!    +-----+-----+---------+
//!    |           |         |
//! +--v--+     +--v--+   +--v--+
//! | Win |     | Lin |   | Gen |  <- Platform-specific implementations
//! +-----+     +-----+   +-----+
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use std::str::FromStr;

// ============================================================================
// Error Types
// ============================================================================

/// Why a host query could not produce a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// The key, value or file holding the fact does not exist
    NotFound(String),
    /// The fact exists but could not be read with the current privileges
    AccessDenied(String),
    /// The underlying OS call reported failure
    UnderlyingCallFailed { code: i32, message: String },
    /// The fact has no source on this platform
    NotSupported(String),
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryError::NotFound(msg) => write!(f, "Not found: {}", msg),
            QueryError::AccessDenied(msg) => write!(f, "Access denied: {}", msg),
            QueryError::UnderlyingCallFailed { code, message } => {
                write!(f, "OS call failed ({}): {}", code, message)
            }
            QueryError::NotSupported(msg) => write!(f, "Not supported: {}", msg),
        }
    }
}

impl std::error::Error for QueryError {}

impl From<io::Error> for QueryError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => QueryError::NotFound(err.to_string()),
            io::ErrorKind::PermissionDenied => QueryError::AccessDenied(err.to_string()),
            _ => QueryError::UnderlyingCallFailed {
                code: err.raw_os_error().unwrap_or(-1),
                message: err.to_string(),
            },
        }
    }
}

impl QueryError {
    /// Short machine-friendly name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            QueryError::NotFound(_) => "not-found",
            QueryError::AccessDenied(_) => "access-denied",
            QueryError::UnderlyingCallFailed { .. } => "call-failed",
            QueryError::NotSupported(_) => "not-supported",
        }
    }
}

/// Result type alias for host queries.
pub type QueryResult<T> = Result<T, QueryError>;

// ============================================================================
// Registry Types
// ============================================================================

/// Top-level hive a registry lookup starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegistryRoot {
    CurrentUser,
    LocalMachine,
    Users,
    ClassesRoot,
    CurrentConfig,
}

impl RegistryRoot {
    /// All hives, in declaration order.
    pub const ALL: [RegistryRoot; 5] = [
        RegistryRoot::CurrentUser,
        RegistryRoot::LocalMachine,
        RegistryRoot::Users,
        RegistryRoot::ClassesRoot,
        RegistryRoot::CurrentConfig,
    ];

    /// Conventional `HKEY_*` name of the hive.
    pub fn hkey_name(&self) -> &'static str {
        match self {
            RegistryRoot::CurrentUser => "HKEY_CURRENT_USER",
            RegistryRoot::LocalMachine => "HKEY_LOCAL_MACHINE",
            RegistryRoot::Users => "HKEY_USERS",
            RegistryRoot::ClassesRoot => "HKEY_CLASSES_ROOT",
            RegistryRoot::CurrentConfig => "HKEY_CURRENT_CONFIG",
        }
    }

    /// Short `HK*` abbreviation of the hive.
    pub fn short_name(&self) -> &'static str {
        match self {
            RegistryRoot::CurrentUser => "HKCU",
            RegistryRoot::LocalMachine => "HKLM",
            RegistryRoot::Users => "HKU",
            RegistryRoot::ClassesRoot => "HKCR",
            RegistryRoot::CurrentConfig => "HKCC",
        }
    }
}

impl fmt::Display for RegistryRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.hkey_name())
    }
}

impl FromStr for RegistryRoot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase().replace('-', "_");
        RegistryRoot::ALL
            .iter()
            .copied()
            .find(|root| {
                wanted == root.hkey_name()
                    || wanted == root.short_name()
                    || wanted == root.hkey_name().trim_start_matches("HKEY_")
                    || wanted == format!("{:?}", root).to_ascii_uppercase()
            })
            .ok_or_else(|| format!("unknown registry root '{}'", s))
    }
}

/// A single (root, subpath, value name) registry read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryLookup {
    pub root: RegistryRoot,
    pub subpath: String,
    pub value_name: String,
}

impl RegistryLookup {
    pub fn new(root: RegistryRoot, subpath: impl Into<String>, value_name: impl Into<String>) -> Self {
        Self {
            root,
            subpath: subpath.into(),
            value_name: value_name.into(),
        }
    }
}

impl fmt::Display for RegistryLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\\{}\\{}", self.root, self.subpath, self.value_name)
    }
}

/// Where the OS identity values live in the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OsKey {
    /// Key holding the OS version values, under `HKEY_LOCAL_MACHINE`
    pub subpath: String,
    /// Value with the marketing name, e.g. "Windows 10 Home"
    pub product_name_value: String,
    /// Value with the system install directory, e.g. "C:\Windows"
    pub system_root_value: String,
}

impl Default for OsKey {
    fn default() -> Self {
        Self {
            subpath: r"SOFTWARE\Microsoft\Windows NT\CurrentVersion".into(),
            product_name_value: "ProductName".into(),
            system_root_value: "SystemRoot".into(),
        }
    }
}

impl OsKey {
    pub fn product_name(&self) -> RegistryLookup {
        RegistryLookup::new(RegistryRoot::LocalMachine, &self.subpath, &self.product_name_value)
    }

    pub fn system_root(&self) -> RegistryLookup {
        RegistryLookup::new(RegistryRoot::LocalMachine, &self.subpath, &self.system_root_value)
    }
}

// ============================================================================
// Memory Types
// ============================================================================

const MB: u64 = 1024 * 1024;

/// One memory-status snapshot. All sizes are in bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MemoryStatus {
    /// Percentage of physical memory in use (0-100)
    pub memory_load: u32,
    pub total_physical: u64,
    pub available_physical: u64,
    pub total_page_file: u64,
    pub available_page_file: u64,
    pub total_virtual: u64,
    pub available_virtual: u64,
    pub available_extended_virtual: u64,
}

impl MemoryStatus {
    /// Usable physical memory in whole megabytes.
    pub fn total_physical_mb(&self) -> u64 {
        self.total_physical / MB
    }

    /// Available physical memory in whole megabytes.
    pub fn available_physical_mb(&self) -> u64 {
        self.available_physical / MB
    }

    /// Percentage of physical memory that is free.
    pub fn free_percent(&self) -> u32 {
        100u32.saturating_sub(self.memory_load)
    }
}

// ============================================================================
// Traits
// ============================================================================

/// Raw host facts a platform can supply.
///
/// Every method is a single synchronous query; nothing is cached between
/// calls.
pub trait HostQuery {
    /// Take a fresh memory-status snapshot.
    fn memory_status(&self) -> QueryResult<MemoryStatus>;

    /// Installed physical memory in kilobytes.
    fn installed_memory_kb(&self) -> QueryResult<u64>;

    /// Read one registry value and render it as a string.
    fn registry_value(&self, lookup: &RegistryLookup) -> QueryResult<String>;

    /// Marketing name of the operating system.
    fn os_display_name(&self, key: &OsKey) -> QueryResult<String> {
        self.registry_value(&key.product_name())
    }

    /// Directory the operating system is installed in.
    fn system_directory(&self, key: &OsKey) -> QueryResult<String> {
        self.registry_value(&key.system_root())
    }

    /// Backend name, for logs.
    fn backend_name(&self) -> &'static str;
}

impl<T: HostQuery + ?Sized> HostQuery for &T {
    fn memory_status(&self) -> QueryResult<MemoryStatus> {
        (**self).memory_status()
    }

    fn installed_memory_kb(&self) -> QueryResult<u64> {
        (**self).installed_memory_kb()
    }

    fn registry_value(&self, lookup: &RegistryLookup) -> QueryResult<String> {
        (**self).registry_value(lookup)
    }

    fn os_display_name(&self, key: &OsKey) -> QueryResult<String> {
        (**self).os_display_name(key)
    }

    fn system_directory(&self, key: &OsKey) -> QueryResult<String> {
        (**self).system_directory(key)
    }

    fn backend_name(&self) -> &'static str {
        (**self).backend_name()
    }
}
