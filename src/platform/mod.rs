//! Platform Abstraction Layer for hostinfo
//!
//! Backends answer raw host queries; the facade in [`crate::info`] turns the
//! answers into display strings.
//!
//! # Architecture
//!
//! ```text
//! src/platform/
//! +-- mod.rs           <- This file (module definitions, backend selection)
//! +-- traits.rs        <- HostQuery trait and shared types
//! +-- windows.rs       <- Registry + Win32 memory APIs (cfg(windows))
//! +-- linux/           <- procfs / sysfs / os-release (cfg(linux))
//! |   +-- mod.rs
//! |   +-- memory.rs
//! +-- generic.rs       <- sysinfo fallback for everything else
//! ```
//!
//! # Platform Support
//!
//! | Fact | Windows | Linux | Other |
//! |------|---------|-------|-------|
//! | OS name | Registry `ProductName` | os-release | sysinfo |
//! | System directory | Registry `SystemRoot` | `/` | `/` |
//! | Installed memory | `GetPhysicallyInstalledSystemMemory` | sysfs memory blocks | - |
//! | Memory snapshot | `GlobalMemoryStatusEx` | /proc/meminfo | sysinfo |
//! | Registry | winreg | - | - |

pub mod traits;

pub use traits::{
    HostQuery, MemoryStatus, OsKey, QueryError, QueryResult, RegistryLookup, RegistryRoot,
};

pub mod generic;
pub use generic::GenericHost;

#[cfg(target_os = "linux")]
pub mod linux;

#[cfg(target_os = "linux")]
pub use linux::LinuxHost;

#[cfg(target_os = "windows")]
pub mod windows;

#[cfg(target_os = "windows")]
pub use self::windows::WindowsHost;

/// Backend for the platform this crate was built for.
#[cfg(target_os = "windows")]
pub type PlatformHost = WindowsHost;

/// Backend for the platform this crate was built for.
#[cfg(target_os = "linux")]
pub type PlatformHost = LinuxHost;

/// Backend for the platform this crate was built for.
#[cfg(not(any(target_os = "windows", target_os = "linux")))]
pub type PlatformHost = GenericHost;

/// Returns the current platform name
pub fn platform_name() -> &'static str {
    std::env::consts::OS
}

/// Whether the configuration registry exists on this platform.
pub fn has_registry() -> bool {
    cfg!(target_os = "windows")
}
