//! hostinfo
//!
//! Reads a handful of static host facts (OS name, system directory,
//! installed / usable / available physical memory and the free-memory
//! percentage) and returns them as display-ready strings.
//!
//! ## Layout
//!
//! - **platform**: one backend per OS behind the `HostQuery` trait
//! - **info**: the `HostInfo` facade; any failed query becomes a fixed
//!   sentinel string, with `try_` accessors for the underlying error
//! - **display**: text rendering with unit labels
//! - **core**: TOML configuration
//!
//! ```no_run
//! use hostinfo::HostInfo;
//!
//! let info = HostInfo::new();
//! println!("{} ({} MB free)", info.os_display_name(), info.available_physical_memory_mb());
//! ```

pub mod core;
pub mod display;
pub mod info;
pub mod platform;

// Re-exports
pub use self::core::config::AppConfig;
pub use info::{HostInfo, Overview, FAILURE_SENTINEL};
pub use platform::{
    HostQuery, MemoryStatus, OsKey, PlatformHost, QueryError, QueryResult, RegistryLookup,
    RegistryRoot,
};
