//! Host information query facade

pub mod facade;
pub mod overview;

pub use facade::{HostInfo, FAILURE_SENTINEL};
pub use overview::Overview;
