// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapters layer containing default port implementations.
//!
//! This module contains concrete implementations of the traits defined in the
//! ports layer: document stores, the host probe, the mime table, the tracing
//! verbosity sink and the file watcher. It also reads the environment overrides
//! used at first start.

pub mod env_var;
pub mod json_file;
pub mod memory;
pub mod mime_table;
pub mod system_probe;
pub mod tracing_verbosity;

pub mod watchers;

// Re-export commonly used types
pub use env_var::EnvOverrides;
pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
pub use mime_table::StaticMimeTypes;
pub use system_probe::SystemProbe;
pub use tracing_verbosity::TracingVerbosity;
#[cfg(feature = "reload")]
pub use watchers::{reload_on_change, FileWatcher};
