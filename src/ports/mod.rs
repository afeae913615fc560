// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ports layer containing trait definitions.
//!
//! This module contains the trait definitions (ports) for the collaborators the
//! settings tree depends on but does not implement: document storage, environment
//! probing, mime tables, log verbosity and change watching. Default implementations
//! live in the adapters layer.

pub mod environment;
pub mod store;
pub mod verbosity;
pub mod watcher;

// Re-export commonly used types
pub use environment::{EnvironmentProbe, MimeTypes};
pub use store::DocumentStore;
pub use verbosity::VerbositySink;
pub use watcher::{ChangeCallback, ConfigWatcher};
