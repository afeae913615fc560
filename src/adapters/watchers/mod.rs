// SPDX-License-Identifier: MIT OR Apache-2.0

//! Watcher implementations for settings change detection.
//!
//! This module contains implementations of the `ConfigWatcher` trait for
//! noticing edits made to the persisted document outside the process.

#[cfg(feature = "reload")]
pub mod file_watcher;

#[cfg(feature = "reload")]
pub use file_watcher::{reload_on_change, FileWatcher};
