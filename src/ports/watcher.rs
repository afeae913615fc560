// SPDX-License-Identifier: MIT OR Apache-2.0

//! Document watcher trait definition.
//!
//! This module defines the `ConfigWatcher` trait, which provides an interface for
//! watching the persisted document for edits made outside the process and triggering
//! callbacks when they occur. The usual callback reloads the settings tree.

use crate::domain::Result;
use std::path::Path;
use std::sync::Arc;

/// Type alias for change notification callbacks.
///
/// The callback receives the location of the document that changed.
pub type ChangeCallback = Arc<dyn Fn(&Path) + Send + Sync>;

/// A trait for watching the persisted document for changes.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow for use in multi-threaded contexts.
///
/// # Examples
///
/// ```rust
/// use formcfg::ports::{ChangeCallback, ConfigWatcher};
/// use formcfg::domain::Result;
///
/// struct MyWatcher;
///
/// impl ConfigWatcher for MyWatcher {
///     fn watch(&mut self, callback: ChangeCallback) -> Result<()> {
///         Ok(())
///     }
///
///     fn stop(&mut self) -> Result<()> {
///         Ok(())
///     }
/// }
/// ```
pub trait ConfigWatcher: Send + Sync {
    /// Starts watching for changes.
    ///
    /// The callback runs on the watcher's own thread and should not block for long.
    fn watch(&mut self, callback: ChangeCallback) -> Result<()>;

    /// Stops watching. No callbacks are delivered after this returns.
    fn stop(&mut self) -> Result<()>;
}
