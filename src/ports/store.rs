// SPDX-License-Identifier: MIT OR Apache-2.0

//! Document store trait definition.
//!
//! This module defines the `DocumentStore` trait, the port through which the settings
//! tree reads and writes its persisted document. The tree never touches files
//! directly; anything able to hold a string can back it.

use crate::domain::Result;

/// A trait for persisted-document stores.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; writes happen while the settings lock is
/// held, from whichever thread performed the mutation.
///
/// # Examples
///
/// ```rust
/// use formcfg::ports::DocumentStore;
/// use formcfg::domain::{ConfigError, Result};
///
/// struct NullStore;
///
/// impl DocumentStore for NullStore {
///     fn name(&self) -> &str {
///         "null"
///     }
///
///     fn read(&self) -> Result<String> {
///         Err(ConfigError::DocumentNotFound { location: "nowhere".to_string() })
///     }
///
///     fn write(&self, _document: &str) -> Result<()> {
///         Ok(())
///     }
/// }
/// ```
pub trait DocumentStore: Send + Sync {
    /// Returns a short name for logs and error messages, e.g. `"json-file"`.
    fn name(&self) -> &str;

    /// Reads the whole persisted document.
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The raw document text
    /// * `Err(ConfigError::DocumentNotFound)` - Nothing has been persisted yet
    /// * `Err(ConfigError)` - The document could not be read
    fn read(&self) -> Result<String>;

    /// Replaces the persisted document with `document`.
    fn write(&self, document: &str) -> Result<()>;

    /// Describes where the document lives, for logs.
    fn location(&self) -> String {
        self.name().to_string()
    }
}
