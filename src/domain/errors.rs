// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the settings tree.
//!
//! This module defines the error types that can occur when loading, persisting or
//! watching the settings document. All errors use `thiserror` for proper error
//! handling and conversion.
//!
//! Note that reading a setting never fails: typed projections return a zero value
//! on mismatch and unknown paths are created on demand. Errors only surface at the
//! boundary with the document store.

use thiserror::Error;

/// The main error type for settings operations.
///
/// It is marked as `#[non_exhaustive]` to allow for future additions without
/// breaking backwards compatibility.
///
/// # Examples
///
/// ```
/// use formcfg::domain::errors::ConfigError;
///
/// fn read_document() -> Result<String, ConfigError> {
///     Err(ConfigError::DocumentNotFound {
///         location: "/etc/app/config.json".to_string(),
///     })
/// }
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// No persisted document exists yet at the store location.
    #[error("Settings document not found: {location}")]
    DocumentNotFound {
        /// Where the store looked for the document
        location: String,
    },

    /// An error occurred in a document store.
    #[error("Document store '{store_name}' error: {message}")]
    StoreError {
        /// The name of the store that encountered the error
        store_name: String,
        /// The error message
        message: String,
        /// The underlying error, if any
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Failed to parse the persisted document.
    #[error("Failed to parse settings document: {message}")]
    ParseError {
        /// The error message
        message: String,
        /// The underlying parsing error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An error occurred in a document watcher.
    #[error("Settings watcher error: {message}")]
    WatcherError {
        /// The error message
        message: String,
        /// The underlying error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An I/O error occurred while reading or writing the document.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ConfigError {
    /// Creates a ParseError from a `serde_json` error.
    pub fn from_json_error(err: serde_json::Error) -> Self {
        ConfigError::ParseError {
            message: format!("invalid JSON at line {} column {}", err.line(), err.column()),
            source: Some(Box::new(err)),
        }
    }

    /// Returns `true` if this error means the document simply does not exist yet.
    pub fn is_not_found(&self) -> bool {
        match self {
            ConfigError::DocumentNotFound { .. } => true,
            ConfigError::IoError(e) => e.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

/// A specialized Result type for settings operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
