// SPDX-License-Identifier: MIT OR Apache-2.0

//! JSON file document store.
//!
//! This module provides a store that keeps the persisted document in a single JSON
//! file, either at a given path or in the OS-appropriate config directory.

use crate::domain::{ConfigError, Result};
use crate::ports::DocumentStore;
use directories::ProjectDirs;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Maximum allowed size of the settings file (10MB)
const MAX_DOCUMENT_SIZE: u64 = 10 * 1024 * 1024;

/// File name used in the default config directory.
pub const DEFAULT_FILE_NAME: &str = "config.json";

const STORE_NAME: &str = "json-file";

/// Document store backed by a JSON file.
///
/// A missing file reads as [`ConfigError::DocumentNotFound`], so a fresh install
/// starts from the built-in defaults and the file appears on first save.
///
/// # Examples
///
/// ```rust,no_run
/// use formcfg::adapters::JsonFileStore;
///
/// // A specific file
/// let store = JsonFileStore::from_file("/etc/myapp/config.json");
///
/// // The default OS location, e.g. ~/.config/myapp/config.json on Linux
/// let store = JsonFileStore::from_default_location("myapp", "com.example").unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    file_path: PathBuf,
    create_dirs: bool,
}

impl JsonFileStore {
    /// Creates a store for the file at `path`.
    ///
    /// The file does not need to exist yet, but its directory does.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Self {
        Self {
            file_path: path.as_ref().to_path_buf(),
            create_dirs: false,
        }
    }

    /// Creates a store for `config.json` in the platform config directory of
    /// `app_name`. Missing directories are created on first save.
    pub fn from_default_location(app_name: &str, qualifier: &str) -> Result<Self> {
        Self::with_filename(app_name, qualifier, DEFAULT_FILE_NAME)
    }

    /// Like [`from_default_location`](Self::from_default_location) with a custom
    /// file name.
    pub fn with_filename(app_name: &str, qualifier: &str, filename: &str) -> Result<Self> {
        let proj_dirs =
            ProjectDirs::from(qualifier, "", app_name).ok_or_else(|| ConfigError::StoreError {
                store_name: STORE_NAME.to_string(),
                message: "Failed to determine project directories".to_string(),
                source: None,
            })?;

        Ok(Self {
            file_path: proj_dirs.config_dir().join(filename),
            create_dirs: true,
        })
    }

    /// Returns the file path.
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    fn display_name(&self) -> &str {
        self.file_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("<unknown>")
    }

    fn store_error(&self, message: String, source: io::Error) -> ConfigError {
        ConfigError::StoreError {
            store_name: STORE_NAME.to_string(),
            message,
            source: Some(Box::new(source)),
        }
    }
}

impl DocumentStore for JsonFileStore {
    fn name(&self) -> &str {
        STORE_NAME
    }

    fn read(&self) -> Result<String> {
        let metadata = match fs::metadata(&self.file_path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(ConfigError::DocumentNotFound {
                    location: self.location(),
                })
            }
            Err(e) => {
                return Err(self.store_error(
                    format!("Failed to read file metadata: {}", self.display_name()),
                    e,
                ))
            }
        };

        if metadata.len() > MAX_DOCUMENT_SIZE {
            return Err(ConfigError::StoreError {
                store_name: STORE_NAME.to_string(),
                message: format!(
                    "Settings file too large: {} bytes (max {} bytes)",
                    metadata.len(),
                    MAX_DOCUMENT_SIZE
                ),
                source: None,
            });
        }

        fs::read_to_string(&self.file_path).map_err(|e| {
            self.store_error(
                format!("Failed to read settings file: {}", self.display_name()),
                e,
            )
        })
    }

    fn write(&self, document: &str) -> Result<()> {
        if self.create_dirs {
            if let Some(parent) = self.file_path.parent() {
                fs::create_dir_all(parent).map_err(|e| {
                    self.store_error(
                        format!("Failed to create directory for: {}", self.display_name()),
                        e,
                    )
                })?;
            }
        }

        fs::write(&self.file_path, document).map_err(|e| {
            self.store_error(
                format!("Failed to write settings file: {}", self.display_name()),
                e,
            )
        })
    }

    fn location(&self) -> String {
        self.file_path.display().to_string()
    }
}
