// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-process document store.

use crate::domain::{ConfigError, Result};
use crate::ports::DocumentStore;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

const STORE_NAME: &str = "memory";

/// Keeps the persisted document in memory and counts writes.
///
/// Useful for tests and for embedding without a file. The write counter makes
/// "this change did not persist" observable.
///
/// # Examples
///
/// ```rust
/// use formcfg::adapters::MemoryStore;
/// use formcfg::ports::DocumentStore;
///
/// let store = MemoryStore::with_document(r#"{"general":{"port":9999}}"#);
/// assert!(store.read().is_ok());
/// assert_eq!(store.write_count(), 0);
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    document: Mutex<Option<String>>,
    writes: AtomicUsize,
    fail_writes: bool,
}

impl MemoryStore {
    /// Creates an empty store. Reading it yields `DocumentNotFound`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store already holding `document`.
    pub fn with_document(document: impl Into<String>) -> Self {
        Self {
            document: Mutex::new(Some(document.into())),
            ..Self::default()
        }
    }

    /// Makes every write fail with a store error.
    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    /// Replaces the held document without counting a write.
    pub fn set_document(&self, document: impl Into<String>) {
        *self.slot() = Some(document.into());
    }

    /// Returns the held document.
    pub fn document(&self) -> Option<String> {
        self.slot().clone()
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.document.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl DocumentStore for MemoryStore {
    fn name(&self) -> &str {
        STORE_NAME
    }

    fn read(&self) -> Result<String> {
        self.slot()
            .clone()
            .ok_or_else(|| ConfigError::DocumentNotFound {
                location: STORE_NAME.to_string(),
            })
    }

    fn write(&self, document: &str) -> Result<()> {
        if self.fail_writes {
            return Err(ConfigError::StoreError {
                store_name: STORE_NAME.to_string(),
                message: "writes are disabled".to_string(),
                source: None,
            });
        }
        *self.slot() = Some(document.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
