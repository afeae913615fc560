// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use formcfg::domain::{ConfigError, Result};
use formcfg::ports::{DocumentStore, EnvironmentProbe};
use formcfg::service::Subscription;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// A store that keeps every write and can be told to fail reads.
#[derive(Debug, Default)]
pub struct RecordingStore {
    document: Mutex<Option<String>>,
    writes: Mutex<Vec<String>>,
    fail_reads: AtomicBool,
}

impl RecordingStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding `document`.
    pub fn with_document(document: impl Into<String>) -> Self {
        let store = Self::default();
        store.set_document(document);
        store
    }

    /// Replaces the document as an external editor would.
    pub fn set_document(&self, document: impl Into<String>) {
        *self.document.lock().unwrap() = Some(document.into());
    }

    /// Makes subsequent reads fail (or succeed again).
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Every document written so far, oldest first.
    pub fn writes(&self) -> Vec<String> {
        self.writes.lock().unwrap().clone()
    }

    /// The most recent write.
    pub fn last_write(&self) -> Option<String> {
        self.writes.lock().unwrap().last().cloned()
    }
}

impl DocumentStore for RecordingStore {
    fn name(&self) -> &str {
        "recording"
    }

    fn read(&self) -> Result<String> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(ConfigError::StoreError {
                store_name: "recording".to_string(),
                message: "read failure requested".to_string(),
                source: None,
            });
        }
        self.document
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| ConfigError::DocumentNotFound {
                location: "recording".to_string(),
            })
    }

    fn write(&self, document: &str) -> Result<()> {
        self.set_document(document);
        self.writes.lock().unwrap().push(document.to_string());
        Ok(())
    }
}

/// A host probe with fixed answers.
#[derive(Debug, Clone, Default)]
pub struct FixedProbe {
    pub user: Option<String>,
    pub executables: Vec<String>,
}

impl FixedProbe {
    pub fn new(user: Option<&str>, executables: &[&str]) -> Self {
        Self {
            user: user.map(str::to_string),
            executables: executables.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl EnvironmentProbe for FixedProbe {
    fn current_user(&self) -> Option<String> {
        self.user.clone()
    }

    fn has_executable(&self, name: &str) -> bool {
        self.executables.iter().any(|e| e == name)
    }
}

/// Polls `sub` until it reports something or `timeout` elapses.
pub fn wait_for(sub: &mut Subscription, timeout: Duration) -> Option<bool> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(result) = sub.try_changed() {
            return Some(result);
        }
        if Instant::now() >= deadline {
            return None;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
}

/// Gives a detached broadcast time to land, then checks nothing arrived.
pub fn assert_quiet(sub: &mut Subscription) {
    std::thread::sleep(Duration::from_millis(100));
    assert_eq!(sub.try_changed(), None);
}

/// A hand-written document with an override, an unknown section and connections.
pub const SAMPLE_DOCUMENT: &str = r#"{
  "general": {
    "port": 9999,
    "name": "Team Files"
  },
  "custom": {
    "zeta": 1,
    "alpha": true
  },
  "log": {
    "level": "DEBUG"
  },
  "connections": [
    {"type": "ftp", "label": "FTP", "hostname": "ftp.example.com"},
    {"type": "s3", "label": "S3"}
  ]
}"#;
