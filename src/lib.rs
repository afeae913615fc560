// SPDX-License-Identifier: MIT OR Apache-2.0

//! A hierarchical, order-preserving settings tree.
//!
//! Settings live in a schema tree of titled containers holding typed leaf elements,
//! addressed by dot-separated paths such as `general.port`. The tree is persisted as
//! a JSON document whose key order follows declaration order, so saves are stable
//! and diffable. Unknown paths extend the schema on first use, and subscribers are
//! notified whenever the document is reloaded.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain Layer**: the schema tree, paths, soft-typed values, the serializer and
//!   the hydrator (`SchemaTree`, `ConfigPath`, `ConfigValue`, errors)
//! - **Ports**: traits for the collaborators (`DocumentStore`, `EnvironmentProbe`,
//!   `MimeTypes`, `VerbositySink`, `ConfigWatcher`)
//! - **Adapters**: default implementations (JSON file, in-memory store, host probe,
//!   tracing verbosity, file watcher)
//! - **Service**: the `Configuration` facade with its `Setting` cursor, the lookup
//!   cache, the change notifier and first-start bootstrap
//!
//! # Features
//!
//! - **Declaration order**: the persisted document keeps schema order, not
//!   alphabetical order
//! - **Lazy schema**: reading an unknown path creates it as a plain text setting
//! - **Soft typing**: typed reads never fail; mismatches yield a zero value
//! - **Reload notifications**: non-blocking, coalescing change signals
//!
//! # Feature Flags
//!
//! - `cli`: Build the `formcfg` command-line tool (default)
//! - `reload`: Enable file watching with automatic reload
//! - `full`: Enable all features
//!
//! # Quick Start
//!
//! ```rust
//! use formcfg::prelude::*;
//! use std::sync::Arc;
//!
//! let config = Configuration::new(Arc::new(MemoryStore::new()));
//!
//! // Declared settings carry defaults
//! assert_eq!(config.get("general.port").as_int(), 8334);
//!
//! // Writes persist through the store
//! config.get("general.port").set(9999);
//!
//! // Unknown settings are created on demand
//! config.get("custom.flag").set_default(true);
//! assert!(config.get("custom.flag").as_bool());
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

/// Commonly used types and traits.
///
/// This module re-exports the most commonly used types and traits for convenient access.
pub mod prelude {
    pub use crate::domain::{ConfigError, ConfigPath, ConfigValue, Form, FormElement, Result};
    pub use crate::ports::{ConfigWatcher, DocumentStore, EnvironmentProbe, MimeTypes, VerbositySink};
    pub use crate::service::{Configuration, Setting, Subscription};

    pub use crate::adapters::{EnvOverrides, JsonFileStore, MemoryStore};
    #[cfg(feature = "reload")]
    pub use crate::adapters::{reload_on_change, FileWatcher};
}
