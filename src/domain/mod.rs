// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain layer containing the settings tree and the logic that operates on it.
//!
//! Everything here is free of I/O and locking: the schema tree and its path
//! resolver, soft-typed values, the order-preserving serializer and the hydrator.

pub mod config_path;
pub mod config_value;
pub mod errors;
pub mod form;
pub mod hydrator;
pub mod schema;
pub mod serializer;
pub mod tree;

// Re-export commonly used types
pub use config_path::ConfigPath;
pub use config_value::{ConfigValue, Decoded, FromConfigValue};
pub use errors::{ConfigError, Result};
pub use form::{Form, FormElement, LeafId};
pub use hydrator::Connection;
pub use tree::{FormNode, SchemaTree};
