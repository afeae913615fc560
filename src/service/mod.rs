// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service layer composing the domain with the ports.
//!
//! This module contains the settings facade with its cursor API, the lookup cache
//! and change notifier it relies on, and the first-start bootstrap.

pub mod bootstrap;
pub mod cache;
pub mod configuration;
pub mod notifier;

// Re-export commonly used types
pub use bootstrap::{default_connections, ClientExport};
pub use cache::LookupCache;
pub use configuration::{Configuration, ConfigurationBuilder, PasswordHasher, Setting};
pub use notifier::{ChangeNotifier, Subscription, SubscriptionId};
