// SPDX-License-Identifier: MIT OR Apache-2.0

//! Log verbosity sink backed by a `tracing-subscriber` reload handle.

use crate::ports::VerbositySink;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::reload::Handle;

/// Applies `log.level` to a reloadable [`LevelFilter`] layer.
///
/// # Examples
///
/// ```rust
/// use formcfg::adapters::TracingVerbosity;
/// use formcfg::ports::VerbositySink;
/// use tracing_subscriber::filter::LevelFilter;
/// use tracing_subscriber::prelude::*;
/// use tracing_subscriber::reload;
///
/// let (filter, handle) = reload::Layer::new(LevelFilter::INFO);
/// let _subscriber = tracing_subscriber::registry().with(filter);
///
/// let sink = TracingVerbosity::new(handle);
/// sink.set_level("DEBUG");
/// ```
pub struct TracingVerbosity<S> {
    handle: Handle<LevelFilter, S>,
}

impl<S> TracingVerbosity<S> {
    /// Wraps the handle of a reloadable level filter.
    pub fn new(handle: Handle<LevelFilter, S>) -> Self {
        Self { handle }
    }
}

/// Maps a `log.level` option onto a level filter. Matching ignores case.
pub fn parse_level(level: &str) -> Option<LevelFilter> {
    match level.trim().to_ascii_uppercase().as_str() {
        "TRACE" => Some(LevelFilter::TRACE),
        "DEBUG" => Some(LevelFilter::DEBUG),
        "INFO" => Some(LevelFilter::INFO),
        "WARNING" | "WARN" => Some(LevelFilter::WARN),
        "ERROR" => Some(LevelFilter::ERROR),
        "OFF" => Some(LevelFilter::OFF),
        _ => None,
    }
}

impl<S> VerbositySink for TracingVerbosity<S>
where
    S: 'static,
{
    fn set_level(&self, level: &str) {
        let Some(filter) = parse_level(level) else {
            tracing::warn!("Ignoring unknown log level '{}'", level);
            return;
        };
        match self.handle.modify(|current| *current = filter) {
            Ok(()) => tracing::debug!("Log level set to {}", filter),
            Err(e) => tracing::warn!("Failed to change log level: {}", e),
        }
    }
}
