// SPDX-License-Identifier: MIT OR Apache-2.0

//! Log verbosity sink trait definition.
//!
//! After every reload the settings tree hands the `log.level` setting to a
//! `VerbositySink`, which is how an edited document changes logging without a
//! restart.

/// Receives the configured log level.
///
/// Levels are the strings offered by the `log.level` setting (`DEBUG`, `INFO`,
/// `WARNING`, `ERROR`); implementations should treat anything else leniently.
pub trait VerbositySink: Send + Sync {
    /// Applies `level`.
    fn set_level(&self, level: &str);
}

impl<F> VerbositySink for F
where
    F: Fn(&str) + Send + Sync,
{
    fn set_level(&self, level: &str) {
        self(level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_closure_sink() {
        let seen = Arc::new(Mutex::new(String::new()));
        let seen_clone = Arc::clone(&seen);
        let sink: Box<dyn VerbositySink> = Box::new(move |level: &str| {
            *seen_clone.lock().unwrap() = level.to_string();
        });

        sink.set_level("DEBUG");
        assert_eq!(*seen.lock().unwrap(), "DEBUG");
    }
}
