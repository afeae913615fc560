// SPDX-License-Identifier: MIT OR Apache-2.0

//! Environment overrides applied on first start.
//!
//! This module reads the handful of environment variables that a deployment uses
//! to seed settings before anyone has opened the admin console.

use std::env;

/// Variable holding the initial admin password.
pub const ADMIN_PASSWORD_VAR: &str = "ADMIN_PASSWORD";

/// Variable holding the public URL of the application.
pub const APPLICATION_URL_VAR: &str = "APPLICATION_URL";

/// Maximum length for override values (prevents DoS)
const MAX_ENV_VALUE_LEN: usize = 1048576; // 1MB

/// Values from the environment that override settings during bootstrap.
///
/// Empty values are treated as absent.
///
/// # Examples
///
/// ```rust
/// use formcfg::adapters::EnvOverrides;
///
/// // From the process environment
/// let overrides = EnvOverrides::from_env();
///
/// // Explicit values
/// let overrides = EnvOverrides::with_values("s3cret", "https://files.example.com");
/// assert_eq!(overrides.application_url, "https://files.example.com");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverrides {
    /// Plain-text admin password; hashed before it is stored
    pub admin_password: String,
    /// Public URL, stored as the host setting
    pub application_url: String,
}

impl EnvOverrides {
    /// Reads `ADMIN_PASSWORD` and `APPLICATION_URL`.
    pub fn from_env() -> Self {
        Self::with_prefix("")
    }

    /// Reads the override variables with `prefix` prepended to their names,
    /// e.g. `MYAPP_ADMIN_PASSWORD`.
    pub fn with_prefix(prefix: &str) -> Self {
        let overrides = Self {
            admin_password: read_var(&format!("{}{}", prefix, ADMIN_PASSWORD_VAR)),
            application_url: read_var(&format!("{}{}", prefix, APPLICATION_URL_VAR)),
        };
        tracing::debug!(
            "Loaded environment overrides (prefix={:?}, admin_password={}, application_url={})",
            prefix,
            !overrides.admin_password.is_empty(),
            !overrides.application_url.is_empty()
        );
        overrides
    }

    /// Creates overrides from explicit values.
    pub fn with_values(admin_password: impl Into<String>, application_url: impl Into<String>) -> Self {
        Self {
            admin_password: admin_password.into(),
            application_url: application_url.into(),
        }
    }

    /// Returns `true` if no override is set.
    pub fn is_empty(&self) -> bool {
        self.admin_password.is_empty() && self.application_url.is_empty()
    }
}

fn read_var(key: &str) -> String {
    match env::var(key) {
        Ok(value) if value.len() > MAX_ENV_VALUE_LEN => {
            tracing::debug!(
                "Skipping oversized environment variable {}: value_len={} (max {})",
                key,
                value.len(),
                MAX_ENV_VALUE_LEN
            );
            String::new()
        }
        Ok(value) => value,
        Err(_) => String::new(),
    }
}
