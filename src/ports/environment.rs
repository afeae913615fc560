// SPDX-License-Identifier: MIT OR Apache-2.0

//! Environment collaborator traits.
//!
//! The schema delivery and export surfaces report facts the settings tree cannot
//! know by itself: who the process runs as, which helper programs are installed and
//! which mime types the server understands. These traits are the seams for them.

use std::collections::BTreeMap;

/// Probes the host environment.
pub trait EnvironmentProbe: Send + Sync {
    /// Returns the user the process runs as, if it can be determined.
    fn current_user(&self) -> Option<String>;

    /// Returns `true` if an executable named `name` is reachable on the search path.
    fn has_executable(&self, name: &str) -> bool;
}

/// Supplies the extension to mime-type table published by the export surface.
pub trait MimeTypes: Send + Sync {
    /// Returns every known `extension -> mime type` pair.
    fn all(&self) -> BTreeMap<String, String>;
}
