// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dot-path newtype used to address settings in the tree.
//!
//! A path joins container titles and a leaf name with `.` separators, e.g.
//! `general.port` or `features.share.enable`.
//!
//! # Malformed paths
//!
//! Every string is a valid path; nothing is rejected:
//!
//! - Empty segments are literal empty-string names, so `"a..b"` walks through a
//!   container titled `""` and `"general."` addresses a leaf named `""`.
//! - A path without any separator, e.g. `"port"`, has no container part. It is read
//!   as `".port"`: the leaf `port` in the root-level container titled `""`.
//!
//! The raw text is kept untouched and used as the lookup cache key, so `"port"` and
//! `".port"` resolve to the same leaf but occupy two cache slots.

use std::fmt;
use std::hash::{Hash, Hasher};

/// Separator between path segments.
pub const SEPARATOR: char = '.';

/// A type-safe wrapper for settings paths.
///
/// # Examples
///
/// ```
/// use formcfg::domain::config_path::ConfigPath;
///
/// let path = ConfigPath::from("features.share.enable");
/// assert_eq!(path.containers(), vec!["features", "share"]);
/// assert_eq!(path.leaf(), "enable");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfigPath(String);

impl ConfigPath {
    /// Creates a new `ConfigPath` from a `String`.
    pub fn new(path: String) -> Self {
        ConfigPath(path)
    }

    /// Joins segments into a path.
    ///
    /// # Examples
    ///
    /// ```
    /// use formcfg::domain::config_path::ConfigPath;
    ///
    /// let path = ConfigPath::join(&["email", "port"]);
    /// assert_eq!(path.as_str(), "email.port");
    /// ```
    pub fn join<S: AsRef<str>>(segments: &[S]) -> Self {
        let parts: Vec<&str> = segments.iter().map(AsRef::as_ref).collect();
        ConfigPath(parts.join("."))
    }

    /// Returns the path as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Converts the `ConfigPath` into its inner `String`.
    pub fn into_string(self) -> String {
        self.0
    }

    /// Returns all segments, containers first and the leaf name last.
    ///
    /// The result always has at least two entries; see the module docs for how
    /// separator-less paths are read.
    pub fn segments(&self) -> Vec<&str> {
        if self.0.contains(SEPARATOR) {
            self.0.split(SEPARATOR).collect()
        } else {
            vec!["", self.0.as_str()]
        }
    }

    /// Returns the container titles leading to the leaf.
    pub fn containers(&self) -> Vec<&str> {
        let mut segments = self.segments();
        segments.pop();
        segments
    }

    /// Returns the leaf name.
    pub fn leaf(&self) -> &str {
        match self.0.rsplit_once(SEPARATOR) {
            Some((_, leaf)) => leaf,
            None => &self.0,
        }
    }
}

impl From<String> for ConfigPath {
    fn from(s: String) -> Self {
        ConfigPath(s)
    }
}

impl From<&str> for ConfigPath {
    fn from(s: &str) -> Self {
        ConfigPath(s.to_string())
    }
}

impl From<&ConfigPath> for ConfigPath {
    fn from(p: &ConfigPath) -> Self {
        p.clone()
    }
}

impl From<ConfigPath> for String {
    fn from(path: ConfigPath) -> Self {
        path.0
    }
}

impl AsRef<str> for ConfigPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Hash for ConfigPath {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}
