// SPDX-License-Identifier: MIT OR Apache-2.0

//! Built-in mime-type table.

use crate::ports::MimeTypes;
use once_cell::sync::Lazy;
use std::collections::BTreeMap;

static BUILTIN: Lazy<BTreeMap<String, String>> = Lazy::new(|| {
    [
        ("bmp", "image/bmp"),
        ("css", "text/css"),
        ("csv", "text/csv"),
        ("doc", "application/msword"),
        (
            "docx",
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        ),
        ("gif", "image/gif"),
        ("gz", "application/gzip"),
        ("html", "text/html"),
        ("jpeg", "image/jpeg"),
        ("jpg", "image/jpeg"),
        ("js", "application/javascript"),
        ("json", "application/json"),
        ("md", "text/markdown"),
        ("mkv", "video/x-matroska"),
        ("mp3", "audio/mpeg"),
        ("mp4", "video/mp4"),
        ("odt", "application/vnd.oasis.opendocument.text"),
        ("ogg", "audio/ogg"),
        ("org", "text/org"),
        ("pdf", "application/pdf"),
        ("png", "image/png"),
        ("svg", "image/svg+xml"),
        ("tar", "application/x-tar"),
        ("txt", "text/plain"),
        ("wav", "audio/wav"),
        ("webm", "video/webm"),
        ("webp", "image/webp"),
        ("xml", "application/xml"),
        ("zip", "application/zip"),
    ]
    .into_iter()
    .map(|(ext, mime)| (ext.to_string(), mime.to_string()))
    .collect()
});

/// Static extension to mime-type table, optionally extended by the caller.
///
/// # Examples
///
/// ```rust
/// use formcfg::adapters::StaticMimeTypes;
/// use formcfg::ports::MimeTypes;
///
/// let mime = StaticMimeTypes::new().with("heic", "image/heic");
/// let all = mime.all();
/// assert_eq!(all.get("pdf").map(String::as_str), Some("application/pdf"));
/// assert_eq!(all.get("heic").map(String::as_str), Some("image/heic"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticMimeTypes {
    extra: BTreeMap<String, String>,
}

impl StaticMimeTypes {
    /// Creates the built-in table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces an entry.
    pub fn with(mut self, extension: impl Into<String>, mime: impl Into<String>) -> Self {
        self.extra.insert(extension.into(), mime.into());
        self
    }
}

impl MimeTypes for StaticMimeTypes {
    fn all(&self) -> BTreeMap<String, String> {
        let mut all = BUILTIN.clone();
        all.extend(self.extra.iter().map(|(k, v)| (k.clone(), v.clone())));
        all
    }
}
