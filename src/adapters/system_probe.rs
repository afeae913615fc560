// SPDX-License-Identifier: MIT OR Apache-2.0

//! Host environment probe.

use crate::ports::EnvironmentProbe;
use std::env;
use std::path::Path;

/// Probes the real host: the user comes from `USER`/`USERNAME` and executables
/// are searched on `PATH`.
#[derive(Debug, Clone, Default)]
pub struct SystemProbe;

impl SystemProbe {
    /// Creates a new probe.
    pub fn new() -> Self {
        SystemProbe
    }
}

impl EnvironmentProbe for SystemProbe {
    fn current_user(&self) -> Option<String> {
        ["USER", "USERNAME"]
            .iter()
            .filter_map(|key| env::var(key).ok())
            .find(|user| !user.is_empty())
    }

    fn has_executable(&self, name: &str) -> bool {
        let Some(paths) = env::var_os("PATH") else {
            return false;
        };
        env::split_paths(&paths).any(|dir| is_executable(&dir.join(name)))
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file() || path.with_extension("exe").is_file()
}
