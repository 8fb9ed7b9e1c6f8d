//! Resolution of plan-relative paths against a project root.

use std::path::{Path, PathBuf};

/// Resolves relative paths against a fixed root directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathResolver {
    root: PathBuf,
}

impl PathResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Join `relative` onto the root. Absolute paths pass through.
    ///
    /// Backslash separators are normalised so plans written on Windows
    /// resolve on any host.
    pub fn resolve(&self, relative: impl AsRef<str>) -> PathBuf {
        let normalised = normalise_separators(relative.as_ref());
        let path = Path::new(&normalised);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

fn normalise_separators(path: &str) -> String {
    if cfg!(windows) {
        path.to_string()
    } else {
        path.replace('\\', "/")
    }
}
