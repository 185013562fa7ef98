//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`RepoRoot`] - A repository location produced by discovery
//!
//! A `RepoRoot` can only be obtained from the locator (or a backend's
//! discovery step), so the reader never has to re-validate the path it is
//! handed.

use std::fmt;
use std::path::{Path, PathBuf};

/// A discovered repository root.
///
/// Holds the path the Git library reported for the repository (usually
/// the `.git` directory). Opening this path again is cheap and does not
/// repeat the upward search.
///
/// # Example
///
/// ```
/// use repoview::core::types::RepoRoot;
/// use std::path::Path;
///
/// let root = RepoRoot::new("/work/project/.git");
/// assert_eq!(root.as_path(), Path::new("/work/project/.git"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoRoot(PathBuf);

impl RepoRoot {
    /// Wrap a path returned by repository discovery.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    /// Borrow the underlying path.
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Consume the root, returning the path.
    pub fn into_path_buf(self) -> PathBuf {
        self.0
    }
}

impl AsRef<Path> for RepoRoot {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for RepoRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}
