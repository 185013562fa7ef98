//! core::snapshot
//!
//! The immutable result of reading a repository.
//!
//! # Invariants
//!
//! - A snapshot is never mutated after construction. Fields are private
//!   and there are no setters.
//! - Every field comes from one read. A snapshot is either built whole
//!   from [`SnapshotParts`] or not built at all.
//! - `ahead_by` / `behind_by` are non-negative commit counts, or
//!   [`NO_TRACKING`] when HEAD has no upstream.
//!
//! # Example
//!
//! ```
//! use repoview::core::snapshot::{RepositorySnapshot, SnapshotParts, NO_TRACKING};
//!
//! let snap = RepositorySnapshot::from_parts(SnapshotParts {
//!     name: "project".to_string(),
//!     path: "/work/project/".to_string(),
//!     branches: vec!["main".to_string()],
//!     current_branch: "main".to_string(),
//!     ahead_by: NO_TRACKING,
//!     behind_by: NO_TRACKING,
//! });
//!
//! assert_eq!(snap.name(), "project");
//! assert!(!snap.has_upstream());
//! assert!(RepositorySnapshot::empty().is_empty());
//! ```

use serde::{Deserialize, Serialize};

/// Count value meaning "no upstream tracking branch is configured".
///
/// Distinct from `0`, which means the branch is level with its upstream.
pub const NO_TRACKING: i64 = -1;

/// Friendly name reported for a detached HEAD.
pub const DETACHED_HEAD: &str = "(no branch)";

/// Field values for a new snapshot.
///
/// Collected in full by the reader before [`RepositorySnapshot::from_parts`]
/// is called, so a half-read repository never becomes a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotParts {
    /// Last path segment of the working directory
    pub name: String,
    /// Working-directory path
    pub path: String,
    /// Friendly names of local and remote branches
    pub branches: Vec<String>,
    /// Friendly name of HEAD
    pub current_branch: String,
    /// Commits on HEAD not on its upstream, or `NO_TRACKING`
    pub ahead_by: i64,
    /// Commits on the upstream not on HEAD, or `NO_TRACKING`
    pub behind_by: i64,
}

/// Point-in-time view of a working directory's Git state.
///
/// Serializes with camelCase keys (`currentBranch`, `aheadBy`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositorySnapshot {
    name: String,
    path: String,
    branches: Vec<String>,
    current_branch: String,
    ahead_by: i64,
    behind_by: i64,
}

impl RepositorySnapshot {
    /// The snapshot for "no repository here".
    ///
    /// All strings are empty, there are no branches and both counts are 0.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a snapshot from fully collected parts.
    pub fn from_parts(parts: SnapshotParts) -> Self {
        let SnapshotParts {
            name,
            path,
            branches,
            current_branch,
            ahead_by,
            behind_by,
        } = parts;

        Self {
            name,
            path,
            branches,
            current_branch,
            ahead_by,
            behind_by,
        }
    }

    /// Last path segment of the working directory.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Working-directory path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Branch friendly names, in the order the Git library enumerated them.
    pub fn branches(&self) -> &[String] {
        &self.branches
    }

    /// Friendly name of HEAD.
    pub fn current_branch(&self) -> &str {
        &self.current_branch
    }

    /// Commits ahead of upstream, or [`NO_TRACKING`].
    pub fn ahead_by(&self) -> i64 {
        self.ahead_by
    }

    /// Commits behind upstream, or [`NO_TRACKING`].
    pub fn behind_by(&self) -> i64 {
        self.behind_by
    }

    /// True for the [`empty`](Self::empty) snapshot.
    pub fn is_empty(&self) -> bool {
        *self == Self::empty()
    }

    /// True if HEAD had an upstream when the snapshot was taken.
    pub fn has_upstream(&self) -> bool {
        self.ahead_by != NO_TRACKING && self.behind_by != NO_TRACKING
    }

    /// True if HEAD was detached.
    pub fn is_detached(&self) -> bool {
        self.current_branch == DETACHED_HEAD
    }
}
