//! git
//!
//! Single interface for all Git operations.
//!
//! # Architecture
//!
//! This module is the **ONLY doorway** to Git. No other module should
//! import `git2`. The reader depends on the [`GitBackend`] and
//! [`RepoHandle`] traits, so the `git2`-backed implementation can be
//! swapped for [`mock::MockBackend`] in tests.
//!
//! # Responsibilities
//!
//! - Repository discovery and opening
//! - Branch enumeration
//! - HEAD and upstream tracking queries
//! - Classifying libgit2 failures (lock contention vs. everything else)
//!
//! # Invariants
//!
//! - Handles are released on drop; nothing stays open between calls
//! - Every operation is read-only
//!
//! # Example
//!
//! ```ignore
//! use repoview::git::{Git2Backend, GitBackend, RepoHandle};
//! use std::path::Path;
//!
//! let backend = Git2Backend;
//! let root = backend.discover(Path::new("."))?;
//! let branches = backend.open(&root)?.branches()?;
//! ```

mod interface;
pub mod mock;

pub use interface::{Git, Git2Backend, GitBackend, GitError, RepoHandle, Tracking};
