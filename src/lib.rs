//! repoview - Resilient snapshots of a working directory's Git state
//!
//! Given any filesystem path, repoview finds the enclosing Git repository
//! and reads its current branch, branch list, and upstream ahead/behind
//! counts into an immutable [`RepositorySnapshot`]. Reads that hit a
//! locked repository are retried a bounded number of times.
//!
//! # Architecture
//!
//! - [`reader`] - Locate a repository, then read it with bounded retries
//! - [`core`] - Domain types (snapshot, root path) and configuration
//! - [`git`] - Single interface for all Git operations
//!
//! # Correctness Invariants
//!
//! 1. A read returns one complete snapshot or an error, never a partial one
//! 2. Only lock contention is retried; every other failure surfaces at once
//! 3. No repository handle is held across a retry pause or after a read
//! 4. "No repository" is the Empty snapshot, not an error
//!
//! # Example
//!
//! ```no_run
//! use repoview::{ReadRepository, RepositoryReader};
//! use std::path::Path;
//!
//! let reader = RepositoryReader::new();
//! let snap = reader.read_repository(Some(Path::new("."))).unwrap();
//! println!(
//!     "{} [{}] +{} -{}",
//!     snap.name(),
//!     snap.current_branch(),
//!     snap.ahead_by(),
//!     snap.behind_by()
//! );
//! ```

pub mod core;
pub mod git;
pub mod reader;

pub use crate::core::snapshot::{RepositorySnapshot, NO_TRACKING};
pub use crate::git::GitError;
pub use crate::reader::{ReadRepository, RepositoryReader};
