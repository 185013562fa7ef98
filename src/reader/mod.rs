//! reader
//!
//! Locate a repository and take a snapshot of it, retrying on lock
//! contention.
//!
//! # Lifecycle
//!
//! ```text
//! path ──locate──► RepoRoot ──read_with_retries──► RepositorySnapshot
//!   │                              │
//!   └─ None/empty/not a repo       └─ Locked: pause, retry (bounded)
//!      => Empty snapshot              other error: fail at once
//! ```
//!
//! # Invariants
//!
//! - A read either returns one complete snapshot or an error. Fields are
//!   collected before the snapshot is built, so no partial value escapes.
//! - Each attempt opens its own handle and drops it before returning,
//!   failing, or pausing. No handle is held across a pause.
//! - Only [`GitError::Locked`] is retried.
//! - The reader keeps no state between calls.
//!
//! # Example
//!
//! ```no_run
//! use repoview::reader::{ReadRepository, RepositoryReader};
//! use std::path::Path;
//!
//! let reader = RepositoryReader::new();
//! let snap = reader.read_repository(Some(Path::new("."))).unwrap();
//! if snap.is_empty() {
//!     println!("not a repository");
//! } else {
//!     println!("{} on {}", snap.name(), snap.current_branch());
//! }
//! ```

use std::path::Path;
use std::time::Duration;

use tracing::{debug, warn};

use crate::core::config::schema::{DEFAULT_BACKOFF, DEFAULT_MAX_ATTEMPTS};
use crate::core::config::ReaderConfig;
use crate::core::snapshot::{RepositorySnapshot, SnapshotParts, NO_TRACKING};
use crate::core::types::RepoRoot;
use crate::git::{Git2Backend, GitBackend, GitError, RepoHandle};

/// Blocking pause between attempts.
pub trait Sleeper {
    /// Block the calling thread for `duration`.
    fn sleep(&self, duration: Duration);
}

/// [`Sleeper`] backed by `std::thread::sleep`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Caller-facing read contract.
pub trait ReadRepository {
    /// Snapshot the repository enclosing `path`.
    ///
    /// `None`, an empty path, or a path outside any repository yields
    /// [`RepositorySnapshot::empty`].
    ///
    /// # Errors
    ///
    /// - [`GitError::Locked`] if every attempt hit a lock
    /// - any other [`GitError`] from the first failing attempt
    fn read_repository(&self, path: Option<&Path>) -> Result<RepositorySnapshot, GitError>;
}

/// Retry loop state for one read.
#[derive(Debug)]
enum ReadState {
    /// About to make attempt `n` (1-based).
    Attempting(u32),
    /// Finished with a complete snapshot.
    Done(RepositorySnapshot),
    /// Finished with an error.
    Failed(GitError),
}

/// Reads repository snapshots through a [`GitBackend`].
///
/// Defaults to `git2` and real sleeps; tests plug in
/// [`MockBackend`](crate::git::mock::MockBackend) and its sleeper.
#[derive(Debug, Clone)]
pub struct RepositoryReader<B = Git2Backend, S = ThreadSleeper> {
    backend: B,
    sleeper: S,
    max_attempts: u32,
    backoff: Duration,
}

impl RepositoryReader {
    /// Production reader: 3 attempts, 500ms apart.
    pub fn new() -> Self {
        Self::with_parts(Git2Backend, ThreadSleeper)
    }

    /// Production reader with settings from config.
    pub fn from_config(config: &ReaderConfig) -> Self {
        Self::new()
            .with_max_attempts(config.max_attempts())
            .with_backoff(config.backoff())
    }
}

impl Default for RepositoryReader {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: GitBackend, S: Sleeper> RepositoryReader<B, S> {
    /// Reader over an explicit backend and sleeper, with default settings.
    pub fn with_parts(backend: B, sleeper: S) -> Self {
        Self {
            backend,
            sleeper,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff: DEFAULT_BACKOFF,
        }
    }

    /// Set the attempt count used by [`ReadRepository::read_repository`].
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Set the pause between attempts.
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    /// Configured attempt count.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Configured pause between attempts.
    pub fn backoff(&self) -> Duration {
        self.backoff
    }

    /// Find the repository enclosing `path`.
    ///
    /// Returns `None` without touching the backend when `path` is `None`
    /// or empty. Discovery failures of any kind are absence, not errors.
    pub fn locate(&self, path: Option<&Path>) -> Option<RepoRoot> {
        let path = path.filter(|p| !p.as_os_str().is_empty())?;

        match self.backend.discover(path) {
            Ok(root) => {
                debug!(path = %path.display(), root = %root, "found repository");
                Some(root)
            }
            Err(e) => {
                debug!(path = %path.display(), error = %e, "no repository");
                None
            }
        }
    }

    /// Snapshot `root`, retrying while the repository is locked.
    ///
    /// Makes at most `max_attempts` attempts (at least one). Between
    /// attempts it pauses for the configured backoff.
    ///
    /// # Errors
    ///
    /// - [`GitError::Locked`] from the last attempt if all were locked
    /// - any other error immediately, without a retry or pause
    pub fn read_with_retries(
        &self,
        root: &RepoRoot,
        max_attempts: u32,
    ) -> Result<RepositorySnapshot, GitError> {
        let max_attempts = max_attempts.max(1);
        let mut state = ReadState::Attempting(1);

        loop {
            state = match state {
                ReadState::Attempting(attempt) => match self.extract(root) {
                    Ok(snapshot) => ReadState::Done(snapshot),
                    Err(e) if e.is_locked() && attempt < max_attempts => {
                        let backoff_ms =
                            u64::try_from(self.backoff.as_millis()).unwrap_or(u64::MAX);
                        warn!(
                            root = %root,
                            attempt,
                            max_attempts,
                            backoff_ms,
                            error = %e,
                            "repository locked, retrying"
                        );
                        self.sleeper.sleep(self.backoff);
                        ReadState::Attempting(attempt + 1)
                    }
                    Err(e) => ReadState::Failed(e),
                },
                ReadState::Done(snapshot) => return Ok(snapshot),
                ReadState::Failed(e) => return Err(e),
            };
        }
    }

    /// One attempt: open `root`, read every field, release the handle.
    ///
    /// The handle is dropped on every exit path, including `?` returns.
    ///
    /// # Errors
    ///
    /// Whatever the backend reports; nothing is caught here.
    pub fn extract(&self, root: &RepoRoot) -> Result<RepositorySnapshot, GitError> {
        let handle = self.backend.open(root)?;

        let work_dir = handle.work_dir()?;
        let name = work_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let path = work_dir.to_string_lossy().into_owned();
        let branches = handle.branches()?;
        let current_branch = handle.head_name()?;
        let (ahead_by, behind_by) = match handle.tracking()? {
            Some(t) => (count(t.ahead), count(t.behind)),
            None => (NO_TRACKING, NO_TRACKING),
        };

        Ok(RepositorySnapshot::from_parts(SnapshotParts {
            name,
            path,
            branches,
            current_branch,
            ahead_by,
            behind_by,
        }))
    }
}

impl<B: GitBackend, S: Sleeper> ReadRepository for RepositoryReader<B, S> {
    #[tracing::instrument(level = "debug", skip(self))]
    fn read_repository(&self, path: Option<&Path>) -> Result<RepositorySnapshot, GitError> {
        match self.locate(path) {
            Some(root) => self.read_with_retries(&root, self.max_attempts),
            None => Ok(RepositorySnapshot::empty()),
        }
    }
}

/// Convert a commit count to the snapshot's signed representation.
fn count(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}
