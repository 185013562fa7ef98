//! git::mock
//!
//! In-memory Git backend for deterministic testing.
//!
//! # Design
//!
//! [`MockBackend`] implements [`GitBackend`] over a set of registered
//! [`MockRepo`]s. Failures can be queued for upcoming opens or reads, and
//! every call is recorded as a [`MockOperation`] so tests can check what
//! happened and in which order. [`MockSleeper`] records into the same log,
//! which makes "handle released before the pause" observable.
//!
//! # Example
//!
//! ```
//! use repoview::git::mock::{MockBackend, MockRepo};
//! use repoview::git::GitError;
//! use repoview::reader::{ReadRepository, RepositoryReader};
//! use std::path::Path;
//!
//! let backend = MockBackend::new();
//! backend.add_repo(MockRepo::new("/work/project"));
//! backend.fail_next_opens(vec![GitError::Locked { message: "index.lock".into() }]);
//!
//! let reader = RepositoryReader::with_parts(backend.clone(), backend.sleeper());
//! let snap = reader.read_repository(Some(Path::new("/work/project/src"))).unwrap();
//!
//! assert_eq!(snap.name(), "project");
//! assert_eq!(backend.sleep_count(), 1);
//! ```

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use super::interface::{GitBackend, GitError, RepoHandle, Tracking};
use crate::core::types::RepoRoot;
use crate::reader::Sleeper;

/// Mock backend for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping; clones share state.
#[derive(Debug, Clone, Default)]
pub struct MockBackend {
    /// Internal state shared across clones.
    inner: Arc<Mutex<MockBackendInner>>,
}

/// Internal mutable state.
#[derive(Debug, Default)]
struct MockBackendInner {
    /// Registered repositories.
    repos: Vec<MockRepo>,
    /// Errors returned by the next opens, front first.
    open_failures: VecDeque<GitError>,
    /// Errors returned by the next branch reads, front first.
    read_failures: VecDeque<GitError>,
    /// Recorded operations for verification.
    operations: Vec<MockOperation>,
}

/// A repository known to the mock backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockRepo {
    /// Working directory
    pub work_dir: PathBuf,
    /// Branch friendly names
    pub branches: Vec<String>,
    /// HEAD friendly name
    pub head: String,
    /// Upstream counts, if HEAD tracks one
    pub tracking: Option<Tracking>,
}

impl MockRepo {
    /// A repository on `main` with no upstream.
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
            branches: vec!["main".to_string()],
            head: "main".to_string(),
            tracking: None,
        }
    }

    /// Set the branch list.
    pub fn with_branches(mut self, branches: &[&str]) -> Self {
        self.branches = branches.iter().map(|b| b.to_string()).collect();
        self
    }

    /// Set HEAD.
    pub fn with_head(mut self, head: &str) -> Self {
        self.head = head.to_string();
        self
    }

    /// Give HEAD an upstream.
    pub fn with_tracking(mut self, ahead: usize, behind: usize) -> Self {
        self.tracking = Some(Tracking { ahead, behind });
        self
    }

    fn root(&self) -> RepoRoot {
        RepoRoot::new(self.work_dir.join(".git"))
    }
}

/// Recorded operation for test verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockOperation {
    Discover { path: PathBuf },
    Open { root: RepoRoot },
    ReadBranches,
    Release,
    Sleep { duration: Duration },
}

impl MockBackend {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MockBackendInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Register a repository.
    pub fn add_repo(&self, repo: MockRepo) {
        self.lock().repos.push(repo);
    }

    /// Replace a registered repository (matched by working directory).
    pub fn update_repo(&self, repo: MockRepo) {
        let mut inner = self.lock();
        inner.repos.retain(|r| r.work_dir != repo.work_dir);
        inner.repos.push(repo);
    }

    /// Make the next opens fail with these errors, in order.
    pub fn fail_next_opens(&self, errors: Vec<GitError>) {
        self.lock().open_failures.extend(errors);
    }

    /// Make the next branch reads fail with these errors, in order.
    ///
    /// The handle is already open when these fire.
    pub fn fail_next_reads(&self, errors: Vec<GitError>) {
        self.lock().read_failures.extend(errors);
    }

    /// Sleeper that records into this backend's operation log.
    pub fn sleeper(&self) -> MockSleeper {
        MockSleeper {
            inner: Arc::clone(&self.inner),
        }
    }

    /// All recorded operations.
    pub fn operations(&self) -> Vec<MockOperation> {
        self.lock().operations.clone()
    }

    /// Number of discover calls.
    pub fn discover_count(&self) -> usize {
        self.count(|op| matches!(op, MockOperation::Discover { .. }))
    }

    /// Number of open calls, successful or not.
    pub fn open_count(&self) -> usize {
        self.count(|op| matches!(op, MockOperation::Open { .. }))
    }

    /// Number of handles dropped.
    pub fn release_count(&self) -> usize {
        self.count(|op| matches!(op, MockOperation::Release))
    }

    /// Number of pauses.
    pub fn sleep_count(&self) -> usize {
        self.count(|op| matches!(op, MockOperation::Sleep { .. }))
    }

    fn count(&self, pred: impl Fn(&MockOperation) -> bool) -> usize {
        self.lock().operations.iter().filter(|op| pred(op)).count()
    }
}

impl GitBackend for MockBackend {
    type Handle = MockHandle;

    fn discover(&self, path: &Path) -> Result<RepoRoot, GitError> {
        let mut inner = self.lock();
        inner.operations.push(MockOperation::Discover {
            path: path.to_path_buf(),
        });

        path.ancestors()
            .find_map(|dir| inner.repos.iter().find(|r| r.work_dir == dir))
            .map(MockRepo::root)
            .ok_or_else(|| GitError::NotARepo {
                path: path.to_path_buf(),
            })
    }

    fn open(&self, root: &RepoRoot) -> Result<MockHandle, GitError> {
        let mut inner = self.lock();
        inner
            .operations
            .push(MockOperation::Open { root: root.clone() });

        if let Some(err) = inner.open_failures.pop_front() {
            return Err(err);
        }

        let repo = inner
            .repos
            .iter()
            .find(|r| r.root() == *root)
            .cloned()
            .ok_or_else(|| GitError::NotARepo {
                path: root.as_path().to_path_buf(),
            })?;

        Ok(MockHandle {
            repo,
            inner: Arc::clone(&self.inner),
        })
    }
}

/// Open handle on a [`MockRepo`]; records [`MockOperation::Release`] on drop.
#[derive(Debug)]
pub struct MockHandle {
    repo: MockRepo,
    inner: Arc<Mutex<MockBackendInner>>,
}

impl MockHandle {
    fn lock(&self) -> MutexGuard<'_, MockBackendInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl RepoHandle for MockHandle {
    fn work_dir(&self) -> Result<PathBuf, GitError> {
        Ok(self.repo.work_dir.clone())
    }

    fn branches(&self) -> Result<Vec<String>, GitError> {
        let mut inner = self.lock();
        inner.operations.push(MockOperation::ReadBranches);
        match inner.read_failures.pop_front() {
            Some(err) => Err(err),
            None => Ok(self.repo.branches.clone()),
        }
    }

    fn head_name(&self) -> Result<String, GitError> {
        Ok(self.repo.head.clone())
    }

    fn tracking(&self) -> Result<Option<Tracking>, GitError> {
        Ok(self.repo.tracking)
    }
}

impl Drop for MockHandle {
    fn drop(&mut self) {
        self.lock().operations.push(MockOperation::Release);
    }
}

/// Sleeper that records pauses instead of blocking.
#[derive(Debug, Clone)]
pub struct MockSleeper {
    inner: Arc<Mutex<MockBackendInner>>,
}

impl Sleeper for MockSleeper {
    fn sleep(&self, duration: Duration) {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .operations
            .push(MockOperation::Sleep { duration });
    }
}
