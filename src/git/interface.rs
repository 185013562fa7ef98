//! git::interface
//!
//! Git access traits and their `git2` implementation.
//!
//! This module provides the **single doorway** to Git for repoview. The
//! reader only sees the [`GitBackend`] and [`RepoHandle`] traits; the
//! production [`Git2Backend`] is the one place that calls `git2`.
//!
//! # Error Handling
//!
//! Git errors are categorized into typed variants:
//! - [`GitError::Locked`]: Repository metadata is locked by another process
//! - [`GitError::NotARepo`]: Path is not a repository
//! - [`GitError::BareRepo`]: Repository has no working directory
//! - [`GitError::AccessError`]: Permission or filesystem error
//! - [`GitError::Internal`]: Anything else reported by libgit2
//!
//! Only `Locked` is considered transient.
//!
//! # Example
//!
//! ```ignore
//! use repoview::git::{Git2Backend, GitBackend, RepoHandle};
//! use std::path::Path;
//!
//! let backend = Git2Backend;
//! let root = backend.discover(Path::new("./src"))?;
//! let git = backend.open(&root)?;
//! println!("on {}", git.head_name()?);
//! // handle released here
//! ```

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::snapshot::DETACHED_HEAD;
use crate::core::types::RepoRoot;

/// Errors from Git operations.
#[derive(Debug, Clone, Error)]
pub enum GitError {
    /// Repository metadata is locked by another process.
    ///
    /// Transient: the same read usually succeeds once the other process
    /// finishes.
    #[error("repository is locked: {message}")]
    Locked {
        /// Message from the Git library
        message: String,
    },

    /// Not a Git repository.
    #[error("not a git repository: {path}")]
    NotARepo {
        /// The path that was opened
        path: PathBuf,
    },

    /// Repository is bare (no working directory).
    #[error("bare repository not supported")]
    BareRepo,

    /// Permission or filesystem error.
    #[error("repository access error: {message}")]
    AccessError {
        /// Description of the error
        message: String,
    },

    /// Internal git2 error.
    #[error("git error: {message}")]
    Internal {
        /// The error message
        message: String,
    },
}

impl GitError {
    /// Check if this is the transient lock error.
    pub fn is_locked(&self) -> bool {
        matches!(self, GitError::Locked { .. })
    }

    /// Create a GitError from a git2::Error with context.
    fn from_git2(err: git2::Error, context: &str) -> Self {
        match (err.code(), err.class()) {
            (git2::ErrorCode::Locked, _) => GitError::Locked {
                message: format!("{}: {}", context, err.message()),
            },
            (_, git2::ErrorClass::Os) => GitError::AccessError {
                message: format!("{}: {}", context, err.message()),
            },
            _ => GitError::Internal {
                message: format!("{}: {}", context, err.message()),
            },
        }
    }
}

/// Ahead/behind counts of HEAD relative to its upstream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tracking {
    /// Commits reachable from HEAD but not from the upstream
    pub ahead: usize,
    /// Commits reachable from the upstream but not from HEAD
    pub behind: usize,
}

/// Repository discovery and opening.
///
/// Implementations must not hold anything open between calls: every
/// resource lives in the returned [`RepoHandle`] and is released when the
/// handle is dropped.
pub trait GitBackend {
    /// Handle type returned by [`open`](Self::open).
    type Handle: RepoHandle;

    /// Search upward from `path` for the enclosing repository.
    ///
    /// Only the directory layout is checked. Broken metadata (config,
    /// format version) is reported by [`open`](Self::open).
    ///
    /// # Errors
    ///
    /// Any error means "no repository found"; callers treat it as absence.
    fn discover(&self, path: &Path) -> Result<RepoRoot, GitError>;

    /// Open the repository at a discovered root.
    fn open(&self, root: &RepoRoot) -> Result<Self::Handle, GitError>;
}

/// Read operations on an open repository.
pub trait RepoHandle {
    /// Path of the working directory.
    fn work_dir(&self) -> Result<PathBuf, GitError>;

    /// Friendly names of all local and remote branches.
    fn branches(&self) -> Result<Vec<String>, GitError>;

    /// Friendly name of HEAD ([`DETACHED_HEAD`] when detached).
    fn head_name(&self) -> Result<String, GitError>;

    /// Ahead/behind counts, or `None` if HEAD has no upstream.
    fn tracking(&self) -> Result<Option<Tracking>, GitError>;
}

/// The production backend, built on `git2`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Git2Backend;

impl GitBackend for Git2Backend {
    type Handle = Git;

    fn discover(&self, path: &Path) -> Result<RepoRoot, GitError> {
        // Path-only search; metadata is read (and may fail) in `open`
        git2::Repository::discover_path(path, std::iter::empty::<&OsStr>())
            .map(RepoRoot::new)
            .map_err(|_| GitError::NotARepo {
                path: path.to_path_buf(),
            })
    }

    fn open(&self, root: &RepoRoot) -> Result<Git, GitError> {
        Git::open(root)
    }
}

/// An open repository.
///
/// Wraps a `git2::Repository`; dropping the `Git` closes it.
pub struct Git {
    /// The underlying git2 repository
    repo: git2::Repository,
}

impl std::fmt::Debug for Git {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Git")
            .field("path", &self.repo.path())
            .finish()
    }
}

impl Git {
    /// Open a repository at an already discovered root.
    ///
    /// Does not search upward; use [`GitBackend::discover`] first.
    ///
    /// # Errors
    ///
    /// - [`GitError::Locked`] if libgit2 reports a lock
    /// - [`GitError::NotARepo`] if there is no repository at `root`
    /// - [`GitError::BareRepo`] if the repository has no working directory
    pub fn open(root: &RepoRoot) -> Result<Self, GitError> {
        let repo = git2::Repository::open(root.as_path()).map_err(|e| match e.code() {
            git2::ErrorCode::NotFound => GitError::NotARepo {
                path: root.as_path().to_path_buf(),
            },
            _ => GitError::from_git2(e, "open"),
        })?;

        if repo.is_bare() {
            return Err(GitError::BareRepo);
        }

        Ok(Self { repo })
    }

    /// Name of the branch an unborn HEAD points at.
    fn unborn_head_name(&self) -> Result<String, GitError> {
        let head = self
            .repo
            .find_reference("HEAD")
            .map_err(|e| GitError::from_git2(e, "HEAD"))?;

        let target = head.symbolic_target().unwrap_or_default();
        Ok(target
            .strip_prefix("refs/heads/")
            .unwrap_or(target)
            .to_string())
    }
}

impl RepoHandle for Git {
    fn work_dir(&self) -> Result<PathBuf, GitError> {
        self.repo
            .workdir()
            .map(Path::to_path_buf)
            .ok_or(GitError::BareRepo)
    }

    fn branches(&self) -> Result<Vec<String>, GitError> {
        let branches = self
            .repo
            .branches(None)
            .map_err(|e| GitError::from_git2(e, "branches"))?;

        let mut names = Vec::new();
        for branch in branches {
            let (branch, _) = branch.map_err(|e| GitError::from_git2(e, "branches"))?;
            // Skip branches with non-UTF8 names
            if let Some(name) = branch.name().ok().flatten() {
                names.push(name.to_string());
            }
        }

        Ok(names)
    }

    fn head_name(&self) -> Result<String, GitError> {
        let head = match self.repo.head() {
            Ok(h) => h,
            Err(e) if e.code() == git2::ErrorCode::UnbornBranch => {
                return self.unborn_head_name();
            }
            Err(e) => return Err(GitError::from_git2(e, "HEAD")),
        };

        if !head.is_branch() {
            return Ok(DETACHED_HEAD.to_string());
        }

        Ok(head.shorthand().unwrap_or(DETACHED_HEAD).to_string())
    }

    fn tracking(&self) -> Result<Option<Tracking>, GitError> {
        let head = match self.repo.head() {
            Ok(h) => h,
            Err(e) if e.code() == git2::ErrorCode::UnbornBranch => return Ok(None),
            Err(e) => return Err(GitError::from_git2(e, "HEAD")),
        };

        // Detached HEAD has no upstream
        if !head.is_branch() {
            return Ok(None);
        }

        let local = git2::Branch::wrap(head);
        let upstream = match local.upstream() {
            Ok(u) => u,
            Err(e) if e.code() == git2::ErrorCode::NotFound => return Ok(None),
            Err(e) => return Err(GitError::from_git2(e, "upstream")),
        };

        let (Some(local_oid), Some(upstream_oid)) = (local.get().target(), upstream.get().target())
        else {
            return Ok(None);
        };

        let (ahead, behind) = self
            .repo
            .graph_ahead_behind(local_oid, upstream_oid)
            .map_err(|e| GitError::from_git2(e, "ahead/behind"))?;

        Ok(Some(Tracking { ahead, behind }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod git_error {
        use super::*;

        #[test]
        fn only_locked_is_locked() {
            assert!(GitError::Locked {
                message: "index.lock".to_string()
            }
            .is_locked());
            assert!(!GitError::BareRepo.is_locked());
            assert!(!GitError::Internal {
                message: "corrupt".to_string()
            }
            .is_locked());
            assert!(!GitError::NotARepo {
                path: PathBuf::from("/tmp")
            }
            .is_locked());
        }

        #[test]
        fn locked_code_maps_to_locked() {
            let err = git2::Error::new(
                git2::ErrorCode::Locked,
                git2::ErrorClass::Reference,
                "failed to lock file",
            );
            assert!(GitError::from_git2(err, "branches").is_locked());
        }

        #[test]
        fn locked_code_with_context_maps_to_locked() {
            let err = git2::Error::new(
                git2::ErrorCode::Locked,
                git2::ErrorClass::Index,
                "index.lock exists",
            );
            let mapped = GitError::from_git2(err, "open");
            assert!(mapped.is_locked());
            assert!(mapped.to_string().contains("open"));
        }

        #[test]
        fn os_class_maps_to_access_error() {
            let err = git2::Error::new(
                git2::ErrorCode::GenericError,
                git2::ErrorClass::Os,
                "permission denied",
            );
            assert!(matches!(
                GitError::from_git2(err, "open"),
                GitError::AccessError { .. }
            ));
        }

        #[test]
        fn other_codes_map_to_internal() {
            let err = git2::Error::new(
                git2::ErrorCode::GenericError,
                git2::ErrorClass::Odb,
                "corrupt object",
            );
            assert!(matches!(
                GitError::from_git2(err, "branches"),
                GitError::Internal { .. }
            ));
        }

        #[test]
        fn error_display_formatting() {
            let err = GitError::Locked {
                message: "config.lock".to_string(),
            };
            assert_eq!(err.to_string(), "repository is locked: config.lock");
        }
    }

    mod backend {
        use super::*;
        use tempfile::TempDir;

        #[test]
        fn discover_ignores_broken_config() {
            let dir = TempDir::new().unwrap();
            git2::Repository::init(dir.path()).unwrap();
            std::fs::write(dir.path().join(".git/config"), "[core\nbroken = = =\n")
                .unwrap();

            let root = Git2Backend.discover(dir.path()).unwrap();
            assert!(root.as_path().ends_with(".git"));

            let err = Git2Backend.open(&root).unwrap_err();
            assert!(matches!(err, GitError::Internal { .. }));
        }

        #[test]
        fn open_non_repository_fails() {
            let dir = TempDir::new().unwrap();
            let result = Git2Backend.open(&RepoRoot::new(dir.path()));
            assert!(matches!(result, Err(GitError::NotARepo { .. })));
        }

        #[test]
        fn open_bare_repository_fails() {
            let dir = TempDir::new().unwrap();
            git2::Repository::init_bare(dir.path()).unwrap();
            let result = Git2Backend.open(&RepoRoot::new(dir.path()));
            assert!(matches!(result, Err(GitError::BareRepo)));
        }

        #[test]
        fn unborn_head_reports_target_branch() {
            let dir = TempDir::new().unwrap();
            let repo = git2::Repository::init(dir.path()).unwrap();
            repo.set_head("refs/heads/trunk").unwrap();

            let root = Git2Backend.discover(dir.path()).unwrap();
            let git = Git2Backend.open(&root).unwrap();

            assert_eq!(git.head_name().unwrap(), "trunk");
            assert_eq!(git.tracking().unwrap(), None);
            assert!(git.branches().unwrap().is_empty());
        }
    }
}
