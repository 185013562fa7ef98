//! Property-based tests for the retry loop.
//!
//! These tests use proptest to verify the attempt/pause accounting holds
//! for any mix of lock failures, attempt limits, and backoffs.

use std::path::Path;
use std::time::Duration;

use proptest::prelude::*;

use repoview::core::types::RepoRoot;
use repoview::git::mock::{MockBackend, MockOperation, MockRepo};
use repoview::git::GitError;
use repoview::{ReadRepository, RepositoryReader, NO_TRACKING};

fn locked() -> GitError {
    GitError::Locked {
        message: "index.lock".to_string(),
    }
}

/// Strategy for a non-lock failure.
fn other_error() -> impl Strategy<Value = GitError> {
    prop_oneof![
        Just(GitError::BareRepo),
        "[a-z ]{1,20}".prop_map(|message| GitError::Internal { message }),
        "[a-z ]{1,20}".prop_map(|message| GitError::AccessError { message }),
    ]
}

proptest! {
    /// `k` lock failures with `k < max` attempts: success after exactly `k` pauses.
    #[test]
    fn locks_below_limit_recover(max in 1u32..8, k in 0u32..8, in_read in any::<bool>()) {
        prop_assume!(k < max);

        let backend = MockBackend::new();
        backend.add_repo(MockRepo::new("/r"));
        let failures = vec![locked(); k as usize];
        if in_read {
            backend.fail_next_reads(failures);
        } else {
            backend.fail_next_opens(failures);
        }

        let reader = RepositoryReader::with_parts(backend.clone(), backend.sleeper());
        let snap = reader.read_with_retries(&RepoRoot::new("/r/.git"), max).unwrap();

        prop_assert_eq!(snap.name(), "r");
        prop_assert_eq!(backend.open_count(), k as usize + 1);
        prop_assert_eq!(backend.sleep_count(), k as usize);
    }

    /// Locked on every attempt: exactly `max` opens, `max - 1` pauses, then Locked.
    #[test]
    fn locks_at_limit_fail(max in 1u32..8) {
        let backend = MockBackend::new();
        backend.add_repo(MockRepo::new("/r"));
        backend.fail_next_opens(vec![locked(); max as usize + 2]);

        let reader = RepositoryReader::with_parts(backend.clone(), backend.sleeper());
        let err = reader.read_with_retries(&RepoRoot::new("/r/.git"), max).unwrap_err();

        prop_assert!(err.is_locked());
        prop_assert_eq!(backend.open_count(), max as usize);
        prop_assert_eq!(backend.sleep_count(), max as usize - 1);
    }

    /// Non-lock errors on the first attempt are never retried.
    #[test]
    fn other_errors_not_retried(max in 1u32..8, err in other_error()) {
        let backend = MockBackend::new();
        backend.add_repo(MockRepo::new("/r"));
        backend.fail_next_opens(vec![err]);

        let reader = RepositoryReader::with_parts(backend.clone(), backend.sleeper());
        let result = reader.read_with_retries(&RepoRoot::new("/r/.git"), max);

        prop_assert!(matches!(result, Err(ref e) if !e.is_locked()));
        prop_assert_eq!(backend.open_count(), 1);
        prop_assert_eq!(backend.sleep_count(), 0);
    }

    /// Every pause uses the configured backoff, and every handle is released.
    #[test]
    fn pauses_use_backoff_and_handles_released(
        k in 0usize..5,
        backoff_ms in 0u64..1000,
    ) {
        let backend = MockBackend::new();
        backend.add_repo(MockRepo::new("/r"));
        backend.fail_next_reads(vec![locked(); k]);

        let reader = RepositoryReader::with_parts(backend.clone(), backend.sleeper())
            .with_backoff(Duration::from_millis(backoff_ms));
        reader.read_with_retries(&RepoRoot::new("/r/.git"), 6).unwrap();

        let expected = MockOperation::Sleep { duration: Duration::from_millis(backoff_ms) };
        for op in backend.operations() {
            if let MockOperation::Sleep { .. } = op {
                prop_assert_eq!(op, expected.clone());
            }
        }
        prop_assert_eq!(backend.open_count(), backend.release_count());
    }

    /// Counts are either both the sentinel or both real, never other negatives.
    #[test]
    fn tracking_counts_are_consistent(tracking in proptest::option::of((0usize..10_000, 0usize..10_000))) {
        let backend = MockBackend::new();
        let mut repo = MockRepo::new("/r");
        if let Some((ahead, behind)) = tracking {
            repo = repo.with_tracking(ahead, behind);
        }
        backend.add_repo(repo);

        let reader = RepositoryReader::with_parts(backend.clone(), backend.sleeper());
        let snap = reader.read_repository(Some(Path::new("/r"))).unwrap();

        match tracking {
            Some((ahead, behind)) => {
                prop_assert_eq!(snap.ahead_by(), ahead as i64);
                prop_assert_eq!(snap.behind_by(), behind as i64);
            }
            None => {
                prop_assert_eq!(snap.ahead_by(), NO_TRACKING);
                prop_assert_eq!(snap.behind_by(), NO_TRACKING);
            }
        }
    }
}
