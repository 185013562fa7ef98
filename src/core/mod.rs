//! core
//!
//! Core domain types and configuration.
//!
//! # Modules
//!
//! - [`types`] - Strong types: RepoRoot
//! - [`snapshot`] - The immutable repository snapshot
//! - [`config`] - Configuration schema and loading
//!
//! Nothing in here touches Git; see [`crate::git`] for that.

pub mod config;
pub mod snapshot;
pub mod types;
