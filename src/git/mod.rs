//! Version control abstraction layer
//!
//! The versioning logic only talks to the repository through the
//! [Repository] trait. Two implementations exist:
//!
//! - [repository::Git2Repository]: a real implementation using the `git2` crate
//! - [mock::MockRepository]: an in-memory implementation for testing
//!
//! ```rust
//! # use bumpify::git::Repository;
//! # fn example<R: Repository>(repo: &R) -> bumpify::error::Result<()> {
//! for tag in repo.list_merged_tags()? {
//!     let commits = repo.list_commits(Some(tag.rev.as_str()), None)?;
//!     println!("{}: {} commit(s) since", tag.name, commits.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::Result;

/// Commit record as read from the repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    /// Full commit id
    pub rev: String,
    pub author: String,
    pub author_email: String,
    /// Author date in UTC
    pub author_date: NaiveDateTime,
    pub message: String,
}

/// Tag record as read from the repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    /// Id of the tagged commit
    pub rev: String,
    /// Tagger date for annotated tags, commit date for lightweight ones (UTC)
    pub created: NaiveDateTime,
}

/// Version control operations needed to bump versions
///
/// ## Error Handling
///
/// All methods return [crate::error::Result<T>]. Implementations map their
/// underlying errors (like `git2::Error`) to [crate::error::BumpifyError].
pub trait Repository: Send {
    /// Name of the currently checked out branch
    fn current_branch(&self) -> Result<String>;

    /// List tags reachable from the current HEAD
    ///
    /// Tags pointing at commits that are not ancestors of HEAD (or HEAD
    /// itself) are left out. Order is unspecified.
    fn list_merged_tags(&self) -> Result<Vec<Tag>>;

    /// List commits in the `(start_rev, end_rev]` range, oldest first
    ///
    /// # Arguments
    /// * `start_rev` - Exclusive lower bound; `None` means from the root
    /// * `end_rev` - Inclusive upper bound; `None` means up to HEAD
    fn list_commits(&self, start_rev: Option<&str>, end_rev: Option<&str>) -> Result<Vec<Commit>>;

    /// Stage the given paths, relative to the working directory
    fn add(&self, paths: &[PathBuf]) -> Result<()>;

    /// Commit staged changes on top of HEAD
    ///
    /// # Returns
    /// * `Ok(String)` - Id of the new commit
    /// * `Err` - If nothing is staged and `allow_empty` is false, or on VCS errors
    fn commit(&self, message: &str, allow_empty: bool) -> Result<String>;

    /// Create a tag named `name` pointing at `rev`
    fn tag(&self, rev: &str, name: &str) -> Result<()>;

    /// Id of the commit HEAD points at, `None` while there are no commits
    fn head_rev(&self) -> Result<Option<String>>;
}
