use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::path::PathBuf;
use std::sync::Mutex;

use crate::error::{BumpifyError, Result};
use crate::git::{Commit, Repository, Tag};

/// Timestamp used for mock records: 1999-01-01 plus `days`
pub fn mock_timestamp(days: i64) -> NaiveDateTime {
    let base = NaiveDate::from_ymd_opt(1999, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default();
    base + Duration::days(days)
}

/// Build a commit record with the given message and fixed metadata
pub fn make_commit(message: &str) -> Commit {
    Commit {
        rev: "dummy".to_string(),
        author: "John Doe".to_string(),
        author_email: "jd@example.com".to_string(),
        author_date: mock_timestamp(0),
        message: message.to_string(),
    }
}

/// Build a tag record with the given name and fixed metadata
pub fn make_tag(name: &str) -> Tag {
    Tag {
        name: name.to_string(),
        rev: "dummy".to_string(),
        created: mock_timestamp(0),
    }
}

#[derive(Debug, Default)]
struct MockState {
    branch: String,
    commits: Vec<Commit>,
    tags: Vec<Tag>,
    staged: Vec<PathBuf>,
}

/// In-memory repository with a single linear history.
///
/// Every tag counts as merged. Writes (`add`, `commit`, `tag`) are recorded
/// and can be inspected afterwards.
#[derive(Debug)]
pub struct MockRepository {
    state: Mutex<MockState>,
}

impl MockRepository {
    /// Create a new empty mock repository on branch `main`
    pub fn new() -> Self {
        MockRepository {
            state: Mutex::new(MockState {
                branch: "main".to_string(),
                ..Default::default()
            }),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, MockState>> {
        self.state
            .lock()
            .map_err(|_| BumpifyError::repository("Mock repository lock poisoned"))
    }

    /// Set the current branch
    pub fn set_branch(&self, branch: impl Into<String>) {
        if let Ok(mut state) = self.state.lock() {
            state.branch = branch.into();
        }
    }

    /// Append a commit; its rev is `c{n}` and its date is day `n` after the mock epoch
    pub fn add_commit(&self, message: &str) -> String {
        let Ok(mut state) = self.state.lock() else {
            return String::new();
        };
        let index = state.commits.len();
        let rev = format!("c{}", index);
        state.commits.push(Commit {
            rev: rev.clone(),
            author_date: mock_timestamp(index as i64),
            ..make_commit(message)
        });
        rev
    }

    /// Tag the latest commit, created on the same day as that commit
    pub fn add_tag(&self, name: &str) {
        let Ok(mut state) = self.state.lock() else {
            return;
        };
        let Some(head) = state.commits.last().cloned() else {
            return;
        };
        state.tags.push(Tag {
            name: name.to_string(),
            rev: head.rev,
            created: head.author_date,
        });
    }

    /// Paths staged so far
    pub fn staged(&self) -> Vec<PathBuf> {
        self.state.lock().map(|s| s.staged.clone()).unwrap_or_default()
    }

    /// Tags created so far, in creation order
    pub fn tags(&self) -> Vec<Tag> {
        self.state.lock().map(|s| s.tags.clone()).unwrap_or_default()
    }

    /// Commits in history order
    pub fn commits(&self) -> Vec<Commit> {
        self.state.lock().map(|s| s.commits.clone()).unwrap_or_default()
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn position(commits: &[Commit], rev: &str) -> Result<usize> {
    commits
        .iter()
        .position(|c| c.rev == rev)
        .ok_or_else(|| BumpifyError::repository(format!("Unknown revision: {}", rev)))
}

impl Repository for MockRepository {
    fn current_branch(&self) -> Result<String> {
        Ok(self.lock()?.branch.clone())
    }

    fn list_merged_tags(&self) -> Result<Vec<Tag>> {
        Ok(self.lock()?.tags.clone())
    }

    fn list_commits(&self, start_rev: Option<&str>, end_rev: Option<&str>) -> Result<Vec<Commit>> {
        let state = self.lock()?;
        let start = match start_rev {
            Some(rev) => position(&state.commits, rev)? + 1,
            None => 0,
        };
        let end = match end_rev {
            Some(rev) => position(&state.commits, rev)? + 1,
            None => state.commits.len(),
        };
        Ok(state.commits.get(start..end).map(<[Commit]>::to_vec).unwrap_or_default())
    }

    fn add(&self, paths: &[PathBuf]) -> Result<()> {
        self.lock()?.staged.extend(paths.iter().cloned());
        Ok(())
    }

    fn commit(&self, message: &str, allow_empty: bool) -> Result<String> {
        let mut state = self.lock()?;
        if state.staged.is_empty() && !allow_empty {
            return Err(BumpifyError::repository("Nothing to commit"));
        }
        state.staged.clear();
        let index = state.commits.len();
        let rev = format!("c{}", index);
        state.commits.push(Commit {
            rev: rev.clone(),
            author_date: mock_timestamp(index as i64),
            ..make_commit(message)
        });
        Ok(rev)
    }

    fn tag(&self, rev: &str, name: &str) -> Result<()> {
        let mut state = self.lock()?;
        let commit = state.commits[position(&state.commits, rev)?].clone();
        if state.tags.iter().any(|t| t.name == name) {
            return Err(BumpifyError::repository(format!("Tag already exists: {}", name)));
        }
        state.tags.push(Tag {
            name: name.to_string(),
            rev: commit.rev,
            created: commit.author_date,
        });
        Ok(())
    }

    fn head_rev(&self) -> Result<Option<String>> {
        Ok(self.lock()?.commits.last().map(|c| c.rev.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_repository_list_commits_range() {
        let repo = MockRepository::new();
        let first = repo.add_commit("feat: one");
        let second = repo.add_commit("fix: two");
        let third = repo.add_commit("fix: three");

        let all = repo.list_commits(None, None).unwrap();
        assert_eq!(all.len(), 3);

        let after_first = repo.list_commits(Some(first.as_str()), None).unwrap();
        assert_eq!(
            after_first.iter().map(|c| c.rev.as_str()).collect::<Vec<_>>(),
            vec![second.as_str(), third.as_str()]
        );

        let only_second = repo.list_commits(Some(first.as_str()), Some(second.as_str())).unwrap();
        assert_eq!(only_second.len(), 1);
        assert_eq!(only_second[0].message, "fix: two");
    }

    #[test]
    fn test_mock_repository_unknown_revision() {
        let repo = MockRepository::new();
        repo.add_commit("feat: one");
        assert!(repo.list_commits(Some("nope"), None).is_err());
    }

    #[test]
    fn test_mock_repository_tags() {
        let repo = MockRepository::new();
        let rev = repo.add_commit("feat: one");
        repo.add_tag("v1.0.0");

        let tags = repo.list_merged_tags().unwrap();
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].rev, rev);
        assert_eq!(tags[0].created, mock_timestamp(0));

        assert!(repo.tag(&rev, "v1.0.0").is_err());
    }

    #[test]
    fn test_mock_repository_commit_requires_staged_paths() {
        let repo = MockRepository::new();
        assert!(repo.commit("chore: nothing", false).is_err());

        repo.add(&[PathBuf::from("CHANGELOG.md")]).unwrap();
        assert_eq!(repo.staged(), vec![PathBuf::from("CHANGELOG.md")]);
        let rev = repo.commit("bump: (null) -> 0.0.1", false).unwrap();
        assert_eq!(repo.head_rev().unwrap(), Some(rev));
        assert!(repo.staged().is_empty());
    }

    #[test]
    fn test_mock_repository_branch() {
        let repo = MockRepository::new();
        assert_eq!(repo.current_branch().unwrap(), "main");
        repo.set_branch("develop");
        assert_eq!(repo.current_branch().unwrap(), "develop");
    }
}
