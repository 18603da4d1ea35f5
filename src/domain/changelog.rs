use chrono::NaiveDateTime;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::domain::{ConventionalCommit, Version};

/// Changes gathered for a single release
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangelogEntryData {
    /// Commits of type `fix`
    #[serde(default)]
    pub fixes: Vec<ConventionalCommit>,
    /// Commits of type `feat`
    #[serde(default)]
    pub feats: Vec<ConventionalCommit>,
    /// Other commit types in order of first appearance, kept only when
    /// they carry breaking changes
    #[serde(default)]
    pub others: IndexMap<String, Vec<ConventionalCommit>>,
}

impl ChangelogEntryData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a list of commits into a new entry.
    ///
    /// Returns `None` if none of the commits was relevant.
    pub fn from_conventional_commit_list<'a, I>(commits: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a ConventionalCommit>,
    {
        let mut data = Self::new();
        for commit in commits {
            data.update(commit.clone());
        }
        if data.is_empty() {
            None
        } else {
            Some(data)
        }
    }

    /// Classify a commit into the right bucket
    pub fn update(&mut self, commit: ConventionalCommit) {
        match commit.data.r#type.as_str() {
            "fix" => self.fixes.push(commit),
            "feat" => self.feats.push(commit),
            other => {
                if commit.data.is_breaking_change() {
                    self.others
                        .entry(other.to_string())
                        .or_default()
                        .push(commit);
                }
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fixes.is_empty() && self.feats.is_empty() && self.others.is_empty()
    }

    /// Breaking change notes of all gathered commits, fixes first, then feats, then others
    pub fn breaking_changes(&self) -> Vec<&str> {
        self.fixes
            .iter()
            .chain(self.feats.iter())
            .chain(self.others.values().flatten())
            .flat_map(|commit| commit.data.breaking_changes.iter().map(String::as_str))
            .collect()
    }
}

/// Single changelog entry.
///
/// `version == None` marks unreleased changes; `prev_version == None` with a
/// version set marks the initial release.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangelogEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<Version>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev_version: Option<Version>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub released: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<ChangelogEntryData>,
}

impl ChangelogEntry {
    pub fn is_initial(&self) -> bool {
        self.version.is_some() && self.prev_version.is_none()
    }
}

/// Entries ordered oldest first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Changelog {
    #[serde(default)]
    pub entries: Vec<ChangelogEntry>,
}

impl Changelog {
    pub fn new(entries: Vec<ChangelogEntry>) -> Self {
        Changelog { entries }
    }

    pub fn push(&mut self, entry: ChangelogEntry) {
        self.entries.push(entry);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::mock::make_commit;

    fn conventional(message: &str) -> ConventionalCommit {
        ConventionalCommit::from_commit(make_commit(message)).unwrap()
    }

    #[test]
    fn test_update_classifies_fix_and_feat() {
        let mut data = ChangelogEntryData::new();
        data.update(conventional("fix: a fix"));
        data.update(conventional("feat: a feat"));
        assert_eq!(data.fixes.len(), 1);
        assert_eq!(data.feats.len(), 1);
        assert!(data.others.is_empty());
        assert!(!data.is_empty());
    }

    #[test]
    fn test_update_ignores_other_types_without_breaking_changes() {
        let mut data = ChangelogEntryData::new();
        data.update(conventional("chore: cleanup"));
        data.update(conventional("docs: readme"));
        assert!(data.is_empty());
    }

    #[test]
    fn test_update_keeps_breaking_other_types() {
        let mut data = ChangelogEntryData::new();
        data.update(conventional("refactor!: new API"));
        assert_eq!(data.others["refactor"].len(), 1);
        assert_eq!(data.breaking_changes(), vec!["new API"]);
    }

    #[test]
    fn test_breaking_changes_order_and_freshness() {
        let mut data = ChangelogEntryData::new();
        data.update(conventional("chore!: third"));
        data.update(conventional("feat!: second"));
        assert_eq!(data.breaking_changes(), vec!["second", "third"]);

        data.update(conventional("fix: one\n\nBREAKING CHANGE: first"));
        assert_eq!(data.breaking_changes(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_breaking_changes_of_other_types_keep_fold_order() {
        let data = ChangelogEntryData::from_conventional_commit_list(&[
            conventional("test!: a breaking test"),
            conventional("chore: spam\n\nBREAKING CHANGE: another breaking change"),
            conventional("build!: a breaking build"),
        ])
        .unwrap();
        assert_eq!(
            data.others.keys().collect::<Vec<_>>(),
            vec!["test", "chore", "build"]
        );
        assert_eq!(
            data.breaking_changes(),
            vec!["a breaking test", "another breaking change", "a breaking build"]
        );
    }

    #[test]
    fn test_from_conventional_commit_list() {
        let commits = vec![conventional("docs: foo"), conventional("fix: bar")];
        let data = ChangelogEntryData::from_conventional_commit_list(&commits).unwrap();
        assert_eq!(data.fixes, vec![commits[1].clone()]);

        let irrelevant = vec![conventional("docs: foo")];
        assert!(ChangelogEntryData::from_conventional_commit_list(&irrelevant).is_none());
        assert!(ChangelogEntryData::from_conventional_commit_list(&[]).is_none());
    }

    #[test]
    fn test_changelog_entry_kinds() {
        let initial = ChangelogEntry {
            version: Some(Version::new(0, 0, 1)),
            ..Default::default()
        };
        assert!(initial.is_initial());

        let unreleased = ChangelogEntry::default();
        assert!(!unreleased.is_initial());
    }
}
