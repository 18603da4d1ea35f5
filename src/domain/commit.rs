use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::conventional::{ConventionalCommitParser, ParsedMessage};
use crate::git::Commit;

/// Data parsed from a conventional commit message.
///
/// Two commit types carry special meaning: `fix` marks bug fixes and
/// `feat` marks new features. Breaking changes come either from a `!`
/// after the type/scope or from `BREAKING CHANGE` footers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConventionalCommitData {
    #[serde(rename = "type")]
    pub r#type: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(default)]
    pub breaking_changes: Vec<String>,
    #[serde(default)]
    pub footers: IndexMap<String, String>,
}

impl ConventionalCommitData {
    /// Create data with only type and description set
    pub fn new(r#type: impl Into<String>, description: impl Into<String>) -> Self {
        ConventionalCommitData {
            r#type: r#type.into(),
            description: description.into(),
            body: None,
            scope: None,
            breaking_changes: Vec::new(),
            footers: IndexMap::new(),
        }
    }

    /// Parse a commit message.
    ///
    /// Returns `None` if the message is not a conventional commit.
    pub fn from_commit_message(message: &str) -> Option<Self> {
        ConventionalCommitParser::parse(message).map(Self::from)
    }

    /// Check if this commit introduces at least one breaking change
    pub fn is_breaking_change(&self) -> bool {
        !self.breaking_changes.is_empty()
    }
}

impl From<ParsedMessage> for ConventionalCommitData {
    fn from(parsed: ParsedMessage) -> Self {
        ConventionalCommitData {
            r#type: parsed.r#type,
            description: parsed.description,
            body: parsed.body,
            scope: parsed.scope,
            breaking_changes: parsed.breaking_changes,
            footers: parsed.footers,
        }
    }
}

/// Repository commit paired with the conventional commit data parsed from it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConventionalCommit {
    pub commit: Commit,
    pub data: ConventionalCommitData,
}

impl ConventionalCommit {
    /// Returns `None` if the commit message is not a conventional commit
    pub fn from_commit(commit: Commit) -> Option<Self> {
        let data = ConventionalCommitData::from_commit_message(&commit.message)?;
        Some(ConventionalCommit { commit, data })
    }
}
