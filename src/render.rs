//! Changelog renderers.
//!
//! The output format of a changelog file follows its extension:
//! `.md` is rendered as Markdown and `.json` as JSON.

use std::fmt::Write as _;
use std::path::Path;

use crate::domain::{Changelog, ChangelogEntry, ChangelogEntryData, ConventionalCommit};
use crate::error::{BumpifyError, Result};

/// Supported changelog file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangelogFormat {
    Markdown,
    Json,
}

impl ChangelogFormat {
    /// Pick the format from the file extension
    ///
    /// # Returns
    /// * `Ok(ChangelogFormat)` - For `.md` and `.json` files
    /// * `Err(UnsupportedChangelogFormat)` - For any other extension
    pub fn from_path(path: &str) -> Result<Self> {
        let extension = Path::new(path)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match extension.as_deref() {
            Some("md") => Ok(ChangelogFormat::Markdown),
            Some("json") => Ok(ChangelogFormat::Json),
            _ => Err(BumpifyError::unsupported_changelog_format(path)),
        }
    }

    pub fn render(&self, changelog: &Changelog) -> Result<String> {
        match self {
            ChangelogFormat::Markdown => Ok(render_as_markdown(changelog)),
            ChangelogFormat::Json => render_as_json(changelog),
        }
    }
}

/// Render the changelog as Markdown, newest entry first
pub fn render_as_markdown(changelog: &Changelog) -> String {
    let mut out = String::new();
    for entry in changelog.entries.iter().rev() {
        write_entry(&mut out, entry);
    }
    out
}

/// Render the changelog as pretty-printed JSON, oldest entry first
pub fn render_as_json(changelog: &Changelog) -> Result<String> {
    Ok(serde_json::to_string_pretty(changelog)?)
}

fn write_entry(out: &mut String, entry: &ChangelogEntry) {
    match (&entry.version, &entry.released) {
        (Some(version), Some(released)) => {
            let _ = write!(out, "## {} ({})\n\n", version, released.format("%Y-%m-%d"));
        }
        (Some(version), None) => {
            let _ = write!(out, "## {}\n\n", version);
        }
        (None, _) => out.push_str("## Unreleased\n\n"),
    }
    if entry.is_initial() {
        out.push_str("Initial release.\n\n");
    }
    if let Some(data) = &entry.data {
        write_data(out, data);
    }
}

fn write_data(out: &mut String, data: &ChangelogEntryData) {
    let breaking_changes = data.breaking_changes();
    if !breaking_changes.is_empty() {
        out.push_str("### BREAKING CHANGES\n\n");
        for note in breaking_changes {
            write_bullet(out, note);
        }
        out.push('\n');
    }
    write_section(out, "Fix", &data.fixes);
    write_section(out, "Feat", &data.feats);
}

fn write_section(out: &mut String, title: &str, commits: &[ConventionalCommit]) {
    if commits.is_empty() {
        return;
    }
    let _ = write!(out, "### {}\n\n", title);
    for commit in commits {
        write_bullet(out, &commit.data.description);
    }
    out.push('\n');
}

fn write_bullet(out: &mut String, text: &str) {
    let mut lines = text.lines();
    let _ = writeln!(out, "- {}", lines.next().unwrap_or_default());
    for line in lines {
        if line.is_empty() {
            out.push('\n');
        } else {
            let _ = writeln!(out, "  {}", line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Version;
    use crate::git::mock::{make_commit, mock_timestamp};

    fn conventional(message: &str) -> ConventionalCommit {
        ConventionalCommit::from_commit(make_commit(message)).unwrap()
    }

    fn initial_entry() -> ChangelogEntry {
        ChangelogEntry {
            version: Some(Version::new(0, 0, 1)),
            released: Some(mock_timestamp(0)),
            ..Default::default()
        }
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            ChangelogFormat::from_path("CHANGELOG.md").unwrap(),
            ChangelogFormat::Markdown
        );
        assert_eq!(
            ChangelogFormat::from_path("docs/changelog.JSON").unwrap(),
            ChangelogFormat::Json
        );
        assert!(matches!(
            ChangelogFormat::from_path("CHANGELOG.txt"),
            Err(BumpifyError::UnsupportedChangelogFormat { path }) if path == "CHANGELOG.txt"
        ));
        assert!(ChangelogFormat::from_path("CHANGELOG").is_err());
    }

    #[test]
    fn test_markdown_empty_changelog() {
        assert_eq!(render_as_markdown(&Changelog::default()), "");
    }

    #[test]
    fn test_markdown_initial_release() {
        let changelog = Changelog::new(vec![initial_entry()]);
        assert_eq!(
            render_as_markdown(&changelog),
            "## 0.0.1 (1999-01-01)\n\nInitial release.\n\n"
        );
    }

    #[test]
    fn test_markdown_full_entry() {
        let data = ChangelogEntryData::from_conventional_commit_list(&[
            conventional("fix: a fix"),
            conventional("feat: first feat"),
            conventional("feat: second feat"),
            conventional("test!: a breaking test"),
        ]);
        let changelog = Changelog::new(vec![
            initial_entry(),
            ChangelogEntry {
                version: Some(Version::new(0, 0, 2)),
                prev_version: Some(Version::new(0, 0, 1)),
                released: Some(mock_timestamp(1)),
                data,
            },
        ]);
        assert_eq!(
            render_as_markdown(&changelog),
            "## 0.0.2 (1999-01-02)\n\n\
             ### BREAKING CHANGES\n\n\
             - a breaking test\n\n\
             ### Fix\n\n\
             - a fix\n\n\
             ### Feat\n\n\
             - first feat\n\
             - second feat\n\n\
             ## 0.0.1 (1999-01-01)\n\n\
             Initial release.\n\n"
        );
    }

    #[test]
    fn test_markdown_entry_without_data_renders_header_only() {
        let changelog = Changelog::new(vec![
            initial_entry(),
            ChangelogEntry {
                version: Some(Version::new(0, 0, 2)),
                prev_version: Some(Version::new(0, 0, 1)),
                released: Some(mock_timestamp(1)),
                data: None,
            },
        ]);
        assert_eq!(
            render_as_markdown(&changelog),
            "## 0.0.2 (1999-01-02)\n\n## 0.0.1 (1999-01-01)\n\nInitial release.\n\n"
        );
    }

    #[test]
    fn test_markdown_multiline_breaking_change_is_indented() {
        let data = ChangelogEntryData::from_conventional_commit_list(&[conventional(
            "fix: x\n\nBREAKING CHANGE: first line\nsecond line",
        )]);
        let changelog = Changelog::new(vec![ChangelogEntry {
            data,
            ..Default::default()
        }]);
        assert_eq!(
            render_as_markdown(&changelog),
            "## Unreleased\n\n\
             ### BREAKING CHANGES\n\n\
             - first line\n  second line\n\n\
             ### Fix\n\n\
             - x\n\n"
        );
    }

    #[test]
    fn test_json_shape() {
        let changelog = Changelog::new(vec![initial_entry()]);
        let json = render_as_json(&changelog).unwrap();
        assert_eq!(
            json,
            "{\n  \"entries\": [\n    {\n      \"version\": {\n        \"major\": 0,\n        \"minor\": 0,\n        \"patch\": 1,\n        \"prerelease\": []\n      },\n      \"released\": \"1999-01-01T00:00:00\"\n    }\n  ]\n}"
        );
    }

    #[test]
    fn test_json_keeps_commit_data() {
        let data = ChangelogEntryData::from_conventional_commit_list(&[conventional(
            "feat(api)!: new endpoint",
        )]);
        let changelog = Changelog::new(vec![ChangelogEntry {
            version: Some(Version::new(1, 0, 0).with_prerelease("rc.1")),
            prev_version: Some(Version::new(0, 1, 0)),
            released: Some(mock_timestamp(2)),
            data,
        }]);
        let value: serde_json::Value =
            serde_json::from_str(&render_as_json(&changelog).unwrap()).unwrap();
        let entry = &value["entries"][0];
        assert_eq!(entry["version"]["prerelease"], serde_json::json!(["rc", 1]));
        assert_eq!(entry["released"], "1999-01-03T00:00:00");
        let feat = &entry["data"]["feats"][0];
        assert_eq!(feat["data"]["scope"], "api");
        assert_eq!(feat["data"]["breaking_changes"], serde_json::json!(["new endpoint"]));
        assert!(feat["data"].get("body").is_none());
        assert_eq!(feat["commit"]["author"], "John Doe");
        assert_eq!(entry["data"]["fixes"], serde_json::json!([]));
        assert_eq!(entry["data"]["others"], serde_json::json!({}));

        let parsed: Changelog = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, changelog);
    }
}
