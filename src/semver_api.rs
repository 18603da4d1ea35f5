//! Versioning operations on top of the repository and the project files.

use crate::config::SemVerConfig;
use crate::domain::{
    Changelog, ChangelogEntry, ChangelogEntryData, ConventionalCommit, Version, VersionTag,
};
use crate::error::{BumpifyError, Result};
use crate::fs::FileSystem;
use crate::git::Repository;
use crate::render::ChangelogFormat;
use crate::version_file::{update_version_file, Encoding};

/// Ties version tags, commit history, changelogs and version files together
pub struct SemVerApi<R: Repository, F: FileSystem> {
    config: SemVerConfig,
    repo: R,
    fs: F,
}

fn encoding_for(path: &str, name: &str) -> Result<Encoding> {
    Encoding::from_name(name).ok_or_else(|| BumpifyError::UnsupportedEncoding {
        path: path.to_string(),
        encoding: name.to_string(),
    })
}

impl<R: Repository, F: FileSystem> SemVerApi<R, F> {
    pub fn new(config: SemVerConfig, repo: R, fs: F) -> Self {
        SemVerApi { config, repo, fs }
    }

    pub fn config(&self) -> &SemVerConfig {
        &self.config
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    pub fn fs(&self) -> &F {
        &self.fs
    }

    /// Merged tags carrying a version, sorted ascending by version
    pub fn list_version_tags(&self) -> Result<Vec<VersionTag>> {
        let mut tags: Vec<VersionTag> = self
            .repo
            .list_merged_tags()?
            .into_iter()
            .filter_map(VersionTag::from_tag)
            .collect();
        tags.sort_by(|a, b| a.version.cmp(&b.version));
        log::debug!("Found {} version tag(s)", tags.len());
        Ok(tags)
    }

    /// Conventional commits in the `(start_rev, end_rev]` range, oldest first
    pub fn list_conventional_commits(
        &self,
        start_rev: Option<&str>,
        end_rev: Option<&str>,
    ) -> Result<Vec<ConventionalCommit>> {
        let commits = self.repo.list_commits(start_rev, end_rev)?;
        let total = commits.len();
        let conventional: Vec<ConventionalCommit> = commits
            .into_iter()
            .filter_map(ConventionalCommit::from_commit)
            .collect();
        log::debug!(
            "{} of {} commit(s) follow the conventional commit format",
            conventional.len(),
            total
        );
        Ok(conventional)
    }

    /// Build the changelog of already released versions.
    ///
    /// `version_tags` must be sorted ascending; one entry is created per tag.
    pub fn fetch_changelog(&self, version_tags: &[VersionTag]) -> Result<Changelog> {
        let mut changelog = Changelog::default();
        let Some(first) = version_tags.first() else {
            return Ok(changelog);
        };
        changelog.push(ChangelogEntry {
            version: Some(first.version.clone()),
            prev_version: None,
            released: Some(first.tag.created),
            data: None,
        });
        for pair in version_tags.windows(2) {
            let (prev, current) = (&pair[0], &pair[1]);
            let commits = self.list_conventional_commits(
                Some(prev.tag.rev.as_str()),
                Some(current.tag.rev.as_str()),
            )?;
            changelog.push(ChangelogEntry {
                version: Some(current.version.clone()),
                prev_version: Some(prev.version.clone()),
                released: Some(current.tag.created),
                data: ChangelogEntryData::from_conventional_commit_list(&commits),
            });
        }
        Ok(changelog)
    }

    /// Changes made after the given tag (or since the beginning of history)
    ///
    /// Returns `None` if there is nothing worth a release.
    pub fn fetch_unreleased_changes(
        &self,
        version_tag: Option<&VersionTag>,
    ) -> Result<Option<ChangelogEntryData>> {
        let start_rev = version_tag.map(|t| t.tag.rev.as_str());
        let commits = self.list_conventional_commits(start_rev, None)?;
        Ok(ChangelogEntryData::from_conventional_commit_list(&commits))
    }

    /// Write the changelog to every configured changelog file.
    ///
    /// Formats and encodings of all files are checked before anything is written.
    pub fn update_changelog_files(&self, changelog: &Changelog) -> Result<()> {
        let mut targets = Vec::with_capacity(self.config.changelog_files.len());
        for file in &self.config.changelog_files {
            let format = ChangelogFormat::from_path(&file.path)?;
            let encoding = encoding_for(&file.path, &file.encoding)?;
            targets.push((file, format, encoding));
        }
        for (file, format, encoding) in targets {
            let content = format.render(changelog)?;
            self.fs.write(&file.path, &encoding.encode(&content)?)?;
            log::info!("Updated changelog file: {}", file.path);
        }
        Ok(())
    }

    /// Write the new version to every configured version file.
    ///
    /// Files are processed in order; the first failure stops the run and
    /// leaves files written before it untouched.
    pub fn update_version_files(&self, version: &Version) -> Result<()> {
        for file in &self.config.version_files {
            let encoding = encoding_for(&file.path, &file.encoding)?;
            let content = encoding.decode(&self.fs.read(&file.path)?)?;
            let updated = update_version_file(file, version, &content)?;
            self.fs.write(&file.path, &encoding.encode(&updated)?)?;
            log::info!("Updated version file: {}", file.path);
        }
        Ok(())
    }
}
