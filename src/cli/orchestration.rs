//! Command workflows
//!
//! Ties configuration, the repository and the project files together for
//! the `init` and `bump` commands, independent of argument parsing and
//! console output.

use chrono::{NaiveDateTime, Utc};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::analyzer::VersionAnalyzer;
use crate::boundary::BoundaryWarning;
use crate::config::{save_config, Config};
use crate::domain::{format_template, Changelog, ChangelogEntry, Version};
use crate::error::{BumpifyError, Result};
use crate::fs::FileSystem;
use crate::git::Repository;
use crate::semver_api::SemVerApi;

/// Result of a bump run
#[derive(Debug, Clone, PartialEq)]
pub enum BumpOutcome {
    /// A new version was computed (and written, unless dry-run)
    Bumped {
        prev_version: Option<Version>,
        version: Version,
    },
    /// Nothing worth a release since `prev_version`
    NoChanges { prev_version: Version },
    /// No bump rule matches the current branch
    NoBumpRule { branch: String },
}

impl BumpOutcome {
    /// Warning to show for outcomes that did not bump anything
    pub fn warning(&self) -> Option<BoundaryWarning> {
        match self {
            BumpOutcome::Bumped { .. } => None,
            BumpOutcome::NoChanges { prev_version } => Some(BoundaryWarning::NoChanges {
                version: prev_version.clone(),
            }),
            BumpOutcome::NoBumpRule { branch } => Some(BoundaryWarning::NoBumpRule {
                branch: branch.clone(),
            }),
        }
    }
}

/// Single step of writing a release
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseAction {
    UpdateChangelogFile(String),
    UpdateVersionFile(String),
    Commit(String),
    Tag(String),
}

impl fmt::Display for ReleaseAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReleaseAction::UpdateChangelogFile(path) => write!(f, "update changelog file: {}", path),
            ReleaseAction::UpdateVersionFile(path) => write!(f, "update version file: {}", path),
            ReleaseAction::Commit(message) => write!(f, "create commit: {}", message),
            ReleaseAction::Tag(name) => write!(f, "create tag: {}", name),
        }
    }
}

/// Version bump transaction
pub struct BumpCommand<R: Repository, F: FileSystem> {
    config: Config,
    api: SemVerApi<R, F>,
}

impl<R: Repository, F: FileSystem> BumpCommand<R, F> {
    pub fn new(config: Config, repo: R, fs: F) -> Self {
        let api = SemVerApi::new(config.semver.clone(), repo, fs);
        BumpCommand { config, api }
    }

    pub fn api(&self) -> &SemVerApi<R, F> {
        &self.api
    }

    /// Bump the version using the current time as release date
    pub fn bump(&self, dry_run: bool) -> Result<BumpOutcome> {
        self.bump_at(Utc::now().naive_utc(), dry_run)
    }

    /// Bump the version.
    ///
    /// Computes the next version from the changes since the latest version
    /// tag, then (unless `dry_run`) writes changelog and version files,
    /// commits them and tags the commit.
    ///
    /// # Arguments
    /// * `released` - Release date recorded in the changelog (UTC)
    /// * `dry_run` - Compute the outcome without touching files or the repository
    ///
    /// Fails with [`BumpifyError::NoCommitsFound`] when the repository has no
    /// commits yet.
    pub fn bump_at(&self, released: NaiveDateTime, dry_run: bool) -> Result<BumpOutcome> {
        if self.api.repo().head_rev()?.is_none() {
            return Err(BumpifyError::NoCommitsFound(
                self.api.fs().root().to_path_buf(),
            ));
        }
        let branch = self.api.repo().current_branch()?;
        let Some(rule) = self.config.find_bump_rule(&branch)? else {
            log::warn!("No bump rule matches branch {}", branch);
            return Ok(BumpOutcome::NoBumpRule { branch });
        };
        log::debug!("Using bump rule '{}' for branch {}", rule.branch, branch);

        let tags = self.api.list_version_tags()?;
        let (prev_version, version, changelog) = match tags.last() {
            None => {
                let version = Version::parse(&self.config.semver.version).ok_or_else(|| {
                    BumpifyError::config(format!(
                        "Invalid initial version: '{}'",
                        self.config.semver.version
                    ))
                })?;
                log::info!("No version tags found, creating initial version {}", version);
                let changelog = Changelog::new(vec![ChangelogEntry {
                    version: Some(version.clone()),
                    prev_version: None,
                    released: Some(released),
                    data: None,
                }]);
                (None, version, changelog)
            }
            Some(latest) => {
                let prev_version = latest.version.clone();
                let Some(data) = self.api.fetch_unreleased_changes(Some(latest))? else {
                    return Ok(BumpOutcome::NoChanges { prev_version });
                };
                let analyzer = VersionAnalyzer::new(rule.clone());
                let Some(version) = analyzer.next_version(&prev_version, &data)? else {
                    return Ok(BumpOutcome::NoChanges { prev_version });
                };
                let mut changelog = self.api.fetch_changelog(&tags)?;
                changelog.push(ChangelogEntry {
                    version: Some(version.clone()),
                    prev_version: Some(prev_version.clone()),
                    released: Some(released),
                    data: Some(data),
                });
                (Some(prev_version), version, changelog)
            }
        };

        if dry_run {
            log::info!("Dry run, leaving files and repository untouched");
        } else {
            self.write_release(prev_version.as_ref(), &version, &changelog)?;
        }

        Ok(BumpOutcome::Bumped {
            prev_version,
            version,
        })
    }

    /// Steps a bump with this outcome takes, in order.
    ///
    /// Empty unless the outcome is [`BumpOutcome::Bumped`].
    pub fn release_actions(&self, outcome: &BumpOutcome) -> Vec<ReleaseAction> {
        let BumpOutcome::Bumped {
            prev_version,
            version,
        } = outcome
        else {
            return Vec::new();
        };
        let semver = &self.config.semver;
        let changelogs = semver
            .changelog_files
            .iter()
            .map(|file| ReleaseAction::UpdateChangelogFile(file.path.clone()));
        let version_files = semver
            .version_files
            .iter()
            .map(|file| ReleaseAction::UpdateVersionFile(file.path.clone()));
        changelogs
            .chain(version_files)
            .chain([
                ReleaseAction::Commit(self.commit_message(prev_version.as_ref(), version)),
                ReleaseAction::Tag(self.tag_name(prev_version.as_ref(), version)),
            ])
            .collect()
    }

    fn commit_message(&self, prev_version: Option<&Version>, version: &Version) -> String {
        format_template(
            &self.config.semver.bump_commit_message_template,
            version,
            prev_version,
        )
    }

    fn tag_name(&self, prev_version: Option<&Version>, version: &Version) -> String {
        format_template(
            &self.config.semver.version_tag_name_template,
            version,
            prev_version,
        )
    }

    fn write_release(
        &self,
        prev_version: Option<&Version>,
        version: &Version,
        changelog: &Changelog,
    ) -> Result<()> {
        self.api.update_changelog_files(changelog)?;
        self.api.update_version_files(version)?;

        let mut paths = self.api.fs().modified_paths();
        paths.sort();
        let repo = self.api.repo();
        repo.add(&paths)?;

        let rev = repo.commit(&self.commit_message(prev_version, version), true)?;
        let tag_name = self.tag_name(prev_version, version);
        repo.tag(&rev, &tag_name)?;
        log::info!("Created bump commit {} tagged {}", rev, tag_name);
        Ok(())
    }
}

/// Result of an init run
#[derive(Debug, Clone, PartialEq)]
pub enum InitOutcome {
    Created(PathBuf),
    AlreadyExists(PathBuf),
}

/// Creates the initial configuration file
pub struct InitCommand {
    config_path: PathBuf,
}

impl InitCommand {
    pub fn new(config_path: impl AsRef<Path>) -> Self {
        InitCommand {
            config_path: config_path.as_ref().to_path_buf(),
        }
    }

    /// Write a default configuration unless one already exists
    pub fn init(&self) -> Result<InitOutcome> {
        if self.config_path.exists() {
            log::warn!("Config file exists: {}", self.config_path.display());
            return Ok(InitOutcome::AlreadyExists(self.config_path.clone()));
        }
        save_config(&self.config_path, &Config::default())?;
        log::debug!("Config file written: {}", self.config_path.display());
        Ok(InitOutcome::Created(self.config_path.clone()))
    }
}
