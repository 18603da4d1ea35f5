use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::domain::VersionComponent;
use crate::error::{BumpifyError, Result};

/// Default name of the configuration file, relative to the project root
pub const DEFAULT_CONFIG_FILE: &str = ".bumpify.toml";

/// Represents the complete configuration for bumpify.
///
/// Contains the version control settings and everything needed to compute
/// and write new versions: templates, version files, changelog files and
/// bump rules.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub vcs: VcsConfig,

    #[serde(default)]
    pub semver: SemVerConfig,
}

/// Supported version control systems
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum VcsType {
    #[default]
    Git,
}

/// Version control settings
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct VcsConfig {
    #[serde(rename = "type", default)]
    pub vcs_type: VcsType,
}

fn default_version() -> String {
    "0.0.1".to_string()
}

fn default_bump_commit_message_template() -> String {
    "bump: {prev_version_str} -> {version_str}".to_string()
}

fn default_version_tag_name_template() -> String {
    "v{version_str}".to_string()
}

fn default_encoding() -> String {
    "utf-8".to_string()
}

fn default_changelog_files() -> Vec<ChangelogFile> {
    vec![ChangelogFile {
        path: "CHANGELOG.md".to_string(),
        encoding: default_encoding(),
    }]
}

fn default_bump_rules() -> Vec<BumpRule> {
    vec![BumpRule {
        branch: "^(main|master)$".to_string(),
        ..BumpRule::default()
    }]
}

/// Semantic versioning settings
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SemVerConfig {
    /// Version used for the initial release
    #[serde(default = "default_version")]
    pub version: String,

    /// Template for the bump commit message
    #[serde(default = "default_bump_commit_message_template")]
    pub bump_commit_message_template: String,

    /// Template for the version tag name
    #[serde(default = "default_version_tag_name_template")]
    pub version_tag_name_template: String,

    #[serde(default)]
    pub version_files: Vec<VersionFile>,

    #[serde(default = "default_changelog_files")]
    pub changelog_files: Vec<ChangelogFile>,

    #[serde(default = "default_bump_rules")]
    pub bump_rules: Vec<BumpRule>,
}

impl Default for SemVerConfig {
    fn default() -> Self {
        SemVerConfig {
            version: default_version(),
            bump_commit_message_template: default_bump_commit_message_template(),
            version_tag_name_template: default_version_tag_name_template(),
            version_files: Vec::new(),
            changelog_files: default_changelog_files(),
            bump_rules: default_bump_rules(),
        }
    }
}

/// File containing a version string to update on every bump.
///
/// With `section` set, the search starts after the line equal to it. With
/// `prefix` set, only the first line starting with it is updated.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct VersionFile {
    pub path: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,

    #[serde(default = "default_encoding")]
    pub encoding: String,
}

impl VersionFile {
    pub fn new(path: impl Into<String>) -> Self {
        VersionFile {
            path: path.into(),
            prefix: None,
            section: None,
            encoding: default_encoding(),
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.section = Some(section.into());
        self
    }
}

/// Changelog file; the format follows the file extension
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ChangelogFile {
    pub path: String,

    #[serde(default = "default_encoding")]
    pub encoding: String,
}

impl ChangelogFile {
    pub fn new(path: impl Into<String>) -> Self {
        ChangelogFile {
            path: path.into(),
            encoding: default_encoding(),
        }
    }
}

/// Maps change kinds to version components for branches matching `branch`
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BumpRule {
    /// Regular expression matched against the start of the branch name
    pub branch: String,

    #[serde(default = "BumpRule::default_when_breaking_change")]
    pub when_breaking_change: VersionComponent,

    #[serde(default = "BumpRule::default_when_feature")]
    pub when_feature: VersionComponent,

    #[serde(default = "BumpRule::default_when_fix")]
    pub when_fix: VersionComponent,

    /// Pre-release label attached to versions bumped on this branch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prerelease: Option<String>,
}

impl BumpRule {
    fn default_when_breaking_change() -> VersionComponent {
        VersionComponent::Major
    }

    fn default_when_feature() -> VersionComponent {
        VersionComponent::Minor
    }

    fn default_when_fix() -> VersionComponent {
        VersionComponent::Patch
    }

    fn pattern(&self) -> Result<Regex> {
        Regex::new(&self.branch).map_err(|e| {
            BumpifyError::config(format!("Invalid bump rule branch '{}': {}", self.branch, e))
        })
    }

    /// Check if this rule applies to the given branch
    pub fn matches(&self, branch: &str) -> Result<bool> {
        Ok(self.pattern()?.find(branch).is_some_and(|m| m.start() == 0))
    }
}

impl Default for BumpRule {
    fn default() -> Self {
        BumpRule {
            branch: ".*".to_string(),
            when_breaking_change: Self::default_when_breaking_change(),
            when_feature: Self::default_when_feature(),
            when_fix: Self::default_when_fix(),
            prerelease: None,
        }
    }
}

impl Config {
    /// Find the first bump rule matching the given branch
    pub fn find_bump_rule(&self, branch: &str) -> Result<Option<&BumpRule>> {
        for rule in &self.semver.bump_rules {
            if rule.matches(branch)? {
                return Ok(Some(rule));
            }
        }
        Ok(None)
    }

    /// Check values that deserialization alone cannot validate
    pub fn validate(&self) -> Result<()> {
        if crate::domain::Version::parse(&self.semver.version).is_none() {
            return Err(BumpifyError::config(format!(
                "Invalid initial version: '{}'",
                self.semver.version
            )));
        }
        for rule in &self.semver.bump_rules {
            rule.pattern()?;
        }
        Ok(())
    }
}

/// Loads configuration from the given file.
///
/// # Arguments
/// * `path` - Path to the TOML configuration file
///
/// # Returns
/// * `Ok(Config)` - Loaded and validated configuration
/// * `Err(ConfigFileNotFound)` - If the file does not exist
/// * `Err` - If the file cannot be read, parsed or validated
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Err(BumpifyError::ConfigFileNotFound(path.to_path_buf()));
    }
    let config_str = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&config_str)?;
    config.validate()?;
    Ok(config)
}

/// Writes configuration to the given file, replacing any existing content
pub fn save_config(path: &Path, config: &Config) -> Result<()> {
    let config_str = toml::to_string_pretty(config)?;
    fs::write(path, config_str)?;
    Ok(())
}
