use crate::config::BumpRule;
use crate::domain::{ChangelogEntryData, Version, VersionComponent};
use crate::error::Result;

/// Decides which version component to bump for a set of unreleased changes
pub struct VersionAnalyzer {
    rule: BumpRule,
}

impl VersionAnalyzer {
    /// Create a new version analyzer applying the given bump rule
    pub fn new(rule: BumpRule) -> Self {
        VersionAnalyzer { rule }
    }

    /// Pick the component to bump.
    ///
    /// Breaking changes take priority over features, features over fixes.
    /// Returns `None` when the changes do not warrant a release.
    pub fn analyze(&self, data: &ChangelogEntryData) -> Option<VersionComponent> {
        if !data.breaking_changes().is_empty() {
            Some(self.rule.when_breaking_change)
        } else if !data.feats.is_empty() {
            Some(self.rule.when_feature)
        } else if !data.fixes.is_empty() {
            Some(self.rule.when_fix)
        } else {
            None
        }
    }

    /// Compute the version following `current` for the given changes.
    ///
    /// `Ok(None)` means there is nothing to release.
    pub fn next_version(
        &self,
        current: &Version,
        data: &ChangelogEntryData,
    ) -> Result<Option<Version>> {
        let Some(component) = self.analyze(data) else {
            return Ok(None);
        };
        current
            .bump(component, self.rule.prerelease.as_deref(), None)
            .map(Some)
    }
}
