use crate::domain::Version;
use crate::git::Tag;

/// Repository tag paired with the version parsed from its name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionTag {
    pub tag: Tag,
    pub version: Version,
}

impl VersionTag {
    /// Extract a version from the tag name (e.g. `"v1.2.3"` -> `1.2.3`).
    ///
    /// Returns `None` if the name carries no semantic version.
    pub fn from_tag(tag: Tag) -> Option<Self> {
        let version = Version::extract_from_str(&tag.name)?;
        Some(VersionTag { tag, version })
    }
}

/// Render a name template by substituting `{version_str}` and `{prev_version_str}`.
///
/// A missing previous version renders as `(null)`.
pub fn format_template(template: &str, version: &Version, prev_version: Option<&Version>) -> String {
    let prev = prev_version
        .map(|v| v.to_string())
        .unwrap_or_else(|| "(null)".to_string());
    template
        .replace("{version_str}", &version.to_string())
        .replace("{prev_version_str}", &prev)
}
