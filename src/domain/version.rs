use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::LazyLock;

use crate::domain::prerelease::{compare_prerelease, join_identifiers, parse_identifiers, Identifier};
use crate::error::BumpifyError;

const SEMVER_PATTERN: &str = concat!(
    r"(?P<major>0|[1-9][0-9]*)\.(?P<minor>0|[1-9][0-9]*)\.(?P<patch>0|[1-9][0-9]*)",
    r"(?:-(?P<prerelease>(?:0|[1-9][0-9]*|[0-9]*[a-zA-Z-][0-9a-zA-Z-]*)",
    r"(?:\.(?:0|[1-9][0-9]*|[0-9]*[a-zA-Z-][0-9a-zA-Z-]*))*))?",
    r"(?:\+(?P<buildmetadata>[0-9a-zA-Z-]+(?:\.[0-9a-zA-Z-]+)*))?",
);

/// Matches a semantic version anywhere inside a larger string.
pub(crate) static SEMVER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(SEMVER_PATTERN).unwrap());

static SEMVER_EXACT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("^{}$", SEMVER_PATTERN)).unwrap());

/// Version component selected for a bump
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionComponent {
    Major,
    Minor,
    Patch,
}

impl fmt::Display for VersionComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionComponent::Major => write!(f, "major"),
            VersionComponent::Minor => write!(f, "minor"),
            VersionComponent::Patch => write!(f, "patch"),
        }
    }
}

impl FromStr for VersionComponent {
    type Err = BumpifyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "major" => Ok(VersionComponent::Major),
            "minor" => Ok(VersionComponent::Minor),
            "patch" => Ok(VersionComponent::Patch),
            other => Err(BumpifyError::version(format!(
                "Invalid version component: '{}'",
                other
            ))),
        }
    }
}

/// Semantic version with optional pre-release and build metadata.
///
/// Values are immutable in practice: [`Version::bump`] always builds a new
/// instance. Equality, ordering and hashing ignore `buildmetadata`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    #[serde(default)]
    pub prerelease: Vec<Identifier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buildmetadata: Option<String>,
}

impl Version {
    /// Create a new final release version
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Version {
            major,
            minor,
            patch,
            prerelease: Vec::new(),
            buildmetadata: None,
        }
    }

    /// Replace the pre-release with the given dot-separated label
    pub fn with_prerelease(mut self, label: &str) -> Self {
        self.prerelease = parse_identifiers(label);
        self
    }

    /// Replace the build metadata
    pub fn with_buildmetadata(mut self, buildmetadata: impl Into<String>) -> Self {
        self.buildmetadata = Some(buildmetadata.into());
        self
    }

    /// Parse an exact semantic version string (e.g. `"1.2.3-rc.1+abc"`).
    ///
    /// Returns `None` unless the whole input matches the grammar.
    pub fn parse(text: &str) -> Option<Self> {
        SEMVER_EXACT_RE
            .captures(text)
            .and_then(|captures| Self::from_captures(&captures))
    }

    /// Extract the first semantic version found anywhere inside `text`.
    ///
    /// Used for tag names like `"v1.2.3"` or `"release-1.2.3-final"`.
    pub fn extract_from_str(text: &str) -> Option<Self> {
        SEMVER_RE
            .find(text)
            .and_then(|found| Self::parse(found.as_str()))
    }

    fn from_captures(captures: &Captures<'_>) -> Option<Self> {
        let major = captures.name("major")?.as_str().parse::<u64>().ok()?;
        let minor = captures.name("minor")?.as_str().parse::<u64>().ok()?;
        let patch = captures.name("patch")?.as_str().parse::<u64>().ok()?;
        let prerelease = captures
            .name("prerelease")
            .map(|m| parse_identifiers(m.as_str()))
            .unwrap_or_default();
        let buildmetadata = captures
            .name("buildmetadata")
            .map(|m| m.as_str().to_string());
        Some(Version {
            major,
            minor,
            patch,
            prerelease,
            buildmetadata,
        })
    }

    /// Check if this is a pre-release version
    pub fn is_prerelease(&self) -> bool {
        !self.prerelease.is_empty()
    }

    /// Compute the next version.
    ///
    /// Without a current pre-release the requested component is incremented
    /// and lower components are zeroed; a requested `prerelease` is attached
    /// to the result.
    ///
    /// With a current pre-release:
    /// - a MINOR bump with `patch != 0`, or a MAJOR bump with
    ///   `(minor, patch) != (0, 0)`, advances the release triplet and starts
    ///   the requested pre-release from scratch,
    /// - a requested label that prefixes the current pre-release increments
    ///   its last numeric identifier (or appends `1`),
    /// - a different requested label replaces the pre-release,
    /// - no requested label finalizes the current triplet.
    ///
    /// `buildmetadata` is attached to the result in every case.
    ///
    /// Fails if a numeric part would exceed `u64::MAX`.
    pub fn bump(
        &self,
        component: VersionComponent,
        prerelease: Option<&str>,
        buildmetadata: Option<&str>,
    ) -> Result<Version, BumpifyError> {
        let requested = prerelease.map(parse_identifiers).unwrap_or_default();
        let buildmetadata = buildmetadata.map(|b| b.to_string());

        if self.is_prerelease() {
            let advance_minor = component == VersionComponent::Minor && self.patch != 0;
            let advance_major =
                component == VersionComponent::Major && (self.minor != 0 || self.patch != 0);
            if advance_minor || advance_major {
                let (major, minor) = if advance_major {
                    (increment(self.major, "major")?, 0)
                } else {
                    (self.major, increment(self.minor, "minor")?)
                };
                return Ok(Version {
                    major,
                    minor,
                    patch: 0,
                    prerelease: requested,
                    buildmetadata,
                });
            }

            if requested.is_empty() {
                return Ok(Version {
                    prerelease: Vec::new(),
                    buildmetadata,
                    ..self.clone()
                });
            }

            let prerelease = if self.prerelease.starts_with(&requested) {
                let mut next = self.prerelease.clone();
                match next.last_mut() {
                    Some(Identifier::Numeric(n)) => *n = increment(*n, "pre-release")?,
                    _ => next.push(Identifier::Numeric(1)),
                }
                next
            } else {
                requested
            };
            return Ok(Version {
                prerelease,
                buildmetadata,
                ..self.clone()
            });
        }

        let (major, minor, patch) = match component {
            VersionComponent::Major => (increment(self.major, "major")?, 0, 0),
            VersionComponent::Minor => (self.major, increment(self.minor, "minor")?, 0),
            VersionComponent::Patch => (self.major, self.minor, increment(self.patch, "patch")?),
        };
        Ok(Version {
            major,
            minor,
            patch,
            prerelease: requested,
            buildmetadata,
        })
    }
}

fn increment(value: u64, part: &str) -> Result<u64, BumpifyError> {
    value
        .checked_add(1)
        .ok_or_else(|| BumpifyError::version(format!("Cannot bump {} number past {}", part, value)))
}

impl FromStr for Version {
    type Err = BumpifyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Version::parse(s).ok_or_else(|| {
            BumpifyError::version(format!("Invalid semantic version: '{}'", s))
        })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if !self.prerelease.is_empty() {
            write!(f, "-{}", join_identifiers(&self.prerelease))?;
        }
        if let Some(buildmetadata) = &self.buildmetadata {
            write!(f, "+{}", buildmetadata)?;
        }
        Ok(())
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.major.hash(state);
        self.minor.hash(state);
        self.patch.hash(state);
        self.prerelease.hash(state);
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.major
            .cmp(&other.major)
            .then(self.minor.cmp(&other.minor))
            .then(self.patch.cmp(&other.patch))
            .then_with(|| match (self.is_prerelease(), other.is_prerelease()) {
                (false, false) => Ordering::Equal,
                (true, false) => Ordering::Less,
                (false, true) => Ordering::Greater,
                (true, true) => compare_prerelease(&self.prerelease, &other.prerelease),
            })
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
