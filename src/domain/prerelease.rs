//! Pre-release identifiers for semantic versioning
//!
//! A pre-release is a dot-separated sequence of identifiers, each either
//! purely numeric or alphanumeric. See https://semver.org/#spec-item-9

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Single pre-release identifier (e.g. `rc` or `1` in `rc.1`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Identifier {
    /// Purely numeric identifier, compared by magnitude
    Numeric(u64),
    /// Any other identifier, compared lexically
    Alphanumeric(String),
}

impl Identifier {
    /// Parse a single identifier.
    ///
    /// Purely numeric tokens become [`Identifier::Numeric`]; anything else,
    /// including numbers too large for `u64`, is kept as text.
    pub fn parse(token: &str) -> Self {
        if !token.is_empty() && token.chars().all(|c| c.is_ascii_digit()) {
            if let Ok(number) = token.parse::<u64>() {
                return Identifier::Numeric(number);
            }
        }
        Identifier::Alphanumeric(token.to_string())
    }
}

impl Ord for Identifier {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Identifier::Numeric(left), Identifier::Numeric(right)) => left.cmp(right),
            (Identifier::Alphanumeric(left), Identifier::Alphanumeric(right)) => left.cmp(right),
            (Identifier::Numeric(_), Identifier::Alphanumeric(_)) => Ordering::Less,
            (Identifier::Alphanumeric(_), Identifier::Numeric(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for Identifier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Numeric(n) => write!(f, "{}", n),
            Identifier::Alphanumeric(s) => write!(f, "{}", s),
        }
    }
}

/// Parse a dot-separated pre-release label (e.g. `"beta.rc.1"`) into identifiers.
///
/// An empty label yields an empty sequence.
pub fn parse_identifiers(label: &str) -> Vec<Identifier> {
    if label.is_empty() {
        return Vec::new();
    }
    label.split('.').map(Identifier::parse).collect()
}

/// Render identifiers back into their dot-separated form
pub fn join_identifiers(identifiers: &[Identifier]) -> String {
    identifiers
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(".")
}

/// Compare two non-empty pre-release sequences by semver precedence.
///
/// Identifiers are compared pairwise; when one sequence is a prefix of the
/// other, the shorter one has lower precedence.
pub fn compare_prerelease(left: &[Identifier], right: &[Identifier]) -> Ordering {
    for (l, r) in left.iter().zip(right.iter()) {
        match l.cmp(r) {
            Ordering::Equal => continue,
            non_eq => return non_eq,
        }
    }
    left.len().cmp(&right.len())
}
