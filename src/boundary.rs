use std::fmt;
use std::path::PathBuf;

use crate::domain::Version;

/// Situations in which a command finishes without doing anything.
/// These are non-fatal and should be reported to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// No bump rule matches the current branch
    NoBumpRule { branch: String },
    /// Nothing worth a release since the latest version
    NoChanges { version: Version },
    /// `init` found an existing configuration file
    ConfigAlreadyExists { path: PathBuf },
}

impl BoundaryWarning {
    /// Whether the process should exit with a failure status
    pub fn is_failure(&self) -> bool {
        matches!(self, BoundaryWarning::NoBumpRule { .. })
    }
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::NoBumpRule { branch } => {
                write!(f, "No bump rule found for branch: {}", branch)
            }
            BoundaryWarning::NoChanges { version } => write!(
                f,
                "No changes found between version {} and current HEAD",
                version
            ),
            BoundaryWarning::ConfigAlreadyExists { path } => write!(
                f,
                "Config file already exists, skipping: {}",
                path.display()
            ),
        }
    }
}
