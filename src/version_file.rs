//! In-place version string substitution for arbitrary text files.

use regex::NoExpand;
use std::io;
use thiserror::Error;

use crate::config::VersionFile;
use crate::domain::version::SEMVER_RE;
use crate::domain::Version;

/// Version file could not be updated; the file is left untouched
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Version file not updated: {path}: {reason}")]
pub struct VersionFileNotUpdated {
    pub path: String,
    pub reason: String,
}

impl VersionFileNotUpdated {
    pub fn new(path: impl Into<String>, reason: impl Into<String>) -> Self {
        VersionFileNotUpdated {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Text encodings supported for version and changelog files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Utf8,
    Ascii,
    Latin1,
}

impl Encoding {
    /// Look up an encoding by its configuration name (case insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" => Some(Encoding::Utf8),
            "ascii" | "us-ascii" => Some(Encoding::Ascii),
            "latin-1" | "latin1" | "iso-8859-1" => Some(Encoding::Latin1),
            _ => None,
        }
    }

    pub fn decode(&self, bytes: &[u8]) -> io::Result<String> {
        match self {
            Encoding::Utf8 => String::from_utf8(bytes.to_vec())
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e)),
            Encoding::Ascii => {
                if let Some(pos) = bytes.iter().position(|b| !b.is_ascii()) {
                    return Err(invalid_data(format!("non-ASCII byte at offset {}", pos)));
                }
                Ok(bytes.iter().map(|&b| b as char).collect())
            }
            Encoding::Latin1 => Ok(bytes.iter().map(|&b| b as char).collect()),
        }
    }

    pub fn encode(&self, text: &str) -> io::Result<Vec<u8>> {
        match self {
            Encoding::Utf8 => Ok(text.as_bytes().to_vec()),
            Encoding::Ascii => text
                .chars()
                .map(|c| {
                    if c.is_ascii() {
                        Ok(c as u8)
                    } else {
                        Err(invalid_data(format!("character {:?} is not ASCII", c)))
                    }
                })
                .collect(),
            Encoding::Latin1 => text
                .chars()
                .map(|c| {
                    u8::try_from(u32::from(c))
                        .map_err(|_| invalid_data(format!("character {:?} is not Latin-1", c)))
                })
                .collect(),
        }
    }
}

fn invalid_data(message: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, message)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UpdaterState {
    LookingForSection,
    LookingByPrefix,
    LookingEverywhere,
    Done,
}

/// Line-fed state machine replacing a single version string.
///
/// Lines must be fed with their terminators. The empty string is the flush
/// sentinel; feeding it before a substitution happened fails.
#[derive(Debug)]
pub struct VersionFileUpdater<'a> {
    version_file: &'a VersionFile,
    replacement: String,
    state: UpdaterState,
    output: String,
}

impl<'a> VersionFileUpdater<'a> {
    pub fn new(version_file: &'a VersionFile, version: &Version) -> Self {
        let state = if version_file.section.is_some() {
            UpdaterState::LookingForSection
        } else {
            Self::search_state(version_file)
        };
        VersionFileUpdater {
            version_file,
            replacement: version.to_string(),
            state,
            output: String::new(),
        }
    }

    fn search_state(version_file: &VersionFile) -> UpdaterState {
        if version_file.prefix.is_some() {
            UpdaterState::LookingByPrefix
        } else {
            UpdaterState::LookingEverywhere
        }
    }

    /// Feed the next line.
    pub fn feed(&mut self, line: &str) -> Result<(), VersionFileNotUpdated> {
        if line.is_empty() && self.state != UpdaterState::Done {
            return Err(self.failure());
        }
        self.state = match self.state {
            UpdaterState::LookingForSection => {
                self.output.push_str(line);
                if Some(line.trim()) == self.version_file.section.as_deref() {
                    Self::search_state(self.version_file)
                } else {
                    UpdaterState::LookingForSection
                }
            }
            UpdaterState::LookingByPrefix => {
                let prefix = self.version_file.prefix.as_deref().unwrap_or_default();
                if line.trim_start().starts_with(prefix) {
                    self.substitute(line);
                    UpdaterState::Done
                } else {
                    self.output.push_str(line);
                    UpdaterState::LookingByPrefix
                }
            }
            UpdaterState::LookingEverywhere => {
                if SEMVER_RE.is_match(line) {
                    self.substitute(line);
                    UpdaterState::Done
                } else {
                    self.output.push_str(line);
                    UpdaterState::LookingEverywhere
                }
            }
            UpdaterState::Done => {
                self.output.push_str(line);
                UpdaterState::Done
            }
        };
        Ok(())
    }

    /// Updated content; only meaningful after a successful flush.
    pub fn finish(self) -> String {
        self.output
    }

    fn substitute(&mut self, line: &str) {
        let updated = SEMVER_RE.replacen(line, 1, NoExpand(&self.replacement));
        self.output.push_str(&updated);
    }

    fn failure(&self) -> VersionFileNotUpdated {
        let reason = match self.state {
            UpdaterState::LookingForSection => format!(
                "section not found: {}",
                self.version_file.section.as_deref().unwrap_or_default()
            ),
            UpdaterState::LookingByPrefix => format!(
                "line prefix not found: {}",
                self.version_file.prefix.as_deref().unwrap_or_default()
            ),
            _ => "no semantic version string found".to_string(),
        };
        VersionFileNotUpdated::new(self.version_file.path.clone(), reason)
    }
}

/// Replace the version string in `content` according to `version_file`.
///
/// Everything except the replaced span is kept byte for byte.
pub fn update_version_file(
    version_file: &VersionFile,
    version: &Version,
    content: &str,
) -> Result<String, VersionFileNotUpdated> {
    let mut updater = VersionFileUpdater::new(version_file, version);
    for line in content.split_inclusive('\n') {
        updater.feed(line)?;
    }
    updater.feed("")?;
    Ok(updater.finish())
}
