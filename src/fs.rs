use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::{BumpifyError, Result};

/// File access needed to read and write version and changelog files
///
/// Paths are relative to the project root.
pub trait FileSystem: Send {
    fn read(&self, path: &str) -> Result<Vec<u8>>;

    fn write(&self, path: &str, data: &[u8]) -> Result<()>;

    /// Project root all paths are relative to
    fn root(&self) -> &Path;

    /// Paths written so far, in first-write order, without duplicates
    fn modified_paths(&self) -> Vec<PathBuf>;
}

/// File system rooted at a project directory
#[derive(Debug)]
pub struct DirFileSystem {
    root: PathBuf,
    modified: Mutex<Vec<PathBuf>>,
}

impl DirFileSystem {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DirFileSystem {
            root: root.into(),
            modified: Mutex::new(Vec::new()),
        }
    }

    fn resolve(&self, path: &str) -> Result<PathBuf> {
        let relative = Path::new(path);
        if relative.is_absolute() {
            return Err(BumpifyError::config(format!(
                "Path must be relative to the project root: {}",
                path
            )));
        }
        Ok(self.root.join(relative))
    }
}

impl FileSystem for DirFileSystem {
    fn read(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = self.resolve(path)?;
        log::debug!("Reading {}", full_path.display());
        Ok(fs::read(full_path)?)
    }

    fn write(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.resolve(path)?;
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }
        log::debug!("Writing {} byte(s) to {}", data.len(), full_path.display());
        fs::write(&full_path, data)?;

        let relative = PathBuf::from(path);
        let mut modified = self
            .modified
            .lock()
            .map_err(|_| BumpifyError::repository("Modified paths lock poisoned"))?;
        if !modified.contains(&relative) {
            modified.push(relative);
        }
        Ok(())
    }

    fn root(&self) -> &Path {
        &self.root
    }

    fn modified_paths(&self) -> Vec<PathBuf> {
        self.modified.lock().map(|m| m.clone()).unwrap_or_default()
    }
}
