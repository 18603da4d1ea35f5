pub mod analyzer;
pub mod boundary;
pub mod cli;
pub mod config;
pub mod conventional;
pub mod domain;
pub mod error;
pub mod fs;
pub mod git;
pub mod render;
pub mod semver_api;
pub mod ui;
pub mod version_file;

pub use error::{BumpifyError, Result};
