//! Command line workflows

pub mod orchestration;

pub use orchestration::{BumpCommand, BumpOutcome, InitCommand, InitOutcome, ReleaseAction};
