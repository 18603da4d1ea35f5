//! User interface module - reporting command outcomes on the console.
//!
//! - `formatter` - message building and styled printing
//! - This module - mapping command outcomes to messages

pub mod formatter;

pub use formatter::{
    bumped_message, config_created_message, display_boundary_warning, display_error,
    display_status, display_success, would_message,
};

use crate::boundary::BoundaryWarning;
use crate::cli::{BumpOutcome, InitOutcome, ReleaseAction};

/// Report the result of a bump run.
///
/// `planned` lists the steps a dry run skipped; it is empty otherwise.
///
/// # Returns
/// * `true` - If the run should be treated as successful
/// * `false` - If the process should exit with a failure status
pub fn report_bump(outcome: &BumpOutcome, planned: &[ReleaseAction]) -> bool {
    if let BumpOutcome::Bumped {
        prev_version,
        version,
    } = outcome
    {
        for action in planned {
            display_status(&would_message(action));
        }
        display_success(&bumped_message(prev_version.as_ref(), version));
        return true;
    }
    match outcome.warning() {
        Some(warning) => {
            display_boundary_warning(&warning);
            !warning.is_failure()
        }
        None => true,
    }
}

/// Report the result of an init run
pub fn report_init(outcome: &InitOutcome) {
    match outcome {
        InitOutcome::Created(path) => {
            display_success(&config_created_message(&path.display().to_string()))
        }
        InitOutcome::AlreadyExists(path) => {
            display_boundary_warning(&BoundaryWarning::ConfigAlreadyExists { path: path.clone() })
        }
    }
}
