//! Message formatting for console output.
//!
//! The `*_message` functions build plain text and are testable; the
//! `display_*` functions add styling and print.

use console::style;

use crate::boundary::BoundaryWarning;
use crate::cli::ReleaseAction;
use crate::domain::Version;

/// Message shown after a successful bump
pub fn bumped_message(prev_version: Option<&Version>, version: &Version) -> String {
    let prev = prev_version
        .map(|v| v.to_string())
        .unwrap_or_else(|| "(null)".to_string());
    format!("Version was bumped: {} -> {}", prev, version)
}

/// Message describing a release step skipped by a dry run
pub fn would_message(action: &ReleaseAction) -> String {
    format!("Would {}", action)
}

/// Message shown after writing a new configuration file
pub fn config_created_message(path: &str) -> String {
    format!("Created config file: {}", path)
}

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Display a boundary warning to the user.
///
/// Failures are printed to stderr in red, everything else to stdout in yellow.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    if warning.is_failure() {
        eprintln!("{} {}", style("✗").red(), warning);
    } else {
        println!("{} {}", style("⚠").yellow(), warning);
    }
}
