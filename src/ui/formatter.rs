//! Pure formatting functions for UI output.
//!
//! This module contains all display/formatting logic for the synchronizer and
//! the orchestrator. Functions here have no side effects beyond printing.

use console::style;

use crate::boundary::BoundaryWarning;
use crate::domain::{CompatVersion, VersionWindow};
use crate::sync::diff::FirstDifference;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
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
/// Shows a yellow warning icon followed by the warning message.
///
/// # Arguments
/// * `warning` - The boundary warning to display
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Display the old and new window before anything is touched.
///
/// # Arguments
/// * `known` - Versions currently listed in the documentation index
/// * `window` - The freshly computed window
pub fn display_window(known: &[CompatVersion], window: &VersionWindow) {
    println!("\n{}", style("Compatibility window").bold());
    println!("  Known: {}", join(known));
    println!("  New:   {}", style(join(window.versions())).green());

    let dropped = window.dropped(known);
    if !dropped.is_empty() {
        println!("  Drop:  {}", style(join(&dropped)).red());
    }
}

/// Display an unexpected change found in assert-unchanged mode.
///
/// Prints both full contents followed by the position of the first
/// difference and the tails of both sides from there.
pub fn display_drift(old: &str, new: &str, difference: &FirstDifference) {
    eprintln!(
        "Unexpected change:\nOld contents:\n{}\n\nNew contents:\n{}\n",
        old, new
    );
    eprintln!("{}", difference);
}

/// Display the search commands that locate leftover manual updates.
///
/// Prints nothing when there are no commands.
pub fn display_grep_hint(commands: &[String]) {
    if commands.is_empty() {
        return;
    }
    println!("\nTo discover what files require manual updating, run:");
    for command in commands {
        println!("  {}", style(command).cyan());
    }
}

fn join(versions: &[CompatVersion]) -> String {
    if versions.is_empty() {
        return "(none)".to_string();
    }
    versions
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
