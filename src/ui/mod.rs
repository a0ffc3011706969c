//! User interface module - console reporting for a synchronization run.
//!
//! The tool is non-interactive; everything it tells the user goes through
//! the display functions in `formatter`.

pub mod formatter;

pub use formatter::{
    display_boundary_warning, display_drift, display_error, display_grep_hint, display_status,
    display_success, display_window,
};
