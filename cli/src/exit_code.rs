//! Exit codes of the command-line tools.
//!
//! Argument errors exit with `2`, as reported by clap.

use epubfix::fix::FixReport;
use std::process::ExitCode;

/// Completed successfully.
pub const SUCCESS: u8 = 0;
/// The archive could not be read, decoded or written.
pub const FATAL_ERROR: u8 = 1;
/// Completed in quiet mode, and at least one fix was needed.
pub const FIXES_APPLIED: u8 = 3;

/// The exit code after a fix run; only quiet mode reflects whether fixes were needed.
pub fn after_fix(report: &FixReport, quiet: bool) -> ExitCode {
    if quiet && !report.is_clean() {
        ExitCode::from(FIXES_APPLIED)
    } else {
        ExitCode::from(SUCCESS)
    }
}

pub fn after_error(error: &dyn std::error::Error) -> ExitCode {
    eprintln!("error: {error}");
    ExitCode::from(FATAL_ERROR)
}
