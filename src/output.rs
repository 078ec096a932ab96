//! Status line rendering
//!
//! Results go to stdout untouched; the status line and error details are
//! rendered here for stderr.

use std::time::Duration;

use crate::cli::VerbosityLevel;
use crate::session::{Status, ViewMode};
use crate::validator::ErrorDescriptor;

/// Human-readable status output
pub struct Output {
    verbosity: VerbosityLevel,
    show_colors: bool,
}

impl Output {
    pub fn with_colors(verbosity: VerbosityLevel, show_colors: bool) -> Self {
        Self {
            verbosity,
            show_colors,
        }
    }

    fn colorize(&self, text: &str, color: &str) -> String {
        if self.show_colors {
            format!("\x1b[{}m{}\x1b[0m", color, text)
        } else {
            text.to_string()
        }
    }

    /// One status line, or `None` when the verbosity level hides it.
    ///
    /// Quiet mode only shows errors.
    pub fn format_status(&self, status: Status, message: &str) -> Option<String> {
        if message.is_empty() {
            return None;
        }
        if self.verbosity == VerbosityLevel::Quiet && status != Status::Error {
            return None;
        }

        let badge = match status {
            Status::Success => self.colorize("✓", "32"),
            Status::Error => self.colorize("✗", "31"),
            Status::Loading => self.colorize("…", "36"),
            Status::Idle => self.colorize("-", "2"),
        };
        Some(format!("{} {}", badge, message))
    }

    /// Detail block for a rejected document; line information only in verbose mode.
    pub fn format_validation_error(&self, error: &ErrorDescriptor) -> String {
        if self.verbosity >= VerbosityLevel::Verbose && error.has_line() {
            format!(
                "  {} {}\n  {}",
                self.colorize("line", "33"),
                error.line,
                error.message
            )
        } else {
            format!("  {}", error.message)
        }
    }

    /// Note printed after saving a download
    pub fn format_saved(&self, path: &std::path::Path, view_mode: ViewMode) -> Option<String> {
        if self.verbosity == VerbosityLevel::Quiet {
            return None;
        }
        Some(format!(
            "Saved {} as {}",
            view_mode.label(),
            self.colorize(&path.display().to_string(), "1")
        ))
    }

    pub fn format_timing(&self, duration: Duration) -> Option<String> {
        if self.verbosity < VerbosityLevel::Verbose {
            return None;
        }
        Some(format!("Completed in {}", format_duration(duration)))
    }
}

fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs_f64();
    if total_secs < 1.0 {
        format!("{:.0}ms", duration.as_millis())
    } else if total_secs < 60.0 {
        format!("{:.2}s", total_secs)
    } else {
        let mins = (total_secs / 60.0) as u64;
        let secs = total_secs % 60.0;
        format!("{}m{:.1}s", mins, secs)
    }
}
