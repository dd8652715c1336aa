//! Terminal progress reporting.
//!
//! Interactive runs get colored step lines and a download progress bar;
//! unattended runs (any flag supplied) get plain line-oriented output that
//! is safe to pipe into logs. The mode only ever changes presentation.
//! Every policy decision, checksum handling included, is identical in both
//! modes.

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

/// Presentation layer for the install pipeline.
pub struct Reporter {
    unattended: bool,
}

impl Reporter {
    /// Create a reporter. `unattended` selects plain output.
    #[must_use]
    pub const fn new(unattended: bool) -> Self {
        Self { unattended }
    }

    /// Whether plain output mode is active.
    #[must_use]
    pub const fn is_unattended(&self) -> bool {
        self.unattended
    }

    /// Announce a pipeline step.
    pub fn step(&self, message: &str) {
        if self.unattended {
            println!("{message}");
        } else {
            println!("{} {message}", "==>".blue().bold());
        }
    }

    /// Report a step outcome worth highlighting.
    pub fn success(&self, message: &str) {
        if self.unattended {
            println!("{message}");
        } else {
            println!("{} {message}", "ok:".green().bold());
        }
    }

    /// Report a non-fatal problem.
    pub fn warn(&self, message: &str) {
        if self.unattended {
            eprintln!("warning: {message}");
        } else {
            eprintln!("{} {message}", "warning:".yellow().bold());
        }
    }

    /// Report a secondary detail under the current step.
    pub fn detail(&self, message: &str) {
        if self.unattended {
            println!("  {message}");
        } else {
            println!("    {}", message.dimmed());
        }
    }

    /// Progress bar for the archive download. Interactive mode only; in
    /// unattended mode the download runs silently between step lines.
    #[must_use]
    pub fn download_bar(&self) -> Option<ProgressBar> {
        if self.unattended {
            return None;
        }

        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::with_template(
                "    {bar:30.cyan/blue} {bytes}/{total_bytes} ({bytes_per_sec})",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        Some(bar)
    }
}

/// Human-readable byte count for size lines.
#[must_use]
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_format_at_unit_boundaries() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(1024), "1.0 KB");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.0 MB");
        assert_eq!(format_bytes(3 * 1024 * 1024 * 1024), "3.0 GB");
    }

    #[test]
    fn unattended_mode_has_no_progress_bar() {
        assert!(Reporter::new(true).download_bar().is_none());
        assert!(Reporter::new(false).download_bar().is_some());
    }
}
