//! Command-line interface for the awsomarchy installer.

use crate::core::user_friendly_error;
use crate::install::{self, InstallRequest};
use crate::reporter::Reporter;
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Install or update the awsomarchy binary.
///
/// Downloads the release archive for this platform, verifies its SHA-256
/// checksum against the published companion file, and places the binary
/// into the first writable installation directory. Re-running over an
/// existing installation updates it in place.
#[derive(Parser, Debug)]
#[command(name = "awsomarchy-install", version, long_about = None)]
pub struct Cli {
    /// Version to install (e.g. "v2.1.0" or "2.1.0"). Latest release when
    /// omitted.
    #[arg(id = "target-version", value_name = "VERSION")]
    pub version: Option<String>,

    /// Install into this directory instead of probing the defaults.
    #[arg(long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress all logging except errors.
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Cli {
    /// Whether any flag or argument was supplied. Supplying one opts into
    /// unattended output, which is plain and pipe-friendly but changes
    /// nothing about install policy.
    #[must_use]
    pub const fn is_unattended(&self) -> bool {
        self.version.is_some() || self.dir.is_some() || self.verbose || self.quiet
    }

    /// Set up tracing output. Flags take precedence over `RUST_LOG`.
    pub fn init_logging(&self) {
        let default_level =
            if self.quiet { "error" } else if self.verbose { "debug" } else { "info" };

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_level));

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    /// Run the install pipeline with this invocation's settings.
    ///
    /// # Errors
    ///
    /// Propagates the first pipeline failure; `main` renders it through
    /// [`user_friendly_error`].
    pub async fn execute(self) -> Result<()> {
        let reporter = Reporter::new(self.is_unattended());
        let request = InstallRequest {
            requested_version: self.version,
            explicit_dir: self.dir,
        };

        install::run(&request, &reporter).await?;
        Ok(())
    }
}

/// Parse arguments, run, and render any failure for the terminal.
/// Returns the process exit code.
pub async fn run() -> i32 {
    let cli = Cli::parse();
    cli.init_logging();

    match cli.execute().await {
        Ok(()) => 0,
        Err(e) => {
            user_friendly_error(e).display();
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_arguments_is_interactive() {
        let cli = Cli::parse_from(["awsomarchy-install"]);
        assert!(!cli.is_unattended());
        assert!(cli.version.is_none());
        assert!(cli.dir.is_none());
    }

    #[test]
    fn any_flag_selects_unattended_output() {
        let cli = Cli::parse_from(["awsomarchy-install", "v2.1.0"]);
        assert!(cli.is_unattended());
        assert_eq!(cli.version.as_deref(), Some("v2.1.0"));

        let cli = Cli::parse_from(["awsomarchy-install", "--dir", "/opt/bin"]);
        assert!(cli.is_unattended());
        assert_eq!(cli.dir.as_deref(), Some(std::path::Path::new("/opt/bin")));

        let cli = Cli::parse_from(["awsomarchy-install", "--verbose"]);
        assert!(cli.is_unattended());
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from(["awsomarchy-install", "--quiet", "--verbose"]);
        assert!(result.is_err());
    }
}
