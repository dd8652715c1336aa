//! Error handling for the awsomarchy installer.
//!
//! The error system is built around two types:
//! - [`InstallerError`] - strongly-typed failure cases, each belonging to one
//!   of five categories ([`ErrorCategory`])
//! - [`ErrorContext`] - a display wrapper that adds a remediation suggestion
//!   and extra details for CLI users
//!
//! Every fatal error aborts the run at the point of detection; there is no
//! retry layer. The category determines the remediation hint shown by
//! [`user_friendly_error`]:
//!
//! | Category | Meaning |
//! |----------|---------|
//! | `Network` | endpoint unreachable, malformed or missing response body |
//! | `Permission` | cannot create/write the install directory or final binary |
//! | `Security` | computed digest differs from the expected digest |
//! | `Availability` | artifact not yet published for the requested version |
//! | `General` | unsupported platform, malformed archive, everything else |
//!
//! A `Security` error is never downgraded and never skippable: checksum
//! mismatches abort the installation in both interactive and unattended
//! modes.

use colored::Colorize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// The five failure categories of the install protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Endpoint unreachable, malformed or missing expected response body.
    Network,
    /// Cannot create/write the chosen directory, or cannot write the binary.
    Permission,
    /// Computed digest does not match the expected digest.
    Security,
    /// Artifact not yet published for the requested version.
    Availability,
    /// Anything else: unsupported platform, malformed archive, internal bugs.
    General,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Network => "network",
            Self::Permission => "permission",
            Self::Security => "security",
            Self::Availability => "availability",
            Self::General => "general",
        };
        write!(f, "{name}")
    }
}

fn candidate_list(tried: &[PathBuf]) -> String {
    tried.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join(", ")
}

fn short_digest(digest: &str) -> &str {
    digest.get(..16).unwrap_or(digest)
}

/// The main error type for installer operations.
///
/// Each variant carries enough context to render a message a user can act
/// on without reading the source. Use [`InstallerError::category`] to map a
/// variant to its [`ErrorCategory`].
#[derive(Error, Debug)]
pub enum InstallerError {
    /// A network operation failed: unreachable endpoint, transport error,
    /// or an unexpected HTTP status.
    #[error("network error during {operation}: {reason}")]
    Network {
        /// What the installer was doing (e.g. "fetching latest release tag").
        operation: String,
        /// Transport-level or HTTP-level failure description.
        reason: String,
    },

    /// The checksum companion resource exists but its body is not a
    /// 64-character hex digest. Categorized as `Network` because it points
    /// at a malformed or truncated remote resource, not a security event.
    #[error("malformed checksum resource at {url}: {reason}")]
    ChecksumParse {
        /// URL of the checksum companion resource.
        url: String,
        /// Why the body failed to parse.
        reason: String,
    },

    /// No candidate installation directory was writable.
    #[error("no writable installation directory; tried: {}", candidate_list(.tried))]
    NoWritableDirectory {
        /// Every candidate that was probed, in priority order.
        tried: Vec<PathBuf>,
    },

    /// A filesystem write was denied after a directory had already been
    /// selected (e.g. permissions changed mid-run).
    #[error("permission denied while {operation}: {path}")]
    PermissionDenied {
        /// The operation that was denied.
        operation: String,
        /// Path where permission was denied.
        path: String,
    },

    /// Computed archive digest differs from the published digest. The
    /// message shows truncated digests; the fields carry the full values.
    #[error(
        "checksum mismatch for {artifact}\n  expected: {}...\n  computed: {}...",
        short_digest(.expected),
        short_digest(.computed)
    )]
    ChecksumMismatch {
        /// Archive filename that failed verification.
        artifact: String,
        /// The digest published in the checksum companion.
        expected: String,
        /// The digest computed from the downloaded archive.
        computed: String,
    },

    /// The release artifact is not (yet) published at its expected URL.
    #[error("release artifact not available at {url}")]
    ArtifactNotAvailable {
        /// The probed download URL.
        url: String,
    },

    /// The artifact exists but is implausibly small, which usually means
    /// the CI pipeline is still uploading it.
    #[error("release artifact at {url} looks incomplete ({size} bytes)")]
    ArtifactIncomplete {
        /// The probed download URL.
        url: String,
        /// Advertised content length.
        size: u64,
    },

    /// The running OS/architecture combination has no published artifact.
    #[error("unsupported platform: {os}-{arch}")]
    UnsupportedPlatform {
        /// Operating system as reported by the host.
        os: String,
        /// CPU architecture as reported by the host.
        arch: String,
    },

    /// The archive extracted cleanly but did not contain the expected
    /// binary, meaning it is malformed or mis-packaged.
    #[error("binary '{binary}' not found in extracted archive")]
    BinaryMissing {
        /// The executable name that was searched for.
        binary: String,
    },

    /// A requested version normalized to the empty string.
    #[error("invalid version string: '{raw}'")]
    InvalidVersion {
        /// The version as supplied.
        raw: String,
    },

    /// IO error from the standard library.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Anything that fits no other variant.
    #[error("{message}")]
    Other {
        /// Generic error message.
        message: String,
    },
}

impl InstallerError {
    /// Map this error to its failure category.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::Network { .. } | Self::ChecksumParse { .. } => ErrorCategory::Network,
            Self::NoWritableDirectory { .. } | Self::PermissionDenied { .. } => {
                ErrorCategory::Permission
            }
            Self::ChecksumMismatch { .. } => ErrorCategory::Security,
            Self::ArtifactNotAvailable { .. } | Self::ArtifactIncomplete { .. } => {
                ErrorCategory::Availability
            }
            Self::UnsupportedPlatform { .. }
            | Self::BinaryMissing { .. }
            | Self::InvalidVersion { .. }
            | Self::Io(_)
            | Self::Other { .. } => ErrorCategory::General,
        }
    }
}

/// Error wrapper that pairs an [`InstallerError`] with a remediation
/// suggestion and optional details for terminal display.
///
/// When displayed, errors show:
/// 1. the main error message in red
/// 2. additional details in yellow (optional)
/// 3. an actionable suggestion in green (optional)
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying installer error.
    pub error: InstallerError,
    /// Actionable suggestion for resolving the error.
    pub suggestion: Option<String>,
    /// Additional details about why the error occurred.
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a context with no suggestion or details.
    #[must_use]
    pub const fn new(error: InstallerError) -> Self {
        Self { error, suggestion: None, details: None }
    }

    /// Attach a resolution suggestion.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Attach extra details.
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error, details, and suggestion to stderr with colors.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error into a user-friendly [`ErrorContext`] with a
/// remediation hint appropriate to its category.
///
/// Recognizes [`InstallerError`] values (possibly wrapped in an
/// [`anyhow::Error`] chain) and attaches the per-category hint; everything
/// else is reported verbatim with its cause chain appended.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    let error = match error.downcast::<InstallerError>() {
        Ok(installer_error) => return create_error_context(installer_error),
        Err(other) => other,
    };

    if let Some(io_error) = error.downcast_ref::<std::io::Error>()
        && io_error.kind() == std::io::ErrorKind::PermissionDenied
    {
        return ErrorContext::new(InstallerError::PermissionDenied {
            operation: "file access".to_string(),
            path: "unknown".to_string(),
        })
        .with_suggestion(
            "Re-run with elevated privileges (sudo) or pass --dir to choose a writable location",
        );
    }

    // Generic error: include the full cause chain for diagnostics.
    let mut message = error.to_string();
    let chain: Vec<String> =
        error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(InstallerError::Other { message })
}

fn create_error_context(error: InstallerError) -> ErrorContext {
    let category = error.category();
    let context = ErrorContext::new(error);

    match category {
        ErrorCategory::Network => context
            .with_suggestion("Check your internet connection and try again")
            .with_details("The release host could not be reached or returned an unusable response"),
        ErrorCategory::Permission => context.with_suggestion(
            "Re-run with elevated privileges (sudo) or pass --dir to choose a writable location",
        ),
        ErrorCategory::Security => context
            .with_suggestion(
                "Do not use the downloaded file. Retry the installation; if the mismatch \
                 persists, report it to the awsomarchy maintainers",
            )
            .with_details(
                "The downloaded archive does not match its published checksum, which can \
                 indicate a corrupted download or a tampered artifact",
            ),
        ErrorCategory::Availability => context
            .with_suggestion("The release may still be propagating; try again in a few minutes")
            .with_details("Release binaries are built by CI after a tag is published"),
        ErrorCategory::General => context,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_map_to_taxonomy() {
        let net = InstallerError::Network {
            operation: "probe".into(),
            reason: "timed out".into(),
        };
        assert_eq!(net.category(), ErrorCategory::Network);

        let parse = InstallerError::ChecksumParse {
            url: "https://example.com/a.sha256".into(),
            reason: "expected 64 hex characters".into(),
        };
        assert_eq!(parse.category(), ErrorCategory::Network);

        let perm = InstallerError::NoWritableDirectory {
            tried: vec![PathBuf::from("/usr/local/bin")],
        };
        assert_eq!(perm.category(), ErrorCategory::Permission);

        let sec = InstallerError::ChecksumMismatch {
            artifact: "a.tar.gz".into(),
            expected: "0".repeat(64),
            computed: "1".repeat(64),
        };
        assert_eq!(sec.category(), ErrorCategory::Security);

        let avail = InstallerError::ArtifactNotAvailable {
            url: "https://example.com/a.tar.gz".into(),
        };
        assert_eq!(avail.category(), ErrorCategory::Availability);

        let general = InstallerError::BinaryMissing { binary: "awsomarchy".into() };
        assert_eq!(general.category(), ErrorCategory::General);
    }

    #[test]
    fn no_writable_directory_enumerates_candidates() {
        let err = InstallerError::NoWritableDirectory {
            tried: vec![
                PathBuf::from("/usr/local/bin"),
                PathBuf::from("/home/user/.local/bin"),
            ],
        };
        let message = err.to_string();
        assert!(message.contains("/usr/local/bin"));
        assert!(message.contains("/home/user/.local/bin"));
    }

    #[test]
    fn mismatch_message_truncates_digests() {
        let err = InstallerError::ChecksumMismatch {
            artifact: "a.tar.gz".into(),
            expected: format!("{}{}", "a".repeat(16), "b".repeat(48)),
            computed: "c".repeat(64),
        };
        let message = err.to_string();
        assert!(message.contains(&format!("{}...", "a".repeat(16))));
        assert!(!message.contains(&"b".repeat(48)));
    }

    #[test]
    fn security_errors_get_non_bypass_suggestion() {
        let err = InstallerError::ChecksumMismatch {
            artifact: "a.tar.gz".into(),
            expected: "a".repeat(64),
            computed: "b".repeat(64),
        };
        let ctx = user_friendly_error(anyhow::Error::new(err));
        assert!(ctx.suggestion.as_deref().unwrap().contains("Do not use"));
    }

    #[test]
    fn availability_errors_advise_retry() {
        let err =
            InstallerError::ArtifactNotAvailable { url: "https://example.com/x.zip".into() };
        let ctx = user_friendly_error(anyhow::Error::new(err));
        assert!(ctx.suggestion.as_deref().unwrap().contains("try again"));
    }

    #[test]
    fn generic_errors_include_cause_chain() {
        let err = anyhow::anyhow!("root cause").context("outer context");
        let ctx = user_friendly_error(err);
        let message = ctx.error.to_string();
        assert!(message.contains("outer context"));
        assert!(message.contains("root cause"));
    }
}
