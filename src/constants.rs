//! Release coordinates and numeric constants shared across the installer.
//!
//! Everything that ties this binary to the awsomarchy release channel lives
//! here: repository coordinates, artifact naming, and the network timeouts
//! used by the HTTP client.

use std::time::Duration;

/// GitHub owner of the release repository.
pub const REPO_OWNER: &str = "aorumbayev";

/// GitHub repository that publishes awsomarchy releases.
pub const REPO_NAME: &str = "awesome-omarchy-tui";

/// Name of the binary shipped inside release archives.
pub const BINARY_NAME: &str = "awsomarchy";

/// Distribution flavour embedded in archive filenames
/// (`awsomarchy-standard-<triple>.<ext>`).
pub const ARCHIVE_FLAVOR: &str = "standard";

/// Extension of the checksum companion resource.
pub const CHECKSUM_EXT: &str = "sha256";

/// Zero-byte marker file used to probe directory writability.
pub const WRITE_PROBE_MARKER: &str = ".awsomarchy-install-probe";

/// Timeout for metadata requests (latest-release lookup, HEAD probes,
/// checksum bodies).
pub const METADATA_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for the archive download itself. Release archives are a few
/// megabytes but slow links exist.
pub const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(300);

/// A HEAD response advertising fewer bytes than this is treated as a
/// still-propagating artifact rather than a real release.
pub const MIN_ARTIFACT_SIZE: u64 = 1000;

/// Latest-release metadata endpoint.
pub fn latest_release_url() -> String {
    format!("https://api.github.com/repos/{REPO_OWNER}/{REPO_NAME}/releases/latest")
}

/// Base URL for a release's downloadable assets. `version` is the
/// normalized version, without the `v` tag prefix.
pub fn release_download_base(version: &str) -> String {
    format!("https://github.com/{REPO_OWNER}/{REPO_NAME}/releases/download/v{version}")
}

/// User agent sent with every request.
pub fn user_agent() -> String {
    format!("awsomarchy-installer/{}", env!("CARGO_PKG_VERSION"))
}
