//! The install pipeline.
//!
//! Stages run strictly in order, each consuming the previous stage's
//! output: platform, version, directory, availability probe, download,
//! verification, extraction and placement, PATH registration. A re-run
//! over an existing installation is an update; the new binary simply
//! replaces the old one.

pub mod archive;
pub mod dirs;

use crate::client::{HttpClient, ProbeStatus};
use crate::constants::MIN_ARTIFACT_SIZE;
use crate::core::InstallerError;
use crate::pathenv;
use crate::platform::PlatformTarget;
use crate::release::ReleaseArtifact;
use crate::reporter::{Reporter, format_bytes};
use crate::verify::ChecksumRecord;
use crate::version::{self, ResolvedVersion};
use crate::workspace::Workspace;
use anyhow::Result;
use std::path::PathBuf;
use tracing::{info, warn};

/// What the caller asked for.
#[derive(Debug, Clone, Default)]
pub struct InstallRequest {
    /// Explicitly requested version; latest release when absent.
    pub requested_version: Option<String>,
    /// Explicitly requested install directory; probed first when present.
    pub explicit_dir: Option<PathBuf>,
}

/// What a successful run produced.
#[derive(Debug, Clone)]
pub struct InstallOutcome {
    /// Final path of the installed binary.
    pub installed_path: PathBuf,
    /// The version that was installed.
    pub version: ResolvedVersion,
    /// Whether the archive was checksum-verified. False only when the
    /// release publishes no checksum companion.
    pub verified: bool,
}

/// Run the full install pipeline.
///
/// # Errors
///
/// Any stage failure aborts the run; see the error taxonomy in
/// [`crate::core::error`]. PATH registration is the one non-fatal stage:
/// its failures degrade to a warning because the binary is already
/// installed and usable by absolute path.
pub async fn run(request: &InstallRequest, reporter: &Reporter) -> Result<InstallOutcome> {
    let target = PlatformTarget::detect()?;
    info!("resolved platform target: {}", target.triple);
    reporter.step(&format!("Platform: {}", target.triple));

    let client = HttpClient::new()?;
    let version = version::resolve(&client, request.requested_version.as_deref()).await?;
    info!("resolved version: {}", version.normalized);
    reporter.step(&format!("Installing awsomarchy v{}", version.normalized));

    let install_dir = dirs::resolve_install_dir(request.explicit_dir.as_deref())?;
    reporter.detail(&format!("install directory: {}", install_dir.display()));

    let artifact = ReleaseArtifact::new(&target, &version);
    let checksum = probe_release(&client, &artifact, reporter).await?;

    let workspace = Workspace::create()?;
    let archive_path = artifact.local_path(workspace.path());

    reporter.step(&format!("Downloading {}", artifact.archive_name));
    let bar = reporter.download_bar();
    client.download(&artifact.download_url, &archive_path, bar.as_ref()).await?;
    if let Some(bar) = bar {
        bar.finish_and_clear();
    }

    let verified = match &checksum {
        Some(record) => {
            reporter.step(&format!("Verifying checksum ({}...)", record.short()));
            record.verify(&archive_path).await?;
            reporter.success("checksum verified");
            true
        }
        None => false,
    };

    reporter.step("Installing");
    let staging = workspace.staging_dir()?;
    archive::extract_archive(&archive_path, &staging, target.archive_format())?;
    let staged = archive::locate_binary(&staging, &target.binary_name())?;
    if target.needs_exec_bit() {
        archive::make_executable(&staged)?;
    }
    let installed_path = archive::place_binary(&staged, &install_dir, &target.binary_name())?;

    // Non-fatal: the binary works by absolute path even if the profile or
    // registry could not be updated.
    pathenv::register(&install_dir, reporter);

    reporter.success(&format!(
        "awsomarchy v{} installed at {}",
        version.normalized,
        installed_path.display()
    ));

    Ok(InstallOutcome { installed_path, version, verified })
}

/// What the companion probe means for the verification policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChecksumAvailability {
    /// The companion exists; fetch it and verify.
    Published,
    /// No companion for this release; install unverified with a warning.
    Missing,
}

/// Interpret the archive probe: 404 means the release is not available,
/// an implausibly small advertised size means CI is still uploading.
/// Returns the advertised size for display when the probe passes.
fn evaluate_archive_probe(
    status: ProbeStatus,
    url: &str,
) -> Result<Option<u64>, InstallerError> {
    match status {
        ProbeStatus::NotFound => {
            Err(InstallerError::ArtifactNotAvailable { url: url.to_string() })
        }
        ProbeStatus::Found { content_length: Some(size) } if size < MIN_ARTIFACT_SIZE => {
            Err(InstallerError::ArtifactIncomplete { url: url.to_string(), size })
        }
        ProbeStatus::Found { content_length } => Ok(content_length),
    }
}

/// Interpret the companion probe. Absence is the one condition that
/// degrades instead of aborting.
const fn evaluate_checksum_probe(status: ProbeStatus) -> ChecksumAvailability {
    match status {
        ProbeStatus::NotFound => ChecksumAvailability::Missing,
        ProbeStatus::Found { .. } => ChecksumAvailability::Published,
    }
}

/// Probe the archive and checksum URLs before downloading anything.
///
/// A missing archive or an implausibly small one is an availability
/// failure. A missing checksum degrades the run to unverified with a
/// warning; checksum handling is identical in interactive and unattended
/// modes.
async fn probe_release(
    client: &HttpClient,
    artifact: &ReleaseArtifact,
    reporter: &Reporter,
) -> Result<Option<ChecksumRecord>, InstallerError> {
    reporter.step("Checking release availability");

    let status = client.probe(&artifact.download_url).await?;
    if let Some(size) = evaluate_archive_probe(status, &artifact.download_url)? {
        reporter.detail(&format!("archive size: {}", format_bytes(size)));
    }

    let status = client.probe(&artifact.checksum_url).await?;
    match evaluate_checksum_probe(status) {
        ChecksumAvailability::Missing => {
            warn!("no checksum published at {}", artifact.checksum_url);
            reporter.warn("no checksum published for this release; proceeding unverified");
            Ok(None)
        }
        ChecksumAvailability::Published => {
            let body = client.fetch_text(&artifact.checksum_url).await?;
            let record = ChecksumRecord::parse(&body, &artifact.checksum_url)?;
            Ok(Some(record))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://example.com/awsomarchy-standard-x86_64-unknown-linux-gnu.tar.gz";

    #[test]
    fn absent_archive_is_an_availability_error() {
        let err = evaluate_archive_probe(ProbeStatus::NotFound, URL).unwrap_err();
        match err {
            InstallerError::ArtifactNotAvailable { url } => assert_eq!(url, URL),
            other => panic!("expected ArtifactNotAvailable, got {other}"),
        }
    }

    #[test]
    fn undersized_archive_is_incomplete() {
        let status = ProbeStatus::Found { content_length: Some(MIN_ARTIFACT_SIZE - 1) };
        let err = evaluate_archive_probe(status, URL).unwrap_err();
        match err {
            InstallerError::ArtifactIncomplete { size, .. } => {
                assert_eq!(size, MIN_ARTIFACT_SIZE - 1);
            }
            other => panic!("expected ArtifactIncomplete, got {other}"),
        }
    }

    #[test]
    fn plausible_archive_passes_and_reports_its_size() {
        let status = ProbeStatus::Found { content_length: Some(5 * 1024 * 1024) };
        assert_eq!(evaluate_archive_probe(status, URL).unwrap(), Some(5 * 1024 * 1024));

        // A server that advertises no length still passes the probe.
        let status = ProbeStatus::Found { content_length: None };
        assert_eq!(evaluate_archive_probe(status, URL).unwrap(), None);
    }

    #[test]
    fn missing_companion_degrades_instead_of_aborting() {
        assert_eq!(
            evaluate_checksum_probe(ProbeStatus::NotFound),
            ChecksumAvailability::Missing
        );
        assert_eq!(
            evaluate_checksum_probe(ProbeStatus::Found { content_length: Some(98) }),
            ChecksumAvailability::Published
        );
    }
}
