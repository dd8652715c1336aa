//! Release artifact naming and URL construction.
//!
//! Artifacts follow the `awsomarchy-standard-<triple>.<ext>` convention;
//! the checksum companion lives at the same path with the archive
//! extension replaced by `.sha256`.

use crate::constants::{ARCHIVE_FLAVOR, BINARY_NAME, CHECKSUM_EXT, release_download_base};
use crate::platform::PlatformTarget;
use crate::version::ResolvedVersion;
use std::path::PathBuf;

/// The artifact pair for one release on one target.
#[derive(Debug, Clone)]
pub struct ReleaseArtifact {
    /// Canonical archive filename (e.g.
    /// `awsomarchy-standard-x86_64-unknown-linux-gnu.tar.gz`).
    pub archive_name: String,
    /// Full download URL of the archive.
    pub download_url: String,
    /// Derived URL of the checksum companion resource.
    pub checksum_url: String,
}

impl ReleaseArtifact {
    /// Build the artifact description for a target and version.
    #[must_use]
    pub fn new(target: &PlatformTarget, version: &ResolvedVersion) -> Self {
        let ext = target.archive_format().extension();
        let archive_name = format!("{BINARY_NAME}-{ARCHIVE_FLAVOR}-{}.{ext}", target.triple);
        let download_url =
            format!("{}/{archive_name}", release_download_base(&version.normalized));
        let checksum_url = derive_checksum_url(&download_url, ext);

        Self { archive_name, download_url, checksum_url }
    }

    /// Where the archive lands inside the scratch workspace.
    #[must_use]
    pub fn local_path(&self, workspace: &std::path::Path) -> PathBuf {
        workspace.join(&self.archive_name)
    }
}

/// Substitute the archive extension for the checksum-file extension.
fn derive_checksum_url(download_url: &str, archive_ext: &str) -> String {
    download_url
        .strip_suffix(archive_ext)
        .map_or_else(|| format!("{download_url}.{CHECKSUM_EXT}"), |stem| {
            format!("{stem}{CHECKSUM_EXT}")
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact(os: &str, arch: &str, version: &str) -> ReleaseArtifact {
        let target = PlatformTarget::from_parts(os, arch).unwrap();
        let version = ResolvedVersion::parse(version).unwrap();
        ReleaseArtifact::new(&target, &version)
    }

    #[test]
    fn linux_artifact_urls() {
        let artifact = artifact("linux", "x86_64", "v2.1.0");
        assert_eq!(
            artifact.download_url,
            "https://github.com/aorumbayev/awesome-omarchy-tui/releases/download/v2.1.0/\
             awsomarchy-standard-x86_64-unknown-linux-gnu.tar.gz"
        );
        assert_eq!(
            artifact.checksum_url,
            "https://github.com/aorumbayev/awesome-omarchy-tui/releases/download/v2.1.0/\
             awsomarchy-standard-x86_64-unknown-linux-gnu.sha256"
        );
    }

    #[test]
    fn windows_artifact_uses_zip() {
        let artifact = artifact("windows", "x86_64", "2.1.0");
        assert!(artifact.archive_name.ends_with("x86_64-pc-windows-msvc.zip"));
        assert!(artifact.checksum_url.ends_with("x86_64-pc-windows-msvc.sha256"));
    }

    #[test]
    fn normalized_version_appears_in_url_verbatim() {
        // The tag prefix is re-added by the URL pattern, not the version.
        let artifact = artifact("macos", "aarch64", "v0.5.0-beta.1");
        assert!(artifact.download_url.contains("/download/v0.5.0-beta.1/"));
    }

    #[test]
    fn local_path_uses_canonical_name() {
        let artifact = artifact("linux", "aarch64", "v1.0.0");
        let path = artifact.local_path(std::path::Path::new("/tmp/ws"));
        assert_eq!(
            path,
            std::path::Path::new("/tmp/ws")
                .join("awsomarchy-standard-aarch64-unknown-linux-gnu.tar.gz")
        );
    }
}
