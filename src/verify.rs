//! Integrity verification of downloaded archives.
//!
//! The checksum companion body is expected to start with a 64-character
//! hex SHA-256 digest; anything after the first whitespace (usually the
//! artifact filename) is ignored. Comparison against the computed digest
//! is case-insensitive. A mismatch is a security failure that always
//! aborts the run; it is never downgradable, unlike a missing checksum
//! resource which merely disables verification upstream.

use crate::core::InstallerError;
use sha2::{Digest, Sha256};
use std::path::Path;
use tracing::debug;

/// A parsed checksum published alongside a release archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecksumRecord {
    /// The expected digest, stored lowercase.
    pub digest_hex: String,
    /// Where the record came from, for error messages.
    pub source_url: String,
}

impl ChecksumRecord {
    /// Parse a checksum companion body.
    ///
    /// # Errors
    ///
    /// Returns a `Network`-category parse error when the first token is
    /// missing or is not exactly 64 hex characters. An existing-but-broken
    /// checksum resource aborts the run; it does not degrade to an
    /// unverified install.
    pub fn parse(body: &str, source_url: &str) -> Result<Self, InstallerError> {
        let token = body.split_whitespace().next().ok_or_else(|| {
            InstallerError::ChecksumParse {
                url: source_url.to_string(),
                reason: "empty body".to_string(),
            }
        })?;

        if token.len() != 64 || !token.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(InstallerError::ChecksumParse {
                url: source_url.to_string(),
                reason: format!(
                    "expected a 64-character hex digest, got '{}' ({} characters)",
                    token,
                    token.len()
                ),
            });
        }

        Ok(Self {
            digest_hex: token.to_ascii_lowercase(),
            source_url: source_url.to_string(),
        })
    }

    /// Truncated digest for progress output.
    #[must_use]
    pub fn short(&self) -> &str {
        &self.digest_hex[..16]
    }

    /// Verify `archive` against this record.
    ///
    /// # Errors
    ///
    /// `ChecksumMismatch` when the computed digest differs, or an IO error
    /// if the archive cannot be read back.
    pub async fn verify(&self, archive: &Path) -> Result<(), InstallerError> {
        let computed = compute_sha256(archive).await?;
        debug!("computed digest {computed} for {}", archive.display());

        if computed != self.digest_hex {
            let artifact = archive
                .file_name()
                .map_or_else(|| archive.display().to_string(), |n| n.to_string_lossy().into_owned());
            return Err(InstallerError::ChecksumMismatch {
                artifact,
                expected: self.digest_hex.clone(),
                computed,
            });
        }

        Ok(())
    }
}

/// Compute the lowercase hex SHA-256 digest of a file.
///
/// # Errors
///
/// Propagates IO errors from reading the file.
pub async fn compute_sha256(path: &Path) -> Result<String, InstallerError> {
    let contents = tokio::fs::read(path).await?;
    let mut hasher = Sha256::new();
    hasher.update(&contents);
    Ok(hex::encode(hasher.finalize()))
}
