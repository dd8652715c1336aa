//! Version resolution: an explicit request or the latest published release
//! tag, normalized for use in download URLs.
//!
//! Normalization strips exactly one leading non-digit prefix character
//! (the conventional `v` in GitHub tags) and nothing else. No semantic
//! version validation happens here; any non-empty remainder is passed to
//! URL construction verbatim.

use crate::client::HttpClient;
use crate::core::InstallerError;
use anyhow::Result;
use tracing::debug;

/// A resolved release version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedVersion {
    /// The version as requested or as published (e.g. `v2.1.0`).
    pub raw: String,
    /// The normalized form used in URLs (e.g. `2.1.0`).
    pub normalized: String,
}

impl ResolvedVersion {
    /// Normalize a raw version string.
    ///
    /// # Errors
    ///
    /// Fails when the normalized form is empty (e.g. the input was `"v"`
    /// or `""`).
    pub fn parse(raw: &str) -> Result<Self, InstallerError> {
        let normalized = normalize(raw);
        if normalized.is_empty() {
            return Err(InstallerError::InvalidVersion { raw: raw.to_string() });
        }
        Ok(Self { raw: raw.to_string(), normalized })
    }
}

/// Strip exactly one leading non-digit character if present.
///
/// Idempotent on already-normalized strings: a string starting with a digit
/// is returned unchanged.
fn normalize(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) if !first.is_ascii_digit() => chars.as_str().to_string(),
        _ => raw.to_string(),
    }
}

/// Resolve the target version: the explicit request when present (no
/// network call), otherwise the latest published release tag.
///
/// # Errors
///
/// - `General` when an explicit request normalizes to an empty string
/// - `Network` when the latest-release endpoint is unreachable or its tag
///   is empty
pub async fn resolve(
    client: &HttpClient,
    requested: Option<&str>,
) -> Result<ResolvedVersion, InstallerError> {
    if let Some(raw) = requested {
        debug!("using explicitly requested version: {raw}");
        return ResolvedVersion::parse(raw);
    }

    let tag = client.latest_release_tag().await?;
    debug!("latest published release tag: {tag}");

    // An empty tag from the endpoint is a malformed response, not a bad
    // user request.
    ResolvedVersion::parse(&tag).map_err(|_| InstallerError::Network {
        operation: "fetching latest release tag".to_string(),
        reason: format!("release metadata contained an unusable tag: '{tag}'"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_exactly_one_prefix_character() {
        assert_eq!(ResolvedVersion::parse("v2.1.0").unwrap().normalized, "2.1.0");
        assert_eq!(ResolvedVersion::parse("V2.1.0").unwrap().normalized, "2.1.0");
        // Only the first character is considered; the rest passes verbatim.
        assert_eq!(ResolvedVersion::parse("vv2.1.0").unwrap().normalized, "v2.1.0");
    }

    #[test]
    fn normalization_is_idempotent() {
        let once = ResolvedVersion::parse("v2.1.0").unwrap();
        let twice = ResolvedVersion::parse(&once.normalized).unwrap();
        assert_eq!(once.normalized, twice.normalized);
    }

    #[test]
    fn no_semver_validation_is_applied() {
        // Odd but non-empty strings are accepted and passed through.
        assert_eq!(ResolvedVersion::parse("v2.1").unwrap().normalized, "2.1");
        assert_eq!(
            ResolvedVersion::parse("v0.5.0-beta.1").unwrap().normalized,
            "0.5.0-beta.1"
        );
        assert_eq!(ResolvedVersion::parse("nightly").unwrap().normalized, "ightly");
    }

    #[test]
    fn empty_results_are_rejected() {
        assert!(ResolvedVersion::parse("").is_err());
        assert!(ResolvedVersion::parse("v").is_err());
    }

    #[test]
    fn raw_form_is_preserved() {
        let version = ResolvedVersion::parse("v2.1.0").unwrap();
        assert_eq!(version.raw, "v2.1.0");
    }
}
