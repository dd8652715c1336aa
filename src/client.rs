//! HTTP plumbing shared by the availability prober, the artifact fetcher,
//! and the integrity verifier.
//!
//! All requests are sequential and blocking from the pipeline's point of
//! view; nothing here retries. A single failed call is terminal for the
//! run.

use crate::constants::{DOWNLOAD_TIMEOUT, METADATA_TIMEOUT, latest_release_url, user_agent};
use crate::core::InstallerError;
use futures::StreamExt;
use indicatif::ProgressBar;
use reqwest::StatusCode;
use serde::Deserialize;
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Outcome of a metadata-only probe against a URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeStatus {
    /// The resource exists; advertised content length when known.
    Found {
        /// `Content-Length` reported by the server, if any.
        content_length: Option<u64>,
    },
    /// The server answered 404.
    NotFound,
}

#[derive(Deserialize)]
struct LatestRelease {
    tag_name: String,
}

/// Thin wrapper around [`reqwest::Client`] with the installer's user agent
/// and timeouts applied.
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    /// Build the client used for the whole run.
    ///
    /// # Errors
    ///
    /// Fails if the underlying TLS backend cannot be initialized.
    pub fn new() -> Result<Self, InstallerError> {
        let client = reqwest::Client::builder()
            .timeout(METADATA_TIMEOUT)
            .user_agent(user_agent())
            .build()
            .map_err(|e| InstallerError::Network {
                operation: "creating HTTP client".to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self { client })
    }

    /// Fetch the tag of the latest published release.
    ///
    /// # Errors
    ///
    /// Any transport failure, non-2xx status, or malformed body is a
    /// `Network` error.
    pub async fn latest_release_tag(&self) -> Result<String, InstallerError> {
        let url = latest_release_url();
        debug!("querying latest release metadata: {url}");

        let operation = "fetching latest release tag";
        let response = self.client.get(&url).send().await.map_err(|e| {
            InstallerError::Network { operation: operation.to_string(), reason: e.to_string() }
        })?;

        if !response.status().is_success() {
            return Err(InstallerError::Network {
                operation: operation.to_string(),
                reason: format!("{url} answered HTTP {}", response.status()),
            });
        }

        let release: LatestRelease = response.json().await.map_err(|e| {
            InstallerError::Network {
                operation: operation.to_string(),
                reason: format!("malformed release metadata: {e}"),
            }
        })?;

        Ok(release.tag_name)
    }

    /// Issue a metadata-only HEAD request against `url`.
    ///
    /// # Errors
    ///
    /// Transport failures and statuses other than success or 404 are
    /// `Network` errors; the 404 case is reported as
    /// [`ProbeStatus::NotFound`] so the caller can apply its own policy.
    pub async fn probe(&self, url: &str) -> Result<ProbeStatus, InstallerError> {
        debug!("probing availability: {url}");

        let response = self.client.head(url).send().await.map_err(|e| {
            InstallerError::Network {
                operation: format!("probing {url}"),
                reason: e.to_string(),
            }
        })?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(ProbeStatus::NotFound),
            status if status.is_success() => Ok(ProbeStatus::Found {
                content_length: response.content_length(),
            }),
            status => Err(InstallerError::Network {
                operation: format!("probing {url}"),
                reason: format!("unexpected HTTP {status}"),
            }),
        }
    }

    /// Fetch a small text resource (the checksum companion body).
    ///
    /// # Errors
    ///
    /// Any failure, including a 404 that slipped past the earlier probe,
    /// is a `Network` error.
    pub async fn fetch_text(&self, url: &str) -> Result<String, InstallerError> {
        debug!("fetching text resource: {url}");

        let operation = format!("fetching {url}");
        let response = self.client.get(url).send().await.map_err(|e| {
            InstallerError::Network { operation: operation.clone(), reason: e.to_string() }
        })?;

        if !response.status().is_success() {
            return Err(InstallerError::Network {
                operation,
                reason: format!("unexpected HTTP {}", response.status()),
            });
        }

        response.text().await.map_err(|e| InstallerError::Network {
            operation: format!("reading body of {url}"),
            reason: e.to_string(),
        })
    }

    /// Stream the archive at `url` into `dest`, driving `progress` when
    /// present.
    ///
    /// The availability probe has already succeeded by the time this runs,
    /// so any failure here (including a non-2xx status) is a race with the
    /// release host and reported as a `Network` error.
    pub async fn download(
        &self,
        url: &str,
        dest: &Path,
        progress: Option<&ProgressBar>,
    ) -> Result<(), InstallerError> {
        debug!("downloading {url} -> {}", dest.display());

        let operation = format!("downloading {url}");
        let response = self
            .client
            .get(url)
            .timeout(DOWNLOAD_TIMEOUT)
            .send()
            .await
            .map_err(|e| InstallerError::Network {
                operation: operation.clone(),
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(InstallerError::Network {
                operation,
                reason: format!("unexpected HTTP {}", response.status()),
            });
        }

        if let (Some(bar), Some(total)) = (progress, response.content_length()) {
            bar.set_length(total);
        }

        let mut file = tokio::fs::File::create(dest).await?;
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| InstallerError::Network {
                operation: operation.clone(),
                reason: e.to_string(),
            })?;
            file.write_all(&chunk).await?;
            if let Some(bar) = progress {
                bar.inc(chunk.len() as u64);
            }
        }

        file.flush().await?;
        Ok(())
    }
}
