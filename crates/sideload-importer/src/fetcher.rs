//! Remote fetch into transient storage
//!
//! The body is streamed into a temporary file and its type is sniffed from
//! the leading bytes. The `Content-Type` header and the URL suffix are never
//! consulted. Redirects are followed by hand so every hop goes through the
//! host guard.

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Url;
use sideload_core::mime;
use sideload_core::{FetchedFile, ImportError, ImporterConfig};
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::io::AsyncWriteExt;

use crate::guard;

const SNIFF_LEN: usize = 64;
const MAX_REDIRECTS: usize = 10;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Blocked host: {0}")]
    BlockedHost(String),

    #[error("Failed to resolve {host}: {source}")]
    Resolve {
        host: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Redirect failed: {0}")]
    Redirect(String),

    #[error("URL returned status code: {0}")]
    Status(reqwest::StatusCode),

    #[error("Response body exceeds {limit} bytes")]
    TooLarge { limit: u64 },

    #[error("Response body is empty")]
    EmptyBody,

    #[error("Transient file error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<FetchError> for ImportError {
    fn from(err: FetchError) -> Self {
        ImportError::FetchFailed(err.to_string())
    }
}

/// Downloads a remote resource into a transient file.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<FetchedFile, FetchError>;
}

/// HTTP fetcher backed by reqwest
#[derive(Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    max_file_size: u64,
    allow_private_hosts: bool,
}

impl HttpFetcher {
    pub fn new(config: &ImporterConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(FetchError::Request)?;

        Ok(Self {
            client,
            max_file_size: config.max_file_size_bytes as u64,
            allow_private_hosts: config.allow_private_hosts,
        })
    }

    /// GET `url`, following up to [`MAX_REDIRECTS`] redirects. Each hop is
    /// checked by the host guard and gets whatever is left of `timeout`.
    async fn get_following_redirects(
        &self,
        url: &str,
        timeout: Duration,
        start: Instant,
    ) -> Result<reqwest::Response, FetchError> {
        let mut current = Url::parse(url).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;
        let mut hops = 0;

        loop {
            guard::check_host(&current, self.allow_private_hosts).await?;

            let remaining = timeout
                .checked_sub(start.elapsed())
                .filter(|d| !d.is_zero())
                .ok_or(FetchError::Timeout(timeout))?;

            let response = self
                .client
                .get(current.clone())
                .timeout(remaining)
                .send()
                .await
                .map_err(|e| {
                    tracing::warn!(error = %e, url = %current, "Failed to download from URL");
                    Self::map_request_error(e, timeout)
                })?;

            let status = response.status();
            if !status.is_redirection() {
                return Ok(response);
            }

            if hops >= MAX_REDIRECTS {
                return Err(FetchError::Redirect(format!(
                    "more than {} redirects",
                    MAX_REDIRECTS
                )));
            }

            let location = response
                .headers()
                .get(reqwest::header::LOCATION)
                .and_then(|v| v.to_str().ok())
                .ok_or_else(|| {
                    FetchError::Redirect(format!("{} without a Location header", status))
                })?;
            let next = current
                .join(location)
                .map_err(|e| FetchError::Redirect(format!("bad Location {}: {}", location, e)))?;

            tracing::debug!(from = %current, to = %next, status = %status, "Following redirect");
            current = next;
            hops += 1;
        }
    }

    fn map_request_error(err: reqwest::Error, timeout: Duration) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout(timeout)
        } else {
            FetchError::Request(err)
        }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<FetchedFile, FetchError> {
        let start = Instant::now();

        let response = self.get_following_redirects(url, timeout, start).await?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status()));
        }

        if let Some(len) = response.content_length() {
            if len > self.max_file_size {
                return Err(FetchError::TooLarge {
                    limit: self.max_file_size,
                });
            }
        }

        let (file, path) = tempfile::NamedTempFile::new()?.into_parts();
        let mut file = tokio::fs::File::from_std(file);
        let mut head: Vec<u8> = Vec::with_capacity(SNIFF_LEN);
        let mut size_bytes: u64 = 0;

        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| Self::map_request_error(e, timeout))?;

            size_bytes += chunk.len() as u64;
            if size_bytes > self.max_file_size {
                return Err(FetchError::TooLarge {
                    limit: self.max_file_size,
                });
            }

            if head.len() < SNIFF_LEN {
                let take = (SNIFF_LEN - head.len()).min(chunk.len());
                head.extend_from_slice(&chunk[..take]);
            }

            file.write_all(&chunk).await?;
        }

        if size_bytes == 0 {
            return Err(FetchError::EmptyBody);
        }

        file.flush().await?;
        drop(file);

        let mime_type = mime::sniff(&head);

        tracing::debug!(
            url = %url,
            size_bytes = size_bytes,
            mime_type = %mime_type,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Remote file downloaded"
        );

        Ok(FetchedFile::new(path, mime_type, size_bytes))
    }
}
