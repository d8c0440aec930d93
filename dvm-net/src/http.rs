// dvm-net/src/http.rs
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use dvm_common::error::{DvmError, Result};
use futures::StreamExt;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client, StatusCode};
use tokio::fs::{self, File as TokioFile};
use tokio::io::AsyncWriteExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use crate::validation::validate_url;

const CONNECT_TIMEOUT_SECS: u64 = 30;
const USER_AGENT_STRING: &str = concat!(
    "dvm/",
    env!("CARGO_PKG_VERSION"),
    " (Rust; +https://github.com/justjavac/dvm)"
);

/// Progress events emitted while an archive is streamed to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadProgress {
    /// Response headers arrived; `total` comes from `Content-Length`.
    Started { url: String, total: Option<u64> },
    /// Cumulative bytes written so far.
    Advanced { downloaded: u64 },
    Finished { downloaded: u64 },
}

pub type ProgressCallback = Arc<dyn Fn(DownloadProgress) + Send + Sync>;

pub fn build_http_client() -> Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_STRING));
    headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
    Client::builder()
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .default_headers(headers)
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .map_err(|e| DvmError::NetworkError(format!("Failed to build HTTP client: {e}")))
}

/// `<final_path>-download-<millis>`, the file a download streams into before the rename.
pub fn write_temp_path(final_path: &Path) -> PathBuf {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    let mut name = final_path.as_os_str().to_os_string();
    name.push(format!("-download-{millis}"));
    PathBuf::from(name)
}

/// Streams `url` into `final_path`.
///
/// The body is written to a sibling write-temp file and renamed into place once the
/// stream ends, so `final_path` never holds a partial archive. A 404 maps to
/// [`DvmError::VersionNotFound`] for `version`; every other failure status or
/// transport error maps to [`DvmError::NetworkError`]. Nothing is retried.
pub async fn fetch_archive(
    client: &Client,
    url: &str,
    version: &str,
    final_path: &Path,
    progress: Option<&ProgressCallback>,
    cancel: &CancellationToken,
) -> Result<PathBuf> {
    validate_url(url)?;

    let response = tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            return Err(DvmError::Cancelled(format!("download of {url} was interrupted")));
        }
        sent = client.get(url).send() => sent.map_err(|e| {
            debug!("HTTP request failed for {url}: {e}");
            DvmError::NetworkError(format!("{url}: {e}"))
        })?,
    };

    let status = response.status();
    debug!("Received HTTP status: {} for {}", status, url);

    if status == StatusCode::NOT_FOUND {
        return Err(DvmError::VersionNotFound {
            version: version.to_string(),
            url: url.to_string(),
        });
    }
    if !status.is_success() {
        error!("HTTP error {} for URL {}", status, url);
        return Err(DvmError::NetworkError(format!(
            "HTTP error {status} for URL {url}"
        )));
    }

    let total = response.content_length();
    if let Some(cb) = progress {
        cb(DownloadProgress::Started {
            url: url.to_string(),
            total,
        });
    }

    let write_path = write_temp_path(final_path);
    debug!("Downloading to temporary path: {}", write_path.display());

    match stream_body(response, &write_path, progress, cancel, url).await {
        Ok(downloaded) => {
            fs::rename(&write_path, final_path).await.map_err(|e| {
                DvmError::Generic(format!(
                    "Failed to move {} to {}: {}",
                    write_path.display(),
                    final_path.display(),
                    e
                ))
            })?;
            debug!(
                "Moved {} bytes to final location: {}",
                downloaded,
                final_path.display()
            );
            if let Some(cb) = progress {
                cb(DownloadProgress::Finished { downloaded });
            }
            Ok(final_path.to_path_buf())
        }
        Err(e) => {
            if let Err(remove_err) = fs::remove_file(&write_path).await {
                warn!(
                    "Could not remove partial download {}: {}",
                    write_path.display(),
                    remove_err
                );
            }
            Err(e)
        }
    }
}

async fn stream_body(
    response: reqwest::Response,
    write_path: &Path,
    progress: Option<&ProgressCallback>,
    cancel: &CancellationToken,
    url: &str,
) -> Result<u64> {
    let mut file = TokioFile::create(write_path).await.map_err(|e| {
        DvmError::Generic(format!(
            "Failed to create temp file {}: {}",
            write_path.display(),
            e
        ))
    })?;

    let mut stream = response.bytes_stream();
    let mut downloaded: u64 = 0;

    loop {
        let next = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                return Err(DvmError::Cancelled(format!("download of {url} was interrupted")));
            }
            next = stream.next() => next,
        };
        let Some(chunk) = next else { break };
        let chunk = chunk.map_err(|e| DvmError::NetworkError(format!("{url}: {e}")))?;
        file.write_all(&chunk).await?;
        downloaded += chunk.len() as u64;
        if let Some(cb) = progress {
            cb(DownloadProgress::Advanced { downloaded });
        }
    }

    file.flush().await?;
    Ok(downloaded)
}
