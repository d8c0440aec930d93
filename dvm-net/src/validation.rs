// dvm-net/src/validation.rs
use std::path::Path;

use dvm_common::error::{DvmError, Result};
use tracing::{debug, warn};
use url::Url;

/// Outcome of checking a previously downloaded archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChecksumStatus {
    Verified,
    Unverified,
}

/// Checks whether a cached archive can be reused without downloading it again.
///
/// Registries publish no digests, so there is nothing to compare against and the
/// result is always [`ChecksumStatus::Unverified`]. Callers must treat that as
/// "download again".
pub fn verify_checksum(path: &Path, expected: Option<&str>) -> ChecksumStatus {
    debug!(
        "Checksum verification requested for {} (expected: {:?})",
        path.display(),
        expected
    );
    ChecksumStatus::Unverified
}

/// Validates a URL, ensuring it uses an http(s) scheme.
pub fn validate_url(url_str: &str) -> Result<Url> {
    let url = Url::parse(url_str)
        .map_err(|e| DvmError::Generic(format!("Failed to parse URL '{url_str}': {e}")))?;
    match url.scheme() {
        "https" => Ok(url),
        "http" => {
            warn!("Downloading over plain http: {}", url_str);
            Ok(url)
        }
        other => Err(DvmError::Generic(format!(
            "Invalid URL scheme for '{url_str}': must be http or https, but got '{other}'"
        ))),
    }
}

/// Final path segment of a URL, used to name the local archive.
pub fn url_file_name(url: &Url) -> Option<String> {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}
