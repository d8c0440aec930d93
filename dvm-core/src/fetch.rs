// dvm-core/src/fetch.rs
use std::path::PathBuf;

use dvm_aio::fs as dvm_fs;
use dvm_common::config::Config;
use dvm_common::error::{DvmError, Result};
use dvm_net::{
    fetch_archive, url_file_name, validate_url, verify_checksum, ChecksumStatus,
    ProgressCallback,
};
use reqwest::Client;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::resolve::get_download_url;

/// Downloads the release archive for `version` from `registry_name` into the
/// configured download directory and returns its local path.
pub async fn download(
    config: &Config,
    client: &Client,
    version: &str,
    registry_name: &str,
    progress: Option<&ProgressCallback>,
    cancel: &CancellationToken,
) -> Result<PathBuf> {
    let url = get_download_url(&config.registries, version, registry_name)?;
    let parsed = validate_url(&url)?;
    let file_name = url_file_name(&parsed)
        .ok_or_else(|| DvmError::Generic(format!("Download URL has no file name: {url}")))?;

    dvm_fs::create_dir_all(&config.download_dir)?;
    let archive_path = config.download_dir.join(file_name);
    debug!("Target archive path: {}", archive_path.display());

    if archive_path.exists() {
        match verify_checksum(&archive_path, None) {
            ChecksumStatus::Verified => {
                debug!("Reusing verified archive: {}", archive_path.display());
                return Ok(archive_path);
            }
            ChecksumStatus::Unverified => {
                debug!(
                    "Existing archive {} is unverified, downloading again",
                    archive_path.display()
                );
                dvm_fs::remove_file(&archive_path)?;
            }
        }
    }

    fetch_archive(client, &url, version, &archive_path, progress, cancel).await
}
