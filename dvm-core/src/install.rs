// dvm-core/src/install.rs
// Download, unpack and optionally activate one release.
use std::path::PathBuf;

use dvm_aio::{extract_archive_async, InstallLock};
use dvm_common::config::Config;
use dvm_common::error::{DvmError, Result};
use dvm_common::platform::DENO_EXECUTABLE;
use dvm_net::ProgressCallback;
use reqwest::Client;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::activate::{link_version, Activation};
use crate::fetch::download;
use crate::resolve::normalize_version;

#[derive(Debug, Clone)]
pub struct InstallOptions {
    /// Registry to download from; the configured default when `None`.
    pub registry: Option<String>,
    /// Switch the active pointer once the version is unpacked.
    pub activate: bool,
}

impl Default for InstallOptions {
    fn default() -> Self {
        Self {
            registry: None,
            activate: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct InstallOutcome {
    pub version: String,
    pub executable: PathBuf,
    pub activation: Option<Activation>,
}

pub async fn install(
    config: &Config,
    client: &Client,
    version: &str,
    options: &InstallOptions,
    progress: Option<&ProgressCallback>,
    cancel: &CancellationToken,
) -> Result<InstallOutcome> {
    let version = normalize_version(version)?;
    if config.version_exe_path(&version).is_file() {
        return Err(DvmError::VersionAlreadyInstalled(version));
    }

    let registry = config.registry_name(options.registry.as_deref());
    debug!("Installing deno {} from registry {}", version, registry);
    let archive = download(config, client, &version, registry, progress, cancel).await?;

    if cancel.is_cancelled() {
        return Err(DvmError::Cancelled(format!("install of {version}")));
    }
    let _lock = InstallLock::acquire(&config.lock_path())?;

    let executable =
        extract_archive_async(&archive, &config.version_dir(&version), DENO_EXECUTABLE).await?;
    debug!("Installed deno {} at {}", version, executable.display());

    let activation = if options.activate {
        Some(link_version(config, &version).await?)
    } else {
        None
    };

    Ok(InstallOutcome {
        version,
        executable,
        activation,
    })
}
