// dvm-aio/src/extract.rs
// Unpacks downloaded release archives into a version directory.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use dvm_common::error::{DvmError, Result};
use flate2::read::GzDecoder;
use tracing::{debug, warn};
use zip::ZipArchive;

use crate::fs::{self as dvm_fs, EXECUTABLE_MODE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    /// Directory archive; unpacked into the version directory itself.
    Zip,
    /// A single compressed executable; decompressed to `<dir>/<executable>`.
    Gzip,
}

impl ArchiveKind {
    pub fn from_path(archive_path: &Path) -> Result<Self> {
        let ext = archive_path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_lowercase();
        match ext.as_str() {
            "zip" => Ok(ArchiveKind::Zip),
            "gz" => Ok(ArchiveKind::Gzip),
            _ => Err(DvmError::UnsupportedArchiveFormat(
                archive_path.display().to_string(),
            )),
        }
    }
}

/// Extracts `archive_path` into `target_dir` and marks the executable runnable.
///
/// An existing `target_dir` is removed first, but only if it is empty; leftovers
/// from an earlier failed install make this fail instead of being deleted. On any
/// failure after the directory is created, it is removed again. Returns the path
/// of the extracted executable.
pub async fn extract_archive_async(
    archive_path: &Path,
    target_dir: &Path,
    executable_name: &str,
) -> Result<PathBuf> {
    let kind = ArchiveKind::from_path(archive_path)?;
    debug!(
        "Extracting archive '{}' ({:?}) to '{}'",
        archive_path.display(),
        kind,
        target_dir.display()
    );

    if target_dir.exists() {
        dvm_fs::remove_dir(target_dir).map_err(|e| DvmError::ExtractionFailure {
            path: target_dir.to_path_buf(),
            message: format!(
                "{e}. The directory holds files from an earlier install; remove it and try again"
            ),
        })?;
    }

    dvm_fs::create_install_dir(target_dir)?;

    let executable = target_dir.join(executable_name);
    let result = unpack(kind, archive_path, target_dir, &executable).await;

    match result {
        Ok(()) => Ok(executable),
        Err(e) => {
            warn!("Error extracting archive, removing {}", target_dir.display());
            if let Err(cleanup_err) = dvm_fs::remove_directory_recursive(target_dir) {
                warn!(
                    "Failed to clean up {}: {}",
                    target_dir.display(),
                    cleanup_err
                );
            }
            Err(match e {
                DvmError::ExtractionFailure { .. } => e,
                other => DvmError::ExtractionFailure {
                    path: target_dir.to_path_buf(),
                    message: other.to_string(),
                },
            })
        }
    }
}

async fn unpack(
    kind: ArchiveKind,
    archive_path: &Path,
    target_dir: &Path,
    executable: &Path,
) -> Result<()> {
    let archive_path = archive_path.to_path_buf();
    let target_dir_owned = target_dir.to_path_buf();
    let executable_owned = executable.to_path_buf();

    tokio::task::spawn_blocking(move || match kind {
        ArchiveKind::Zip => {
            debug!("Extracting zip contents");
            unzip_into(&archive_path, &target_dir_owned)
        }
        ArchiveKind::Gzip => {
            debug!("Extracting gz contents");
            gunzip_to(&archive_path, &executable_owned)
        }
    })
    .await
    .map_err(|e| DvmError::Generic(format!("JoinError in archive extraction: {e}")))??;

    if !executable.is_file() {
        return Err(DvmError::ExtractionFailure {
            path: target_dir.to_path_buf(),
            message: format!(
                "archive did not contain {}",
                executable
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default()
            ),
        });
    }
    dvm_fs::set_permissions(executable, EXECUTABLE_MODE)
}

fn gunzip_to(archive_path: &Path, dest: &Path) -> Result<()> {
    let input = BufReader::new(File::open(archive_path)?);
    let mut decoder = GzDecoder::new(input);
    let mut output = File::create(dest)?;
    let written = io::copy(&mut decoder, &mut output)
        .map_err(|e| DvmError::Generic(format!("Failed to decompress gzip stream: {e}")))?;
    debug!("Decompressed {} bytes to {}", written, dest.display());
    Ok(())
}

fn unzip_into(archive_path: &Path, target_dir: &Path) -> Result<()> {
    let file = BufReader::new(File::open(archive_path)?);
    let mut archive = ZipArchive::new(file)
        .map_err(|e| DvmError::Generic(format!("Failed to open ZIP: {e}")))?;

    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|e| DvmError::Generic(format!("Failed to access ZIP entry: {e}")))?;
        let relative = entry
            .enclosed_name()
            .ok_or_else(|| DvmError::Generic(format!("Unsafe ZIP entry path: {}", entry.name())))?;
        let outpath = target_dir.join(relative);

        if entry.is_dir() {
            std::fs::create_dir_all(&outpath)?;
            continue;
        }
        if let Some(parent) = outpath.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut outfile = File::create(&outpath)?;
        io::copy(&mut entry, &mut outfile)
            .map_err(|e| DvmError::Generic(format!("Failed to write ZIP entry: {e}")))?;

        #[cfg(unix)]
        if let Some(mode) = entry.unix_mode() {
            if let Err(e) = dvm_fs::set_permissions(&outpath, mode) {
                warn!("Failed set permissions on ZIP entry {}: {}", outpath.display(), e);
            }
        }
        debug!("Extracted ZIP entry to: {}", outpath.display());
    }
    Ok(())
}
