/*
File: dvm-aio/src/fs.rs
Purpose: Primitive synchronous filesystem operations.
*/
use std::fs::{self, Permissions};
use std::io;
use std::path::{Path, PathBuf};

use dvm_common::error::{DvmError, Result};
use tracing::{debug, error, warn};

/// Mode requested for install directories, before the umask.
pub const PERMISSIVE_DIR_MODE: u32 = 0o777;
/// Mode applied to extracted executables: rwx for owner, rx for everyone else.
pub const EXECUTABLE_MODE: u32 = 0o755;

/// Checks if a path exists without following symlinks.
pub fn check_symlink_exists(path: &Path) -> bool {
    path.symlink_metadata().is_ok()
}

/// Returns metadata for a path, *without* following symlinks.
/// `Ok(None)` when nothing occupies the path.
pub fn get_symlink_metadata(path: &Path) -> Result<Option<fs::Metadata>> {
    match fs::symlink_metadata(path) {
        Ok(meta) => Ok(Some(meta)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(DvmError::from(e)),
    }
}

/// Creates a directory and all its parent components if they are missing.
pub fn create_dir_all(path: &Path) -> Result<()> {
    debug!("Creating directory recursively: {}", path.display());
    fs::create_dir_all(path).map_err(|e| {
        error!("Failed create dir {}: {}", path.display(), e);
        DvmError::from(e)
    })
}

/// Creates an install directory (and missing parents) requesting `PERMISSIVE_DIR_MODE`.
/// The mode goes through the process umask, so a 022 umask yields 0755.
pub fn create_install_dir(path: &Path) -> Result<()> {
    debug!("Creating install directory: {}", path.display());
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(PERMISSIVE_DIR_MODE);
    }
    builder.create(path).map_err(|e| {
        error!("Failed create install dir {}: {}", path.display(), e);
        DvmError::from(e)
    })
}

/// Removes a file or symlink.
pub fn remove_file(path: &Path) -> Result<()> {
    debug!("Removing file: {}", path.display());
    fs::remove_file(path).map_err(|e| {
        if e.kind() != io::ErrorKind::NotFound {
            error!("Failed remove file {}: {}", path.display(), e);
        }
        DvmError::from(e)
    })
}

/// Removes an empty directory. Fails on a non-empty one.
pub fn remove_dir(path: &Path) -> Result<()> {
    debug!("Removing directory: {}", path.display());
    fs::remove_dir(path).map_err(|e| {
        if e.kind() != io::ErrorKind::NotFound {
            error!("Failed remove dir {}: {}", path.display(), e);
        }
        DvmError::from(e)
    })
}

/// Removes a directory and all its contents recursively.
pub fn remove_directory_recursive(path: &Path) -> Result<()> {
    debug!("Removing directory recursively: {}", path.display());
    fs::remove_dir_all(path).map_err(|e| {
        if e.kind() != io::ErrorKind::NotFound {
            error!("Failed remove dir_all {}: {}", path.display(), e);
        }
        DvmError::from(e)
    })
}

/// Reads the raw target of a symlink.
pub fn read_link(path: &Path) -> Result<PathBuf> {
    fs::read_link(path).map_err(DvmError::from)
}

/// Creates a file symlink at `link` pointing to `target`.
#[cfg(unix)]
pub fn create_symlink(target: &Path, link: &Path) -> Result<()> {
    debug!("Creating symlink {} -> {}", link.display(), target.display());
    std::os::unix::fs::symlink(target, link).map_err(|e| {
        error!(
            "Failed create symlink {} -> {}: {}",
            link.display(),
            target.display(),
            e
        );
        DvmError::from(e)
    })
}

#[cfg(windows)]
pub fn create_symlink(target: &Path, link: &Path) -> Result<()> {
    debug!("Creating symlink {} -> {}", link.display(), target.display());
    std::os::windows::fs::symlink_file(target, link).map_err(|e| {
        error!(
            "Failed create symlink {} -> {}: {}",
            link.display(),
            target.display(),
            e
        );
        DvmError::from(e)
    })
}

#[cfg(not(any(unix, windows)))]
pub fn create_symlink(target: &Path, link: &Path) -> Result<()> {
    warn!(
        "Symlink creation not supported on this platform: {} -> {}",
        link.display(),
        target.display()
    );
    Err(DvmError::Generic(
        "Symlinks not supported on this platform".to_string(),
    ))
}

/// Sets file permissions (Unix only). Mode is standard Unix octal mode.
#[cfg(unix)]
pub fn set_permissions(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    debug!("Setting permissions on {}: {:o}", path.display(), mode);
    fs::set_permissions(path, Permissions::from_mode(mode)).map_err(|e| {
        error!("Failed set permissions on {}: {}", path.display(), e);
        DvmError::from(e)
    })
}

#[cfg(not(unix))]
pub fn set_permissions(path: &Path, _mode: u32) -> Result<()> {
    // Windows decides executability by extension; only clear a stray read-only bit.
    let meta = fs::metadata(path)?;
    let mut perms: Permissions = meta.permissions();
    if perms.readonly() {
        #[allow(clippy::permissions_set_readonly_false)]
        perms.set_readonly(false);
        fs::set_permissions(path, perms)?;
    }
    Ok(())
}

/// True when the file carries an execute bit for owner, group and others.
#[cfg(all(test, unix))]
pub fn is_executable_by_all(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 == 0o111)
        .unwrap_or(false)
}

#[cfg(all(test, not(unix)))]
pub fn is_executable_by_all(path: &Path) -> bool {
    path.is_file()
}

/// Names of the immediate subdirectories of `dir_path`.
/// Skips entries that cause errors during reading.
pub fn list_subdirectories(dir_path: &Path) -> Result<Vec<String>> {
    debug!("Listing subdirectories of: {}", dir_path.display());
    let mut names = Vec::new();

    let read_dir = match fs::read_dir(dir_path) {
        Ok(read_dir) => read_dir,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(names),
        Err(e) => {
            error!("Failed to read directory {}: {}", dir_path.display(), e);
            return Err(DvmError::from(e));
        }
    };

    for entry_res in read_dir {
        match entry_res {
            Ok(entry) => match entry.file_type() {
                Ok(file_type) if file_type.is_dir() => {
                    names.push(entry.file_name().to_string_lossy().to_string());
                }
                Ok(_) => {}
                Err(e) => warn!(
                    "Failed to get file type for {}: {}",
                    entry.path().display(),
                    e
                ),
            },
            Err(e) => warn!("Error reading entry in {}: {}", dir_path.display(), e),
        }
    }
    Ok(names)
}
