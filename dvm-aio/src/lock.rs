// dvm-aio/src/lock.rs
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use dvm_common::error::{DvmError, Result};
use tracing::{debug, warn};

/// Exclusive lock over an install root, held while a version is extracted or
/// activated. The lock file is created with create-new semantics and removed on drop.
#[derive(Debug)]
pub struct InstallLock {
    path: PathBuf,
}

impl InstallLock {
    pub fn acquire(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                return Err(DvmError::Locked(path.to_path_buf()));
            }
            Err(e) => return Err(DvmError::from(e)),
        };
        // Owner pid helps when a stale lock has to be cleared by hand.
        if let Err(e) = writeln!(file, "{}", std::process::id()) {
            warn!("Could not record pid in {}: {}", path.display(), e);
        }
        debug!("Acquired install lock {}", path.display());
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

}

impl Drop for InstallLock {
    fn drop(&mut self) {
        match fs::remove_file(&self.path) {
            Ok(()) => debug!("Released install lock {}", self.path.display()),
            Err(e) => warn!(
                "Failed to release install lock {}: {}",
                self.path.display(),
                e
            ),
        }
    }
}
