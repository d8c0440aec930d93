// dvm-core/src/activate.rs
// Switches the active pointer to an installed version.
use std::fs;
use std::path::{Path, PathBuf};

use dvm_aio::fs as dvm_fs;
use dvm_aio::InstallLock;
use dvm_common::config::Config;
use dvm_common::error::{DvmError, Result};
use tracing::{debug, warn};

use crate::resolve::normalize_version;

/// Result of a successful activation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activation {
    pub version: String,
    /// The active pointer that was written.
    pub link: PathBuf,
    /// Executable the pointer now resolves to.
    pub target: PathBuf,
}

/// Makes `version` the active one. Holds the install lock while the pointer is replaced.
pub async fn activate(config: &Config, version: &str) -> Result<Activation> {
    let version = normalize_version(version)?;
    let _lock = InstallLock::acquire(&config.lock_path())?;
    link_version(config, &version).await
}

/// Points the active pointer at `<root>/<version>/<deno>`.
///
/// The caller is expected to hold the install lock. Nothing is touched unless the
/// version is installed, the process may create symlinks, and any existing pointer
/// is itself a symlink. The new link is built beside the pointer and renamed over
/// it so there is no moment without an active executable.
pub async fn link_version(config: &Config, version: &str) -> Result<Activation> {
    let target = config.version_exe_path(version);
    if !target.is_file() {
        return Err(DvmError::VersionNotInstalled(version.to_string()));
    }

    ensure_link_privileges().await?;

    let link = config.active_link_path();
    if let Some(meta) = dvm_fs::get_symlink_metadata(&link)? {
        if !meta.file_type().is_symlink() {
            return Err(DvmError::UnsafeOverwrite {
                path: link,
                dvm_root: config.dvm_root().to_path_buf(),
            });
        }
    }

    if let Some(parent) = link.parent() {
        dvm_fs::create_dir_all(parent)?;
    }
    replace_link(&target, &link)?;

    debug!("now use {}", version);
    Ok(Activation {
        version: version.to_string(),
        link,
        target,
    })
}

fn staging_path(link: &Path) -> PathBuf {
    let name = link
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "deno".to_string());
    link.with_file_name(format!(".{}.dvm-{}", name, std::process::id()))
}

fn replace_link(target: &Path, link: &Path) -> Result<()> {
    let staging = staging_path(link);
    if dvm_fs::check_symlink_exists(&staging) {
        debug!("Removing stale staging link {}", staging.display());
        dvm_fs::remove_file(&staging)?;
    }
    dvm_fs::create_symlink(target, &staging)?;

    if let Err(e) = fs::rename(&staging, link) {
        warn!(
            "Failed to move {} over {}: {}",
            staging.display(),
            link.display(),
            e
        );
        if let Err(cleanup_err) = dvm_fs::remove_file(&staging) {
            warn!("Failed to remove {}: {}", staging.display(), cleanup_err);
        }
        return Err(DvmError::from(e));
    }
    debug!("Linked {} -> {}", link.display(), target.display());
    Ok(())
}

#[cfg(windows)]
async fn ensure_link_privileges() -> Result<()> {
    let elevated = tokio::task::spawn_blocking(|| {
        // SAFETY: IsUserAnAdmin takes no arguments and only queries the process token.
        unsafe { windows_sys::Win32::UI::Shell::IsUserAnAdmin() != 0 }
    })
    .await
    .map_err(|e| DvmError::Generic(format!("JoinError in privilege check: {e}")))?;
    if elevated {
        Ok(())
    } else {
        Err(DvmError::InsufficientPrivileges)
    }
}

#[cfg(not(windows))]
async fn ensure_link_privileges() -> Result<()> {
    Ok(())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::installed::current_version;

    fn config(dir: &Path) -> Config {
        Config::with_paths(dir.join("root"), dir.join("prefix"), dir.join("dl")).unwrap()
    }

    fn fake_install(config: &Config, version: &str) {
        let exe = config.version_exe_path(version);
        fs::create_dir_all(exe.parent().unwrap()).unwrap();
        fs::write(&exe, format!("deno {version}")).unwrap();
    }

    #[tokio::test]
    async fn activation_points_link_at_version_executable() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        fake_install(&config, "1.10.0");

        let activation = activate(&config, "v1.10.0").await.unwrap();

        assert_eq!(activation.version, "1.10.0");
        assert_eq!(activation.link, config.active_link_path());
        assert_eq!(
            fs::read_link(&activation.link).unwrap(),
            config.version_exe_path("1.10.0")
        );
        assert_eq!(current_version(&config), "1.10.0");
        assert!(!config.lock_path().exists());
    }

    #[tokio::test]
    async fn switching_versions_replaces_the_link() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        fake_install(&config, "1.9.0");
        fake_install(&config, "1.10.0");

        activate(&config, "1.9.0").await.unwrap();
        activate(&config, "1.10.0").await.unwrap();

        assert_eq!(current_version(&config), "1.10.0");
        let leftovers: Vec<_> = fs::read_dir(config.active_link_path().parent().unwrap())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(leftovers.len(), 1);
    }

    #[tokio::test]
    async fn uninstalled_version_leaves_current_pointer_alone() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        fake_install(&config, "1.9.0");
        activate(&config, "1.9.0").await.unwrap();

        let err = activate(&config, "2.0.0").await.unwrap_err();

        assert!(matches!(err, DvmError::VersionNotInstalled(ref v) if v == "2.0.0"));
        assert_eq!(current_version(&config), "1.9.0");
    }

    #[tokio::test]
    async fn regular_file_at_pointer_is_never_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        fake_install(&config, "1.10.0");
        let link = config.active_link_path();
        fs::create_dir_all(link.parent().unwrap()).unwrap();
        fs::write(&link, b"hand installed deno").unwrap();

        let err = activate(&config, "1.10.0").await.unwrap_err();

        match err {
            DvmError::UnsafeOverwrite { path, dvm_root } => {
                assert_eq!(path, link);
                assert_eq!(dvm_root, config.dvm_root());
            }
            other => panic!("expected UnsafeOverwrite, got {other:?}"),
        }
        assert_eq!(fs::read(&link).unwrap(), b"hand installed deno");
    }

    #[tokio::test]
    async fn held_lock_blocks_activation() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        fake_install(&config, "1.10.0");
        let _held = InstallLock::acquire(&config.lock_path()).unwrap();

        let err = activate(&config, "1.10.0").await.unwrap_err();
        assert!(matches!(err, DvmError::Locked(_)));
        assert_eq!(current_version(&config), "");
    }

    #[test]
    fn failed_rename_removes_staging_link_and_keeps_pointer() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("1.10.0").join("deno");
        fs::create_dir_all(target.parent().unwrap()).unwrap();
        fs::write(&target, "deno").unwrap();
        // A populated directory at the pointer path cannot be renamed over.
        let link = dir.path().join("bin").join("deno");
        fs::create_dir_all(&link).unwrap();
        fs::write(link.join("keep"), "x").unwrap();

        assert!(replace_link(&target, &link).is_err());

        assert!(!dvm_fs::check_symlink_exists(&staging_path(&link)));
        assert!(link.join("keep").is_file());
    }

    #[test]
    fn stale_staging_link_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("1.10.0").join("deno");
        fs::create_dir_all(target.parent().unwrap()).unwrap();
        fs::write(&target, "deno").unwrap();
        let link = dir.path().join("deno");
        std::os::unix::fs::symlink(dir.path().join("gone"), staging_path(&link)).unwrap();

        replace_link(&target, &link).unwrap();

        assert_eq!(fs::read_link(&link).unwrap(), target);
        assert!(!dvm_fs::check_symlink_exists(&staging_path(&link)));
    }

    #[test]
    fn staging_link_is_hidden_sibling() {
        let staging = staging_path(Path::new("/usr/local/bin/deno"));
        assert_eq!(staging.parent().unwrap(), Path::new("/usr/local/bin"));
        let name = staging.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with(".deno.dvm-"));
    }
}
