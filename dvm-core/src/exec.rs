// dvm-core/src/exec.rs
// Runs an installed deno without touching the active pointer.
use std::process::{ExitStatus, Stdio};

use dvm_common::config::Config;
use dvm_common::error::{DvmError, Result};
use tokio::process::Command;
use tracing::debug;

use crate::installed::current_version;
use crate::resolve::normalize_version;

/// Runs `<root>/<version>/deno <args>` with inherited stdio and waits for it.
/// Without an explicit version the currently active one is used.
pub async fn exec(
    config: &Config,
    version: Option<&str>,
    args: &[String],
) -> Result<ExitStatus> {
    let version = match version {
        Some(requested) => normalize_version(requested)?,
        None => {
            let current = current_version(config);
            if current.is_empty() {
                return Err(DvmError::NoActiveVersion);
            }
            current
        }
    };

    let executable = config.version_exe_path(&version);
    if !executable.is_file() {
        return Err(DvmError::VersionNotInstalled(version));
    }

    debug!("Running {} {:?}", executable.display(), args);
    let mut cmd = Command::new(&executable);
    cmd.args(args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .kill_on_drop(true);

    let status = cmd.status().await.map_err(|e| {
        DvmError::Generic(format!("Failed to run {}: {}", executable.display(), e))
    })?;
    debug!("deno {} exited with {}", version, status);
    Ok(status)
}

#[cfg(all(test, unix))]
mod tests {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;

    use super::*;

    fn config(dir: &Path) -> Config {
        Config::with_paths(dir.join("root"), dir.join("prefix"), dir.join("dl")).unwrap()
    }

    /// Installs a stand-in deno that exits with its first argument.
    fn fake_install(config: &Config, version: &str) {
        let exe = config.version_exe_path(version);
        fs::create_dir_all(exe.parent().unwrap()).unwrap();
        fs::write(&exe, "#!/bin/sh\nexit \"${1:-0}\"\n").unwrap();
        fs::set_permissions(&exe, fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[tokio::test]
    async fn explicit_version_runs_with_arguments() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        fake_install(&config, "1.10.0");

        let status = exec(&config, Some("v1.10.0"), &["7".to_string()])
            .await
            .unwrap();

        assert_eq!(status.code(), Some(7));
        assert!(!config.active_link_path().exists());
    }

    #[tokio::test]
    async fn active_version_is_the_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        fake_install(&config, "1.9.0");
        crate::activate(&config, "1.9.0").await.unwrap();

        let status = exec(&config, None, &[]).await.unwrap();
        assert!(status.success());
    }

    #[tokio::test]
    async fn nothing_active_and_no_version_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = exec(&config(dir.path()), None, &[]).await.unwrap_err();
        assert!(matches!(err, DvmError::NoActiveVersion));
    }

    #[tokio::test]
    async fn uninstalled_version_is_not_run() {
        let dir = tempfile::tempdir().unwrap();
        let err = exec(&config(dir.path()), Some("2.0.0"), &[])
            .await
            .unwrap_err();
        assert!(matches!(err, DvmError::VersionNotInstalled(ref v) if v == "2.0.0"));
    }
}
