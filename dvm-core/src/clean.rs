// dvm-core/src/clean.rs
// Clears cached release archives and interrupted downloads from the download dir.
use std::fs;
use std::io;
use std::path::PathBuf;

use dvm_aio::fs as dvm_fs;
use dvm_aio::InstallLock;
use dvm_common::config::Config;
use dvm_common::error::{DvmError, Result};
use dvm_common::platform::{LINUX_ARCHIVE, MACOS_ARCHIVE, WINDOWS_ARCHIVE};
use tracing::{debug, warn};

const ARCHIVE_NAMES: [&str; 3] = [WINDOWS_ARCHIVE, MACOS_ARCHIVE, LINUX_ARCHIVE];

/// True for `<archive>` and its write-temp form `<archive>-download-<millis>`.
/// The download dir is usually the shared OS temp dir, so nothing else matches.
fn is_dvm_download(name: &str) -> bool {
    ARCHIVE_NAMES.iter().any(|archive| {
        name == *archive
            || name
                .strip_prefix(archive)
                .and_then(|rest| rest.strip_prefix("-download-"))
                .is_some_and(|millis| {
                    !millis.is_empty() && millis.bytes().all(|b| b.is_ascii_digit())
                })
    })
}

/// Removes every cached archive and leftover write-temp file and returns their paths.
pub fn clean(config: &Config) -> Result<Vec<PathBuf>> {
    let _lock = InstallLock::acquire(&config.lock_path())?;
    let dir = &config.download_dir;

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(DvmError::from(e)),
    };

    let mut removed = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry in {}: {}", dir.display(), e);
                continue;
            }
        };
        let name = entry.file_name().to_string_lossy().to_string();
        if !is_dvm_download(&name) || !entry.file_type().is_ok_and(|t| t.is_file()) {
            continue;
        }
        let path = entry.path();
        dvm_fs::remove_file(&path)?;
        debug!("Removed {}", path.display());
        removed.push(path);
    }
    removed.sort();
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    fn config(dir: &Path) -> Config {
        Config::with_paths(dir.join("root"), dir.join("prefix"), dir.join("dl")).unwrap()
    }

    #[test]
    fn only_release_archives_and_partials_match() {
        assert!(is_dvm_download("deno_linux_x64.gz"));
        assert!(is_dvm_download("deno_win_x64.zip-download-1712345678901"));
        assert!(!is_dvm_download("deno_osx_x64.gz-download-"));
        assert!(!is_dvm_download("deno_linux_x64.gz.bak"));
        assert!(!is_dvm_download("node-v20.tar.gz"));
    }

    #[test]
    fn removes_archives_and_leaves_other_files() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        fs::create_dir_all(&config.download_dir).unwrap();
        let dl = &config.download_dir;
        fs::write(dl.join("deno_linux_x64.gz"), b"a").unwrap();
        fs::write(dl.join("deno_osx_x64.gz-download-1700000000000"), b"b").unwrap();
        fs::write(dl.join("unrelated.gz"), b"c").unwrap();
        fs::create_dir(dl.join("deno_win_x64.zip")).unwrap();

        let removed = clean(&config).unwrap();

        assert_eq!(
            removed,
            vec![
                dl.join("deno_linux_x64.gz"),
                dl.join("deno_osx_x64.gz-download-1700000000000"),
            ]
        );
        assert!(dl.join("unrelated.gz").is_file());
        assert!(dl.join("deno_win_x64.zip").is_dir());
        assert!(!config.lock_path().exists());
    }

    #[test]
    fn missing_download_dir_is_already_clean() {
        let dir = tempfile::tempdir().unwrap();
        assert!(clean(&config(dir.path())).unwrap().is_empty());
    }
}
