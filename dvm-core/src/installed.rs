// dvm-core/src/installed.rs
// The install root doubles as the registry of installed versions.
use std::cmp::Ordering;
use std::path::Path;

use dvm_aio::fs as dvm_fs;
use dvm_common::config::Config;
use dvm_common::error::Result;
use semver::Version;
use tracing::debug;

/// Installed versions: the immediate, non-hidden subdirectories of the install root.
/// Semver names sort ascending first, anything else follows lexicographically.
pub fn list_versions(config: &Config) -> Result<Vec<String>> {
    let mut versions: Vec<String> = dvm_fs::list_subdirectories(config.dvm_root())?
        .into_iter()
        .filter(|name| !name.starts_with('.'))
        .collect();
    versions.sort_by(|a, b| compare_versions(a, b));
    debug!("Found {} installed versions", versions.len());
    Ok(versions)
}

fn compare_versions(a: &str, b: &str) -> Ordering {
    match (Version::parse(a), Version::parse(b)) {
        (Ok(va), Ok(vb)) => va.cmp(&vb),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

/// Version the active pointer currently targets, or an empty string when there is
/// no pointer or it cannot be read.
pub fn current_version(config: &Config) -> String {
    let link = config.active_link_path();
    let target = match dvm_fs::read_link(&link) {
        Ok(target) => target,
        Err(e) => {
            debug!("No active version ({}): {}", link.display(), e);
            return String::new();
        }
    };
    let resolved = if target.is_absolute() {
        target
    } else {
        link.parent().unwrap_or(Path::new(".")).join(target)
    };
    resolved
        .parent()
        .and_then(|dir| dir.file_name())
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn config(dir: &Path) -> Config {
        Config::with_paths(dir.join("root"), dir.join("prefix"), dir.join("dl")).unwrap()
    }

    #[test]
    fn hidden_entries_and_files_are_not_versions() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        for name in ["1.10.0", "1.9.2", ".cache", "nightly", "0.42.0"] {
            fs::create_dir_all(config.dvm_root().join(name)).unwrap();
        }
        fs::write(config.lock_path(), "123").unwrap();

        assert_eq!(
            list_versions(&config).unwrap(),
            vec!["0.42.0", "1.9.2", "1.10.0", "nightly"]
        );
    }

    #[test]
    fn missing_root_means_nothing_installed() {
        let dir = tempfile::tempdir().unwrap();
        assert!(list_versions(&config(dir.path())).unwrap().is_empty());
    }

    #[test]
    fn no_pointer_means_empty_current_version() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(current_version(&config(dir.path())), "");
    }

    #[cfg(unix)]
    #[test]
    fn current_version_is_parent_dir_of_target() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        let exe = config.version_exe_path("1.10.0");
        fs::create_dir_all(exe.parent().unwrap()).unwrap();
        fs::write(&exe, "bin").unwrap();
        let link = config.active_link_path();
        fs::create_dir_all(link.parent().unwrap()).unwrap();
        std::os::unix::fs::symlink(&exe, &link).unwrap();

        assert_eq!(current_version(&config), "1.10.0");
    }

    #[cfg(unix)]
    #[test]
    fn relative_pointer_targets_resolve_against_link_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path());
        let link = config.active_link_path();
        fs::create_dir_all(link.parent().unwrap()).unwrap();
        std::os::unix::fs::symlink("../../root/2.0.0/deno", &link).unwrap();

        assert_eq!(current_version(&config), "2.0.0");
    }
}
