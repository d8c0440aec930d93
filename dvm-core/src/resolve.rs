// dvm-core/src/resolve.rs
use dvm_common::error::{DvmError, Result};
use dvm_common::platform;
use dvm_common::registry::RegistryTable;
use semver::Version;
use tracing::debug;

/// Canonical form of a user-supplied version: `v1.2.3` and `1.2.3` both become `1.2.3`.
pub fn normalize_version(input: &str) -> Result<String> {
    let trimmed = input.trim();
    let bare = trimmed.strip_prefix('v').unwrap_or(trimmed);
    Version::parse(bare)
        .map(|v| v.to_string())
        .map_err(|_| DvmError::InvalidVersion(input.to_string()))
}

/// `<registry_base>/v<version>/<platform archive>`
pub fn get_download_url(
    registries: &RegistryTable,
    version: &str,
    registry_name: &str,
) -> Result<String> {
    let base = registries.base_url(registry_name)?;
    let url = format!("{}/v{}/{}", base, version, platform::archive_name());
    debug!("Resolved download URL for {} via {}: {}", version, registry_name, url);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RegistryTable {
        RegistryTable::from_entries([
            ("denocn", "https://deno.js.cn/download"),
            ("mirror", "https://mirror.example/deno/"),
        ])
    }

    #[test]
    fn url_uses_exactly_one_platform_archive() {
        let url = get_download_url(&table(), "1.10.0", "denocn").unwrap();
        let names = [
            platform::WINDOWS_ARCHIVE,
            platform::MACOS_ARCHIVE,
            platform::LINUX_ARCHIVE,
        ];
        let hits: Vec<_> = names.iter().filter(|n| url.contains(*n)).collect();
        assert_eq!(hits, vec![&platform::archive_name()]);
        assert_eq!(
            url,
            format!(
                "https://deno.js.cn/download/v1.10.0/{}",
                platform::archive_name()
            )
        );
    }

    #[test]
    fn base_url_slashes_do_not_double_up() {
        let url = get_download_url(&table(), "0.1.0", "mirror").unwrap();
        assert!(url.starts_with("https://mirror.example/deno/v0.1.0/"));
    }

    #[test]
    fn unregistered_name_is_unknown_registry() {
        let err = get_download_url(&table(), "1.0.0", "nowhere").unwrap_err();
        assert!(matches!(err, DvmError::UnknownRegistry(ref n) if n == "nowhere"));
    }

    #[test]
    fn versions_are_normalized() {
        assert_eq!(normalize_version("1.2.3").unwrap(), "1.2.3");
        assert_eq!(normalize_version("v1.2.3").unwrap(), "1.2.3");
        assert_eq!(normalize_version(" 1.0.0-rc.1 ").unwrap(), "1.0.0-rc.1");
        assert!(matches!(
            normalize_version("latest"),
            Err(DvmError::InvalidVersion(_))
        ));
        assert!(normalize_version("1.2").is_err());
    }
}
