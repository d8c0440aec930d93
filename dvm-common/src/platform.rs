// dvm-common/src/platform.rs
//! Fixed host-platform tables. Only the OS family is inspected; every archive is x64.

/// Name of the deno executable on this platform.
pub const DENO_EXECUTABLE: &str = if cfg!(windows) { "deno.exe" } else { "deno" };

/// Release archive names, one per supported OS family.
pub const WINDOWS_ARCHIVE: &str = "deno_win_x64.zip";
pub const MACOS_ARCHIVE: &str = "deno_osx_x64.gz";
pub const LINUX_ARCHIVE: &str = "deno_linux_x64.gz";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsFamily {
    Windows,
    MacOs,
    Other,
}

impl OsFamily {
    pub fn host() -> Self {
        if cfg!(windows) {
            OsFamily::Windows
        } else if cfg!(target_os = "macos") {
            OsFamily::MacOs
        } else {
            OsFamily::Other
        }
    }

    pub fn archive_name(self) -> &'static str {
        match self {
            OsFamily::Windows => WINDOWS_ARCHIVE,
            OsFamily::MacOs => MACOS_ARCHIVE,
            OsFamily::Other => LINUX_ARCHIVE,
        }
    }
}

/// Archive file name for the host platform.
pub fn archive_name() -> &'static str {
    OsFamily::host().archive_name()
}

/// `<os>_<arch>` as reported by the `arch` command.
pub fn system_arch() -> String {
    format!("{}_{}", std::env::consts::OS, std::env::consts::ARCH)
}
