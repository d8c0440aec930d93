// dvm-common/src/config.rs
use std::env;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::error::Result;
use super::platform::DENO_EXECUTABLE;
use super::registry::{RegistryTable, DEFAULT_REGISTRY};

const DVM_ROOT_DIRNAME: &str = ".dvm";
const LOCK_FILENAME: &str = ".dvm.lock";
const LOGS_DIRNAME: &str = ".logs";

#[derive(Debug, Clone)]
pub struct Config {
    /// Install root: one subdirectory per installed version.
    pub dvm_root: PathBuf,
    /// npm-like global prefix that holds the active pointer.
    pub bin_prefix: PathBuf,
    /// Staging directory for downloaded archives.
    pub download_dir: PathBuf,
    pub default_registry: String,
    pub registries: RegistryTable,
}

impl Config {
    pub fn load() -> Result<Self> {
        debug!("Loading dvm configuration");

        let dvm_root = non_empty_var("DVM_PATH")
            .or_else(|| non_empty_var("DVM_DIR"))
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                let home = dirs::home_dir().unwrap_or_else(env::temp_dir);
                debug!(
                    "DVM_PATH not set, falling back to {}/{}",
                    home.display(),
                    DVM_ROOT_DIRNAME
                );
                home.join(DVM_ROOT_DIRNAME)
            });
        debug!("Effective dvm root: {}", dvm_root.display());

        let bin_prefix = non_empty_var("DVM_PREFIX")
            .or_else(|| non_empty_var("npm_config_prefix"))
            .or_else(|| non_empty_var("PREFIX"))
            .map(PathBuf::from)
            .unwrap_or_else(default_bin_prefix);
        debug!("Effective bin prefix: {}", bin_prefix.display());

        let mut registries = RegistryTable::bundled()?;
        if let Some(file) = non_empty_var("DVM_REGISTRY_FILE") {
            registries.merge_file(Path::new(&file))?;
        }

        let default_registry =
            non_empty_var("DVM_REGISTRY").unwrap_or_else(|| DEFAULT_REGISTRY.to_string());

        debug!("Configuration loaded successfully.");
        Ok(Self {
            dvm_root,
            bin_prefix,
            download_dir: env::temp_dir(),
            default_registry,
            registries,
        })
    }

    /// Builds a configuration around explicit paths with the bundled registry table.
    pub fn with_paths(
        dvm_root: impl Into<PathBuf>,
        bin_prefix: impl Into<PathBuf>,
        download_dir: impl Into<PathBuf>,
    ) -> Result<Self> {
        Ok(Self {
            dvm_root: dvm_root.into(),
            bin_prefix: bin_prefix.into(),
            download_dir: download_dir.into(),
            default_registry: DEFAULT_REGISTRY.to_string(),
            registries: RegistryTable::bundled()?,
        })
    }

    pub fn dvm_root(&self) -> &Path {
        &self.dvm_root
    }

    pub fn version_dir(&self, version: &str) -> PathBuf {
        self.dvm_root.join(version)
    }

    pub fn version_exe_path(&self, version: &str) -> PathBuf {
        self.version_dir(version).join(DENO_EXECUTABLE)
    }

    /// The active pointer: `<prefix>/bin/deno` on unix, `<prefix>\deno.exe` on Windows.
    pub fn active_link_path(&self) -> PathBuf {
        if cfg!(windows) {
            self.bin_prefix.join(DENO_EXECUTABLE)
        } else {
            self.bin_prefix.join("bin").join(DENO_EXECUTABLE)
        }
    }

    pub fn lock_path(&self) -> PathBuf {
        self.dvm_root.join(LOCK_FILENAME)
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.dvm_root.join(LOGS_DIRNAME)
    }

    pub fn registry_name<'a>(&'a self, requested: Option<&'a str>) -> &'a str {
        requested.unwrap_or(&self.default_registry)
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

fn default_bin_prefix() -> PathBuf {
    if cfg!(windows) {
        non_empty_var("APPDATA")
            .map(|appdata| PathBuf::from(appdata).join("npm"))
            .unwrap_or_else(|| {
                dirs::home_dir()
                    .unwrap_or_else(env::temp_dir)
                    .join("AppData")
                    .join("Roaming")
                    .join("npm")
            })
    } else {
        PathBuf::from("/usr/local")
    }
}
