// dvm-common/src/error.rs
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum DvmError {
    #[error("I/O Error: {0}")]
    Io(#[from] Arc<std::io::Error>),

    #[error("HTTP Request Error: {0}")]
    Http(#[from] Arc<reqwest::Error>),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] Arc<serde_json::Error>),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Unknown registry '{0}'. Run `dvm registry` to see the available registries.")]
    UnknownRegistry(String),

    #[error("'{0}' is not a valid semver version (expected something like 1.2.3)")]
    InvalidVersion(String),

    #[error("Deno v{version} is not yet released or available.")]
    VersionNotFound { version: String, url: String },

    #[error("Error making request: {0}")]
    NetworkError(String),

    #[error("Unsupported archive format: {0}")]
    UnsupportedArchiveFormat(String),

    #[error("Error extracting archive into {}: {message}", .path.display())]
    ExtractionFailure { path: PathBuf, message: String },

    #[error("deno v{0} is not installed. Use `dvm install {0}` to install it first.")]
    VersionNotInstalled(String),

    #[error("No deno version is active. Run `dvm use <version>` or pass --deno-version.")]
    NoActiveVersion,

    #[error("Deno v{0} is already installed, run `dvm use {0}` to use this version.")]
    VersionAlreadyInstalled(String),

    #[error(
        "You may have to run dvm in a shell (cmd, PowerShell, Git Bash, etc) with elevated (Administrative) privileges to get it to run."
    )]
    InsufficientPrivileges,

    #[error(
        "Current version ({}) is not a symlink. You may want to copy it into {}.",
        .path.display(),
        .dvm_root.display()
    )]
    UnsafeOverwrite { path: PathBuf, dvm_root: PathBuf },

    #[error(
        "Another dvm process is installing or switching versions (lock file {}). Remove it if no dvm process is running.",
        .0.display()
    )]
    Locked(PathBuf),

    #[error("Cancelled: {0}")]
    Cancelled(String),

    #[error("Generic Error: {0}")]
    Generic(String),
}

impl From<std::io::Error> for DvmError {
    fn from(err: std::io::Error) -> Self {
        DvmError::Io(Arc::new(err))
    }
}

impl From<reqwest::Error> for DvmError {
    fn from(err: reqwest::Error) -> Self {
        DvmError::Http(Arc::new(err))
    }
}

impl From<serde_json::Error> for DvmError {
    fn from(err: serde_json::Error) -> Self {
        DvmError::Json(Arc::new(err))
    }
}

pub type Result<T> = std::result::Result<T, DvmError>;
