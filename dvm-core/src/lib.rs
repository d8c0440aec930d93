// dvm-core/src/lib.rs

// Declare the top-level modules within the library crate
pub mod activate;
pub mod clean;
pub mod exec;
pub mod fetch;
pub mod install;
pub mod installed;
pub mod resolve;

// Re-export key types for easier use by the CLI crate
pub use activate::{activate, Activation};
pub use clean::clean;
pub use exec::exec;
pub use fetch::download;
pub use install::{install, InstallOptions, InstallOutcome};
pub use installed::{current_version, list_versions};
pub use resolve::{get_download_url, normalize_version};
