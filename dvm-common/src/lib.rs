// dvm-common/src/lib.rs
pub mod config;
pub mod error;
pub mod platform;
pub mod registry;

// Re-export key types
pub use config::Config;
pub use error::{DvmError, Result};
pub use registry::RegistryTable;
