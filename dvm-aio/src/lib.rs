// dvm-aio/src/lib.rs
//! Filesystem and archive IO for dvm (extraction, symlinks, permissions, install lock)

pub mod extract;
pub mod fs;
pub mod lock;

pub use extract::{extract_archive_async, ArchiveKind};
pub use lock::InstallLock;
