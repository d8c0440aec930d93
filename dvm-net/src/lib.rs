// dvm-net/src/lib.rs
pub mod http;
pub mod validation;

pub use dvm_common::error::{DvmError, Result};
pub use http::{
    build_http_client, fetch_archive, write_temp_path, DownloadProgress, ProgressCallback,
};
pub use validation::{url_file_name, validate_url, verify_checksum, ChecksumStatus};
