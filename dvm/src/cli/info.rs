// dvm/src/cli/info.rs
use clap::Args;
use dvm_common::config::Config;
use dvm_common::error::Result;
use dvm_core::current_version;

#[derive(Args, Debug)]
pub struct Info;

impl Info {
    pub fn run(&self, config: &Config) -> Result<()> {
        let current = current_version(config);
        println!("dvm {}", env!("CARGO_PKG_VERSION"));
        println!("deno {}", if current.is_empty() { "-" } else { &current });
        println!("dvm root {}", config.dvm_root().display());
        println!("active link {}", config.active_link_path().display());
        Ok(())
    }
}
