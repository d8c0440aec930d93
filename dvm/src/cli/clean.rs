// dvm/src/cli/clean.rs
use clap::Args;
use dvm_common::config::Config;
use dvm_common::error::Result;

#[derive(Args, Debug)]
pub struct Clean;

impl Clean {
    pub fn run(&self, config: &Config) -> Result<()> {
        let removed = dvm_core::clean(config)?;
        for path in &removed {
            println!("Removed {}", path.display());
        }
        println!("Cleaned successfully");
        Ok(())
    }
}
