// dvm/src/cli/arch.rs
use clap::Args;
use dvm_common::error::Result;
use dvm_common::platform;

#[derive(Args, Debug)]
pub struct Arch;

impl Arch {
    pub fn run(&self) -> Result<()> {
        println!("System Arch: {}.", platform::system_arch());
        Ok(())
    }
}
