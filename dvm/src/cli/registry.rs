// dvm/src/cli/registry.rs
use clap::Args;
use colored::Colorize;
use dvm_common::config::Config;
use dvm_common::error::Result;

#[derive(Args, Debug)]
pub struct Registry;

impl Registry {
    pub fn run(&self, config: &Config) -> Result<()> {
        for (name, base) in config.registries.iter() {
            let marker = if name == config.default_registry { "*" } else { " " };
            println!(" {} {:<10} {}", marker, name.bold(), base);
        }
        Ok(())
    }
}
