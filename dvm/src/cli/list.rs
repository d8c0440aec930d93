// dvm/src/cli/list.rs
use clap::Args;
use colored::Colorize;
use dvm_common::config::Config;
use dvm_common::error::Result;
use dvm_core::{current_version, list_versions};

#[derive(Args, Debug)]
pub struct List;

impl List {
    pub fn run(&self, config: &Config) -> Result<()> {
        let versions = list_versions(config)?;
        if versions.is_empty() {
            println!("{}", "No versions of deno installed".yellow());
            return Ok(());
        }
        let current = current_version(config);
        for version in &versions {
            println!("{}", format_entry(version, &current));
        }
        Ok(())
    }
}

fn format_entry(version: &str, current: &str) -> String {
    if version == current {
        format!(" * {}", version.green())
    } else {
        format!("   {version}")
    }
}
