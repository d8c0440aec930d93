// dvm/src/cli/use_.rs
use clap::Args;
use colored::Colorize;
use dvm_common::config::Config;
use dvm_common::error::Result;
use dvm_core::{activate, current_version};

#[derive(Args, Debug)]
pub struct UseArgs {
    /// Version to activate, e.g. 1.10.0 or v1.10.0. Omit to show the current one
    #[arg(value_name = "VERSION")]
    pub target: Option<String>,
}

impl UseArgs {
    pub async fn run(&self, config: &Config) -> Result<()> {
        if let Some(version) = &self.target {
            let activation = activate(config, version).await?;
            println!("now use {}", activation.version.green());
            return Ok(());
        }

        let current = current_version(config);
        if current.is_empty() {
            println!("There does not seem to install any version of deno.");
            println!("please use `dvm install <version>` to install.");
            return Ok(());
        }
        println!("current version is {}.\n", current.bold());
        println!("Switch to another version using `dvm use <version>`");
        println!("List all installed versions using `dvm list`");
        Ok(())
    }
}
