// dvm/src/cli/install.rs
use clap::Args;
use colored::Colorize;
use dvm_common::config::Config;
use dvm_common::error::Result;
use dvm_core::{install, InstallOptions};
use tokio_util::sync::CancellationToken;
use tracing::instrument;

use crate::ui;

#[derive(Debug, Args)]
pub struct InstallArgs {
    /// Version to install, e.g. 1.10.0 or v1.10.0
    #[arg(value_name = "VERSION")]
    pub target: String,

    /// Registry to download from (see `dvm registry`)
    #[arg(long)]
    pub registry: Option<String>,

    /// Install without switching to the new version
    #[arg(long)]
    pub no_use: bool,
}

impl InstallArgs {
    #[instrument(skip(self, config, cancel), fields(version = %self.target))]
    pub async fn run(&self, config: &Config, cancel: &CancellationToken) -> Result<()> {
        let client = dvm_net::build_http_client()?;
        let options = InstallOptions {
            registry: self.registry.clone(),
            activate: !self.no_use,
        };
        let (progress, bar) = ui::download_progress();

        let result = install(
            config,
            &client,
            &self.target,
            &options,
            Some(&progress),
            cancel,
        )
        .await;
        bar.finish_and_clear();
        let outcome = result?;

        match outcome.activation {
            Some(activation) => println!("now use {}", activation.version.green()),
            None => println!(
                "Installed deno {}. Run `dvm use {}` to switch to it.",
                outcome.version.green(),
                outcome.version
            ),
        }
        Ok(())
    }
}
