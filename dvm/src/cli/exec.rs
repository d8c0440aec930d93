// dvm/src/cli/exec.rs
use std::process;

use clap::Args;
use dvm_common::config::Config;
use dvm_common::error::Result;

#[derive(Args, Debug)]
pub struct ExecArgs {
    /// Installed version to run instead of the active one
    #[arg(long, short = 'd', value_name = "VERSION")]
    pub deno_version: Option<String>,

    /// Arguments passed through to deno
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "ARGS")]
    pub args: Vec<String>,
}

impl ExecArgs {
    pub async fn run(&self, config: &Config) -> Result<()> {
        let status = dvm_core::exec(config, self.deno_version.as_deref(), &self.args).await?;
        if !status.success() {
            process::exit(status.code().unwrap_or(1));
        }
        Ok(())
    }
}
