// dvm/src/cli.rs
//! Defines the command-line argument structure using clap.
use clap::{ArgAction, Parser, Subcommand};
use dvm_common::error::Result;
use dvm_common::Config;
use tokio_util::sync::CancellationToken;

pub mod arch;
pub mod clean;
pub mod exec;
pub mod info;
pub mod install;
pub mod list;
pub mod registry;
pub mod use_;

use crate::cli::arch::Arch;
use crate::cli::clean::Clean;
use crate::cli::exec::ExecArgs;
use crate::cli::info::Info;
use crate::cli::install::InstallArgs;
use crate::cli::list::List;
use crate::cli::registry::Registry;
use crate::cli::use_::UseArgs;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, name = "dvm", bin_name = "dvm")]
#[command(propagate_version = true, arg_required_else_help = true)]
pub struct CliArgs {
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the OS and architecture dvm downloads for
    Arch(Arch),
    /// List all installed versions
    List(List),
    /// Install deno <version>
    Install(InstallArgs),
    /// Switch to the specified version, or show the current one
    Use(UseArgs),
    /// Show dvm and deno versions and the paths dvm manages
    Info(Info),
    /// Show the known download registries
    Registry(Registry),
    /// Run a deno version without switching to it
    Exec(ExecArgs),
    /// Remove cached archives and interrupted downloads
    Clean(Clean),
}

impl Command {
    pub async fn run(&self, config: &Config, cancel: &CancellationToken) -> Result<()> {
        match self {
            Self::Arch(command) => command.run(),
            Self::List(command) => command.run(config),
            Self::Install(command) => command.run(config, cancel).await,
            Self::Use(command) => command.run(config).await,
            Self::Info(command) => command.run(config),
            Self::Registry(command) => command.run(config),
            Self::Exec(command) => command.run(config).await,
            Self::Clean(command) => command.run(config),
        }
    }
}
