// dvm/src/main.rs
use std::process;

use clap::Parser;
use colored::Colorize;
use dvm_common::config::Config;
use dvm_common::error::Result as DvmResult;
use tokio_util::sync::CancellationToken;
use tracing::level_filters::LevelFilter;
use tracing::{debug, error, warn};
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

mod cli;
mod ui;

use cli::CliArgs;

fn ensure_dvm_root(config: &Config) -> DvmResult<()> {
    let root = config.dvm_root();
    if root.exists() {
        return Ok(());
    }
    println!("Creating {}", root.display());
    dvm_aio::fs::create_install_dir(root)
}

fn init_logging(config: &Config, verbose: u8) {
    let level_filter = match verbose {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let max_log_level = level_filter.into_level().unwrap_or(tracing::Level::INFO);

    let env_filter = EnvFilter::builder()
        .with_default_directive(level_filter.into())
        .with_env_var("DVM_LOG")
        .from_env_lossy();

    if verbose == 0 {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .without_time()
            .with_target(false)
            .try_init();
        return;
    }

    let log_dir = config.logs_dir();
    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        eprintln!(
            "{} Failed to create log directory {}: {}",
            "Warning:".yellow(),
            log_dir.display(),
            e
        );
        let _ = tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .without_time()
            .try_init();
        return;
    }

    let file_appender = tracing_appender::rolling::daily(&log_dir, "dvm.log");
    let (non_blocking_appender, guard) = tracing_appender::non_blocking(file_appender);
    let stderr_writer = std::io::stderr.with_max_level(max_log_level);
    let file_writer = non_blocking_appender.with_max_level(max_log_level);

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(stderr_writer.and(file_writer))
        .with_ansi(true)
        .without_time()
        .try_init();

    // The non-blocking writer flushes only while the guard lives.
    Box::leak(Box::new(guard));

    debug!(
        "Verbose logging enabled. Writing logs to: {}/dvm.log",
        log_dir.display()
    );
}

/// First Ctrl-C cancels the running download; a second one exits immediately.
async fn handle_interrupts(cancel: CancellationToken) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        debug!("Could not listen for Ctrl-C: {}", e);
        return;
    }
    warn!("Interrupted, stopping. Press Ctrl-C again to exit now");
    cancel.cancel();

    if tokio::signal::ctrl_c().await.is_ok() {
        eprintln!("{}: interrupted", "Error".red().bold());
        process::exit(130);
    }
}

#[tokio::main]
async fn main() -> DvmResult<()> {
    let cli_args = CliArgs::parse();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            process::exit(1);
        }
    };

    if let Err(e) = ensure_dvm_root(&config) {
        eprintln!("{}: {:#}", "Error".red().bold(), e);
        process::exit(1);
    }

    init_logging(&config, cli_args.verbose);

    let cancel = CancellationToken::new();
    tokio::spawn(handle_interrupts(cancel.clone()));

    if let Err(e) = cli_args.command.run(&config, &cancel).await {
        error!("Command failed: {:#}", e);
        eprintln!("{}: {:#}", "Error".red().bold(), e);
        process::exit(1);
    }

    debug!("Command completed successfully.");
    Ok(())
}
