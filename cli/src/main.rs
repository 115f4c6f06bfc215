//! # Sykle Main Entry Point
//!
//! File: cli/src/main.rs
//! Repository: https://github.com/typecode/sykle
//!
//! ## Overview
//!
//! This file serves as the main entry point for the `syk` CLI. It handles:
//! - Command-line argument parsing using Clap
//! - Setting up the logging system based on the `--debug` flag
//! - Loading the `.sykle.json` configuration and constructing the
//!   orchestrator for commands that need it
//! - Routing execution to the appropriate command handlers, including the
//!   alias/plugin fallback for unrecognized subcommands
//! - Turning errors into short colored diagnostics and a process exit code
//!
//! ## Exit codes
//!
//! - `0` — success
//! - child's own exit code — a single command failed outside a batch
//! - `1` — batch aggregate failure, configuration or resolution error
//! - `130` — operator cancelled (Ctrl-C); reported distinctly from failures
//!
use clap::Parser;
use owo_colors::OwoColorize;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

mod commands; // Command handlers (build, up, deploy, ...).
mod common; // Shared execution machinery (process, compose, batch).
mod core; // Core infrastructure (config, errors, orchestrator).
mod plugins; // Plugin trait and registry.

use crate::core::config::{ConfigDocument, CONFIG_FILENAME};
use crate::core::error::{Result, SykleError};
use crate::core::orchestrator::Sykle;

/// Defines the top-level command-line arguments structure using Clap's
/// derive macros.
#[derive(Parser, Debug)]
#[command(
    name = "syk",
    about = "Orchestrates docker-compose workflows, SSH deployment, and project aliases",
    long_about = "Wraps docker-compose, ssh/scp deployment, test suites, and command aliases\n\
                  behind one command surface driven by a versioned .sykle.json config.",
    propagate_version = true,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Prints composed command lines and full batch failure reports
    #[arg(long, global = true)]
    debug: bool,

    /// Specify the JSON config file (defaults to ./.sykle.json)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<String>,
}

/// Enum defining all available subcommands. Anything unrecognized falls
/// through to alias/plugin dispatch.
#[derive(clap::Subcommand, Debug)]
enum Commands {
    Dc(commands::dc::DcArgs),
    #[command(alias = "dc_run")]
    DcRun(commands::dc::DcRunArgs),
    #[command(alias = "dc_exec")]
    DcExec(commands::dc::DcExecArgs),
    Build(commands::build::BuildArgs),
    Up(commands::up::UpArgs),
    Down(commands::down::DownArgs),
    Unittest(commands::test::UnittestArgs),
    E2e(commands::test::E2eArgs),
    Push(commands::push::PushArgs),
    Pull(commands::pull::PullArgs),
    Ssh(commands::ssh::SshArgs),
    #[command(alias = "ssh_cp")]
    SshCp(commands::ssh::SshCpArgs),
    #[command(alias = "ssh_exec")]
    SshExec(commands::ssh::SshExecArgs),
    Deploy(commands::deploy::DeployArgs),
    Init(commands::init::InitArgs),
    Plugins(commands::plugins::PluginsArgs),
    Config(commands::config::ConfigArgs),
    // Alias or plugin name with its arguments.
    #[command(external_subcommand)]
    Other(Vec<String>),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_level = if cli.debug { "debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    let debug = cli.debug;
    if let Err(err) = run(cli).await {
        std::process::exit(report_error(&err, debug));
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        // Commands that work without a config document.
        Commands::Init(args) => commands::init::handle_init(args),
        Commands::Plugins(args) => commands::plugins::handle_plugins(args),
        Commands::Config(args) => commands::config::handle_config(args),

        // Everything else resolves against a freshly loaded document.
        command => {
            let path = config_path(cli.config.as_deref());
            let config = ConfigDocument::load(&path)?;
            let sykle = Sykle::new(config, cli.debug);
            match command {
                Commands::Dc(args) => commands::dc::handle_dc(args, &sykle).await,
                Commands::DcRun(args) => commands::dc::handle_dc_run(args, &sykle).await,
                Commands::DcExec(args) => commands::dc::handle_dc_exec(args, &sykle).await,
                Commands::Build(args) => commands::build::handle_build(args, &sykle).await,
                Commands::Up(args) => commands::up::handle_up(args, &sykle).await,
                Commands::Down(args) => commands::down::handle_down(args, &sykle).await,
                Commands::Unittest(args) => commands::test::handle_unittest(args, &sykle).await,
                Commands::E2e(args) => commands::test::handle_e2e(args, &sykle).await,
                Commands::Push(args) => commands::push::handle_push(args, &sykle).await,
                Commands::Pull(args) => commands::pull::handle_pull(args, &sykle).await,
                Commands::Ssh(args) => commands::ssh::handle_ssh(args, &sykle).await,
                Commands::SshCp(args) => commands::ssh::handle_ssh_cp(args, &sykle).await,
                Commands::SshExec(args) => commands::ssh::handle_ssh_exec(args, &sykle).await,
                Commands::Deploy(args) => commands::deploy::handle_deploy(args, &sykle).await,
                Commands::Other(tokens) => {
                    commands::alias::handle_fallback(&tokens, &sykle).await
                }
                Commands::Init(_) | Commands::Plugins(_) | Commands::Config(_) => {
                    unreachable!()
                }
            }
        }
    }
}

fn config_path(explicit: Option<&str>) -> PathBuf {
    match explicit {
        Some(path) => PathBuf::from(shellexpand::tilde(path).into_owned()),
        None => PathBuf::from(CONFIG_FILENAME),
    }
}

/// Renders an error as a short colored diagnostic and picks the process
/// exit code. Raw backtrace-style context only appears in debug mode.
fn report_error(err: &anyhow::Error, debug: bool) -> i32 {
    match err.downcast_ref::<SykleError>() {
        // Cancellation is an operator action, not a failure report.
        Some(SykleError::Cancelled) => {
            eprintln!("{}", "Cancelled".yellow());
            130
        }
        // A single failed command exits with the child's own code.
        Some(SykleError::NonZeroExit { code, .. }) => {
            eprintln!("{}", format!("Error: {err}").red());
            *code
        }
        Some(SykleError::BatchFailed { failures }) => {
            if debug {
                eprintln!("{}", format!("{} command(s) failed:", failures.len()).red());
                for failure in failures {
                    eprintln!(
                        "{}",
                        format!("  exit {}: {}", failure.code, failure.command).red()
                    );
                }
            } else {
                eprintln!("{}", format!("Error: {err}").red());
            }
            1
        }
        _ => {
            eprintln!("{}", format!("Error: {err}").red());
            if debug {
                eprintln!("{err:?}");
            }
            1
        }
    }
}

// --- Basic Integration Tests ---
#[cfg(test)]
mod tests {
    use assert_cmd::Command;
    use predicates::prelude::*;

    fn syk_cmd() -> Command {
        Command::cargo_bin("syk").expect("Failed to find syk binary for testing")
    }

    #[test]
    fn test_main_help_flag() {
        syk_cmd().arg("--help").assert().success();
    }

    #[test]
    fn test_main_version_flag() {
        syk_cmd()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    }
}
