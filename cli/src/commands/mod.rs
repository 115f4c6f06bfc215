//! # Sykle Command Handlers (`commands`)
//!
//! File: cli/src/commands/mod.rs
//! Repository: https://github.com/typecode/sykle
//!
//! ## Overview
//!
//! One module per CLI operation. Each defines a clap `Args` struct and an
//! async `handle_*` function that resolves arguments against the loaded
//! configuration and delegates to the orchestrator. Handlers stay thin: all
//! sequencing and routing logic lives in `core::orchestrator`.
//!
//! ## Shared pieces
//!
//! - [`DockerTypeArgs`]: the mutually exclusive `--test`/`--prod`/
//!   `--prod-build` class flags, flattened into every command that selects
//!   an environment class (default `dev`).
//! - [`resolve_deployment_name`]: `--deployment` falling back to the
//!   configured `default_deployment`.
//!
use crate::core::config::{ConfigDocument, DockerType};
use clap::Args;

pub mod alias;
pub mod build;
pub mod config;
pub mod dc;
pub mod deploy;
pub mod down;
pub mod init;
pub mod plugins;
pub mod pull;
pub mod push;
pub mod ssh;
pub mod up;

/// Mutually exclusive environment-class flags. Absent flags mean `dev`.
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct DockerTypeArgs {
    /// Run command with the test compose file
    #[arg(long)]
    pub test: bool,

    /// Run command with the prod compose file
    #[arg(long, conflicts_with = "test")]
    pub prod: bool,

    /// Run command with the prod-build compose file
    #[arg(long = "prod-build", conflicts_with_all = ["test", "prod"])]
    pub prod_build: bool,
}

impl DockerTypeArgs {
    pub fn resolve(&self) -> DockerType {
        if self.test {
            DockerType::Test
        } else if self.prod_build {
            DockerType::ProdBuild
        } else if self.prod {
            DockerType::Prod
        } else {
            DockerType::Dev
        }
    }
}

/// `--deployment` with the configured default as fallback.
pub fn resolve_deployment_name(explicit: Option<&str>, config: &ConfigDocument) -> String {
    explicit
        .map(str::to_string)
        .unwrap_or_else(|| config.default_deployment().to_string())
}
