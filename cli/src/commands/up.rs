//! # Sykle Up Handler (`commands::up`)
//!
//! File: cli/src/commands/up.rs
//! Repository: https://github.com/typecode/sykle
//!
//! ## Overview
//!
//! Implements `syk up`: runs the configured `preup` command batch, then
//! issues `up --build --force-recreate` against the selected environment
//! class. A `--deployment` forces the prod class and routes to the target;
//! this is how `syk deploy` starts the remote stack.
//!
use crate::commands::DockerTypeArgs;
use crate::core::error::Result;
use crate::core::orchestrator::Sykle;
use clap::Parser;
use tracing::debug;

/// Arguments for `syk up`.
#[derive(Parser, Debug)]
#[command(about = "Starts docker-compose services (preup commands first)")]
pub struct UpArgs {
    #[command(flatten)]
    pub docker: DockerTypeArgs,

    /// Uses config for the given deployment (forces the prod class)
    #[arg(long)]
    pub deployment: Option<String>,
}

pub async fn handle_up(args: UpArgs, sykle: &Sykle) -> Result<()> {
    debug!("Up args: {:?}", args);
    sykle
        .up(&[], args.docker.resolve(), args.deployment.as_deref())
        .await
}
