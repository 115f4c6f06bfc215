//! # Sykle Deploy Handler (`commands::deploy`)
//!
//! File: cli/src/commands/deploy.rs
//! Repository: https://github.com/typecode/sykle
//!
//! ## Overview
//!
//! Implements `syk deploy`: the fixed ship-it sequence against a deployment
//! target. Unlike test batches, deploy aborts on the first failed step — a
//! failed predeploy must never result in pushing or starting a broken build.
//!
//! ## Workflow
//!
//! 1. `predeploy` command batch (prod-build class, deployment vars/env file)
//! 2. `push` the prod-build images
//! 3. Copy the deployment env file to the target as `~/.env`
//! 4. Copy `docker-compose.prod.yml` to the target
//! 5. `pull` on the target (prod class)
//! 6. `up -d` on the target (prod class, preup commands included)
//! 7. `docker system prune -a --force` on the target
//!
use crate::commands::resolve_deployment_name;
use crate::core::error::Result;
use crate::core::orchestrator::Sykle;
use clap::Parser;
use owo_colors::OwoColorize;
use tracing::debug;

/// Arguments for `syk deploy`.
#[derive(Parser, Debug)]
#[command(about = "Deploys and starts the latest builds on the deployment target")]
pub struct DeployArgs {
    /// Uses config for the given deployment
    #[arg(long)]
    pub deployment: Option<String>,
}

pub async fn handle_deploy(args: DeployArgs, sykle: &Sykle) -> Result<()> {
    debug!("Deploy args: {:?}", args);
    let deployment = resolve_deployment_name(args.deployment.as_deref(), sykle.config());
    sykle.deploy(&deployment).await?;
    println!("{}", format!("Deployed \"{deployment}\"").green());
    Ok(())
}
