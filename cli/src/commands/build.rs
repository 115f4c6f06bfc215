//! # Sykle Build Handler (`commands::build`)
//!
//! File: cli/src/commands/build.rs
//! Repository: https://github.com/typecode/sykle
//!
//! ## Overview
//!
//! Implements `syk build`. The one wrinkle is the prod coupling: images that
//! get deployed are always built through the `prod-build` compose file with
//! the deployment's variables, so `--prod` selects the build-variant file
//! and resolves a deployment. For dev/test builds a `--deployment` flag is
//! meaningless; it draws a usage warning and is ignored rather than
//! rejected.
//!
//! ```bash
//! syk build                       # dev images
//! syk --test build                # test images
//! syk --prod build                # prod images via docker-compose.prod-build.yml,
//!                                 # default_deployment's docker_vars
//! syk --prod --deployment prod build
//! ```
//!
use crate::commands::{resolve_deployment_name, DockerTypeArgs};
use crate::core::config::DockerType;
use crate::core::error::Result;
use crate::core::orchestrator::Sykle;
use clap::Parser;
use owo_colors::OwoColorize;
use tracing::debug;

/// Arguments for `syk build`.
#[derive(Parser, Debug)]
#[command(about = "Builds docker-compose images")]
pub struct BuildArgs {
    #[command(flatten)]
    pub docker: DockerTypeArgs,

    /// Uses docker_vars of the given deployment (prod builds only)
    #[arg(long)]
    pub deployment: Option<String>,
}

pub async fn handle_build(args: BuildArgs, sykle: &Sykle) -> Result<()> {
    debug!("Build args: {:?}", args);
    let docker_type = args.docker.resolve();

    let deployment = if docker_type == DockerType::Prod {
        Some(resolve_deployment_name(
            args.deployment.as_deref(),
            sykle.config(),
        ))
    } else {
        if args.deployment.is_some() {
            eprintln!(
                "{}",
                "No --prod flag found, ignoring --deployment option".yellow()
            );
        }
        None
    };

    sykle.build(&[], docker_type, deployment.as_deref()).await
}
