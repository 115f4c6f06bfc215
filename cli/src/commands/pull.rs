//! # Sykle Pull Handler (`commands::pull`)
//!
//! File: cli/src/commands/pull.rs
//! Repository: https://github.com/typecode/sykle
//!
//! ## Overview
//!
//! Implements `syk pull`: pulls the deployment's images under the `prod`
//! class, routed to the deployment target (the remote host is the one that
//! needs the images at deploy time).
//!
use crate::commands::resolve_deployment_name;
use crate::core::error::Result;
use crate::core::orchestrator::Sykle;
use clap::Parser;
use tracing::debug;

/// Arguments for `syk pull`.
#[derive(Parser, Debug)]
#[command(about = "Pulls images for a deployment (labeled as prod images)")]
pub struct PullArgs {
    /// Uses config for the given deployment
    #[arg(long)]
    pub deployment: Option<String>,
}

pub async fn handle_pull(args: PullArgs, sykle: &Sykle) -> Result<()> {
    debug!("Pull args: {:?}", args);
    let deployment = resolve_deployment_name(args.deployment.as_deref(), sykle.config());
    sykle.pull(&deployment).await
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pull_args_parsing() {
        let args = PullArgs::try_parse_from(["pull"]).unwrap();
        assert!(args.deployment.is_none());
    }
}
