//! # Sykle Push Handler (`commands::push`)
//!
//! File: cli/src/commands/push.rs
//! Repository: https://github.com/typecode/sykle
//!
//! ## Overview
//!
//! Implements `syk push`: pushes the images built from
//! `docker-compose.prod-build.yml`, with the deployment's resolved
//! `docker_vars` in scope (image names and tags usually come from them).
//!
use crate::commands::resolve_deployment_name;
use crate::core::error::Result;
use crate::core::orchestrator::Sykle;
use clap::Parser;
use tracing::debug;

/// Arguments for `syk push`.
#[derive(Parser, Debug)]
#[command(about = "Pushes images using \"docker-compose.prod-build.yml\"")]
pub struct PushArgs {
    /// Uses config for the given deployment
    #[arg(long)]
    pub deployment: Option<String>,
}

pub async fn handle_push(args: PushArgs, sykle: &Sykle) -> Result<()> {
    debug!("Push args: {:?}", args);
    let deployment = resolve_deployment_name(args.deployment.as_deref(), sykle.config());
    sykle.push(&deployment).await
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_args_parsing() {
        let args = PushArgs::try_parse_from(["push", "--deployment", "prod"]).unwrap();
        assert_eq!(args.deployment.as_deref(), Some("prod"));
    }
}
