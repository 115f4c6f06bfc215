//! # Sykle Down Handler (`commands::down`)
//!
//! File: cli/src/commands/down.rs
//! Repository: https://github.com/typecode/sykle
//!
//! ## Overview
//!
//! Implements `syk down`: compose `down` against the selected environment
//! class, with the same deployment routing rules as `up`.
//!
use crate::commands::DockerTypeArgs;
use crate::core::error::Result;
use crate::core::orchestrator::Sykle;
use clap::Parser;
use tracing::debug;

/// Arguments for `syk down`.
#[derive(Parser, Debug)]
#[command(about = "Stops docker-compose services")]
pub struct DownArgs {
    #[command(flatten)]
    pub docker: DockerTypeArgs,

    /// Uses config for the given deployment (forces the prod class)
    #[arg(long)]
    pub deployment: Option<String>,
}

pub async fn handle_down(args: DownArgs, sykle: &Sykle) -> Result<()> {
    debug!("Down args: {:?}", args);
    sykle
        .down(&[], args.docker.resolve(), args.deployment.as_deref())
        .await
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::DockerType;

    #[test]
    fn test_down_args_parsing() {
        let args = DownArgs::try_parse_from(["down", "--prod"]).unwrap();
        assert_eq!(args.docker.resolve(), DockerType::Prod);
    }
}
