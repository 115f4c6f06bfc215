//! # Sykle Compose Passthrough Handlers (`commands::dc`)
//!
//! File: cli/src/commands/dc.rs
//! Repository: https://github.com/typecode/sykle
//!
//! ## Overview
//!
//! Implements the `syk dc`, `syk dc-run`, and `syk dc-exec` subcommands: the
//! raw compose passthrough and its run/exec conveniences. These exist so the
//! operator never has to remember which compose file and project name an
//! environment class maps to:
//!
//! ```bash
//! # Arbitrary compose command against the test stack
//! syk --test dc ps
//!
//! # One-off command in a fresh container for the default service
//! syk dc-run django-admin migrate
//!
//! # Command inside the already-running container of a named service
//! syk --service node dc-exec npm ls
//!
//! # Validate deployment settings without touching the remote host
//! syk --deployment staging --local-test dc config
//! ```
//!
use crate::commands::DockerTypeArgs;
use crate::core::error::Result;
use crate::core::orchestrator::Sykle;
use clap::Parser;
use tracing::debug;

/// Arguments for `syk dc`.
#[derive(Parser, Debug)]
#[command(about = "Runs a docker-compose command with the correct file and project")]
pub struct DcArgs {
    #[command(flatten)]
    pub docker: DockerTypeArgs,

    /// Uses config for the given deployment (forces the prod class)
    #[arg(long)]
    pub deployment: Option<String>,

    /// Honor deployment config but keep execution local (dry-run validation)
    #[arg(long, requires = "deployment")]
    pub local_test: bool,

    /// Tokens passed to docker-compose verbatim
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub input: Vec<String>,
}

/// Arguments for `syk dc-run`.
#[derive(Parser, Debug)]
#[command(about = "Spins up and runs a command on a docker-compose service")]
pub struct DcRunArgs {
    #[command(flatten)]
    pub docker: DockerTypeArgs,

    /// Docker service on which to run the command (default_service if omitted)
    #[arg(long)]
    pub service: Option<String>,

    /// Env file whose pairs are injected as -e flags
    #[arg(long, value_name = "ENV_FILE")]
    pub env: Option<String>,

    /// The command to run inside the fresh container
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub input: Vec<String>,
}

/// Arguments for `syk dc-exec`.
#[derive(Parser, Debug)]
#[command(about = "Runs a command on an existing docker-compose container")]
pub struct DcExecArgs {
    #[command(flatten)]
    pub docker: DockerTypeArgs,

    /// Docker service on which to run the command (default_service if omitted)
    #[arg(long)]
    pub service: Option<String>,

    /// The command to run inside the running container
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub input: Vec<String>,
}

pub async fn handle_dc(args: DcArgs, sykle: &Sykle) -> Result<()> {
    debug!("Dc args: {:?}", args);
    sykle
        .dc(
            &args.input,
            args.docker.resolve(),
            args.deployment.as_deref(),
            args.local_test,
        )
        .await
}

pub async fn handle_dc_run(args: DcRunArgs, sykle: &Sykle) -> Result<()> {
    debug!("DcRun args: {:?}", args);
    let service = args
        .service
        .clone()
        .unwrap_or_else(|| sykle.config().default_service().to_string());
    sykle
        .dc_run(
            &args.input,
            &service,
            args.docker.resolve(),
            None,
            args.env.as_deref(),
        )
        .await
}

pub async fn handle_dc_exec(args: DcExecArgs, sykle: &Sykle) -> Result<()> {
    debug!("DcExec args: {:?}", args);
    let service = args
        .service
        .clone()
        .unwrap_or_else(|| sykle.config().default_service().to_string());
    sykle
        .dc_exec(&args.input, &service, args.docker.resolve(), None)
        .await
}

// --- Unit Tests ---
// Argument parsing only; the handlers delegate straight to the orchestrator.
#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::DockerType;

    #[test]
    fn test_dc_args_parsing() {
        let args = DcArgs::try_parse_from(["dc", "--test", "ps", "-a"]).unwrap();
        assert_eq!(args.docker.resolve(), DockerType::Test);
        assert_eq!(args.input, vec!["ps", "-a"]);
        assert!(!args.local_test);
    }

    #[test]
    fn test_dc_local_test_requires_deployment() {
        assert!(DcArgs::try_parse_from(["dc", "--local-test", "config"]).is_err());
        let args =
            DcArgs::try_parse_from(["dc", "--deployment", "staging", "--local-test", "config"])
                .unwrap();
        assert!(args.local_test);
        assert_eq!(args.deployment.as_deref(), Some("staging"));
    }

    #[test]
    fn test_dc_run_args_parsing() {
        let args = DcRunArgs::try_parse_from([
            "dc-run",
            "--service",
            "django",
            "--env",
            ".env.local",
            "django-admin",
            "migrate",
        ])
        .unwrap();
        assert_eq!(args.service.as_deref(), Some("django"));
        assert_eq!(args.env.as_deref(), Some(".env.local"));
        assert_eq!(args.input, vec!["django-admin", "migrate"]);
    }

    #[test]
    fn test_dc_exec_conflicting_class_flags_rejected() {
        assert!(DcExecArgs::try_parse_from(["dc-exec", "--test", "--prod", "ls"]).is_err());
    }
}
