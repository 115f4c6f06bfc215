//! # Sykle SSH Handlers (`commands::ssh`)
//!
//! File: cli/src/commands/ssh.rs
//! Repository: https://github.com/typecode/sykle
//!
//! ## Overview
//!
//! Implements the direct operator paths to a deployment target: `syk ssh`
//! (interactive session), `syk ssh-cp` (copy files to the target), and
//! `syk ssh-exec` (run a command on the target). These are thin passthroughs
//! with the deployment's address; failures surface immediately with the
//! child's own exit code, outside the batch model.
//!
//! ```bash
//! syk ssh                                      # default_deployment
//! syk --deployment prod ssh-cp backup.sql     # to ~ on the target
//! syk ssh-exec -- docker ps
//! ```
//!
use crate::commands::resolve_deployment_name;
use crate::core::error::Result;
use crate::core::orchestrator::Sykle;
use clap::Parser;
use tracing::debug;

/// Arguments for `syk ssh`.
#[derive(Parser, Debug)]
#[command(about = "Connects to the ssh target")]
pub struct SshArgs {
    /// Uses config for the given deployment
    #[arg(long)]
    pub deployment: Option<String>,
}

/// Arguments for `syk ssh-cp`.
#[derive(Parser, Debug)]
#[command(about = "Copies files to the ssh target")]
pub struct SshCpArgs {
    /// Uses config for the given deployment
    #[arg(long)]
    pub deployment: Option<String>,

    /// Destination path on the target
    #[arg(long, default_value = "~")]
    pub dest: String,

    /// Local files to copy
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub input: Vec<String>,
}

/// Arguments for `syk ssh-exec`.
#[derive(Parser, Debug)]
#[command(about = "Executes a command on the ssh target")]
pub struct SshExecArgs {
    /// Uses config for the given deployment
    #[arg(long)]
    pub deployment: Option<String>,

    /// The command to run on the target
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub input: Vec<String>,
}

pub async fn handle_ssh(args: SshArgs, sykle: &Sykle) -> Result<()> {
    debug!("Ssh args: {:?}", args);
    let deployment = resolve_deployment_name(args.deployment.as_deref(), sykle.config());
    sykle.ssh(&deployment).await
}

pub async fn handle_ssh_cp(args: SshCpArgs, sykle: &Sykle) -> Result<()> {
    debug!("SshCp args: {:?}", args);
    let deployment = resolve_deployment_name(args.deployment.as_deref(), sykle.config());
    sykle.ssh_cp(&args.input, &deployment, &args.dest).await
}

pub async fn handle_ssh_exec(args: SshExecArgs, sykle: &Sykle) -> Result<()> {
    debug!("SshExec args: {:?}", args);
    let deployment = resolve_deployment_name(args.deployment.as_deref(), sykle.config());
    sykle.ssh_exec(&args.input, &deployment).await
}
