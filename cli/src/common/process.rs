//! # Sykle Process Execution Utilities (`common::process`)
//!
//! File: cli/src/common/process.rs
//! Repository: https://github.com/typecode/sykle
//!
//! ## Overview
//!
//! This module executes one subprocess at a time on behalf of the
//! orchestrator: locally, or on a deployment target over ssh. It is the only
//! place in the codebase that spawns children, so quoting, environment
//! merging, remote wrapping, debug echo, cancellation, and exit-status
//! mapping all live here.
//!
//! ## Architecture
//!
//! - **Command construction:** the final command is a single
//!   shell-interpretable string run through `sh -c`. Remote execution needs a
//!   single command string for the ssh transport, and inline `KEY=VALUE`
//!   assignments are easiest expressed that way, so local execution uses the
//!   same shape. Callers pass raw tokens and never pre-escape; this module
//!   owns quoting and joining.
//! - **Environment overlay:** overlay values arrive already interpolated
//!   against the *local* process environment (deployment resolution owns
//!   that step). Locally they are merged over the inherited environment
//!   (overlay wins); remotely they become inline `KEY=VALUE` prefixes on the
//!   remote command line, since there is no remote process environment to
//!   merge into from here.
//! - **Remote routing:** `ssh -o StrictHostKeyChecking=no <target> <cmd>`.
//!   Host-key prompts are disabled for automation convenience; this is a
//!   documented trust-on-first-use posture, not a hardened default.
//! - **Cancellation:** Ctrl-C while a child runs waits for the child to
//!   finish its own interrupt handling (the child is never orphaned or
//!   hard-killed) and then surfaces the distinguished `Cancelled` error, so
//!   callers can tell "operator cancelled" from "command failed".
//! - **Failure:** a non-zero exit becomes `NonZeroExit { code, command }`
//!   carrying the exact command string for diagnostic replay.
//!
use crate::core::error::{Result, SykleError};
use crate::core::interpolate::ResolvedVars;
use anyhow::Context;
use tracing::debug;

/// Fixed ssh/scp options: never stop for an interactive host-key prompt.
pub const SSH_OPTIONS: [&str; 2] = ["-o", "StrictHostKeyChecking=no"];

/// Executes subprocesses for the orchestrator. Cheap to copy around; the
/// only state is the debug flag controlling command echo.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner {
    debug: bool,
}

impl ProcessRunner {
    pub fn new(debug: bool) -> Self {
        ProcessRunner { debug }
    }

    /// Runs `command` to completion and maps its exit status.
    ///
    /// - `env`: optional overlay, already interpolated against the local
    ///   environment by the caller (resolution happens where the deployment
    ///   is resolved for use, never here).
    /// - `target`: optional ssh address; when set the command runs remotely.
    pub async fn run(
        &self,
        command: &[String],
        env: Option<&ResolvedVars>,
        target: Option<&str>,
    ) -> Result<()> {
        let full_command = build_command_line(command, env, target);

        if self.debug {
            println!("--BEGIN COMMAND--");
            println!("COMMAND: {full_command}");
            if let Some(overlay) = env {
                println!("ENV: {overlay:?}");
            }
            println!("--END COMMAND--");
        }
        debug!(command = %full_command, remote = target.is_some(), "spawning");

        let mut child = tokio::process::Command::new("sh");
        child.arg("-c").arg(&full_command);
        if target.is_none() {
            if let Some(overlay) = env {
                // Full inherited environment plus the overlay; overlay wins
                // on collision.
                child.envs(overlay);
            }
        }

        let mut child = child
            .spawn()
            .with_context(|| format!("Failed to spawn: {full_command}"))?;

        let status = tokio::select! {
            status = child.wait() => {
                status.with_context(|| format!("Failed to wait on: {full_command}"))?
            }
            _ = tokio::signal::ctrl_c() => {
                // The child shares the terminal's process group and received
                // the same interrupt; let it finish its own handling before
                // reporting the cancellation.
                let _ = child.wait().await;
                return Err(SykleError::Cancelled.into());
            }
        };

        if status.success() {
            Ok(())
        } else {
            Err(SykleError::NonZeroExit {
                code: status.code().unwrap_or(1),
                command: full_command,
            }
            .into())
        }
    }
}

/// Builds the single shell-interpretable command string.
///
/// Local: the tokens, quoted as needed and joined. Remote: the overlay as
/// inline `KEY=VALUE` prefixes, then the tokens, all wrapped in an ssh
/// invocation of the target.
pub fn build_command_line(
    command: &[String],
    overlay: Option<&ResolvedVars>,
    target: Option<&str>,
) -> String {
    let mut parts: Vec<String> = Vec::new();
    if let Some(target) = target {
        parts.push("ssh".to_string());
        parts.extend(SSH_OPTIONS.iter().map(|s| s.to_string()));
        parts.push(target.to_string());
        if let Some(overlay) = overlay {
            for (key, value) in overlay {
                parts.push(format!("{}={}", key, shell_quote(value)));
            }
        }
    }
    parts.extend(command.iter().map(|token| shell_quote(token)));
    parts.join(" ")
}

/// Quotes a token for the shell when it needs it; plain tokens pass through
/// so composed command lines stay readable in debug output.
pub fn shell_quote(token: &str) -> String {
    let plain = !token.is_empty()
        && token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:=@$~*".contains(c));
    if plain {
        token.to_string()
    } else {
        format!("'{}'", token.replace('\'', "'\\''"))
    }
}
