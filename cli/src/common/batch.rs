//! # Sykle Batch Execution (`common::batch`)
//!
//! File: cli/src/common/batch.rs
//! Repository: https://github.com/typecode/sykle
//!
//! ## Overview
//!
//! Runs an ordered list of resolved commands — a test suite, a predeploy
//! pipeline, a preup hook list — sequentially, routing each through compose
//! (when it names a service) or straight to the process runner (bare shell
//! command), and aggregating failures across the whole batch.
//!
//! ## Failure policy
//!
//! A non-zero exit from one command is captured, not raised: the batch runs
//! to completion so that, say, a failing django suite does not hide a
//! failing node suite in the same pass. After the last command, any captured
//! failures surface as a single `BatchFailed` aggregate in original order.
//!
//! Cancellation is different: an operator interrupt aborts the batch
//! immediately and propagates, as does any error that is not a plain
//! non-zero exit (spawn failure, unreadable env file).
//!
use crate::core::config::{CommandSpec, DockerType};
use crate::core::error::{CommandFailure, Result, SykleError};
use crate::core::interpolate::ResolvedVars;
use crate::core::orchestrator::Sykle;
use tracing::{debug, warn};

/// Environment variable naming the active deployment inside routed commands.
pub const DEPLOYMENT_ENV_VAR: &str = "DEPLOYMENT";

/// Shared context for one batch run.
#[derive(Debug, Clone, Default)]
pub struct BatchContext {
    /// Overrides every command's own environment class when set (test suites
    /// force `test`, predeploy forces `prod-build`).
    pub docker_type: Option<DockerType>,
    /// Deployment whose settings apply to routed commands. Also injected as
    /// `DEPLOYMENT=<name>` so commands can self-identify.
    pub deployment: Option<String>,
    /// Force `exec` semantics regardless of each command's `use_exec` (fast
    /// test runs against an already-running stack).
    pub force_exec: bool,
    /// Operator-supplied tokens appended to every command in the batch.
    pub extra_input: Vec<String>,
}

/// Runs `commands` in strict list order. Sequential on purpose: later steps
/// depend on earlier ones having completed (asset build before
/// collect-static before push).
pub async fn run_batch(
    sykle: &Sykle,
    commands: &[CommandSpec],
    ctx: &BatchContext,
) -> Result<()> {
    let mut failures: Vec<CommandFailure> = Vec::new();

    for command in commands {
        let mut input = command.input.clone();
        input.extend(ctx.extra_input.iter().cloned());

        let outcome = match &command.service {
            Some(service) => {
                let docker_type = ctx.docker_type.unwrap_or(command.docker_type);
                if ctx.force_exec || command.use_exec {
                    sykle
                        .dc_exec(&input, service, docker_type, ctx.deployment.as_deref())
                        .await
                } else {
                    sykle
                        .dc_run(
                            &input,
                            service,
                            docker_type,
                            ctx.deployment.as_deref(),
                            command.env_file.as_deref(),
                        )
                        .await
                }
            }
            // No service: a bare subprocess, never routed through compose.
            None => {
                let overlay = bare_command_overlay(ctx);
                sykle.runner().run(&input, overlay.as_ref(), None).await
            }
        };

        if let Err(err) = outcome {
            match err.downcast::<SykleError>() {
                Ok(SykleError::NonZeroExit { code, command }) => {
                    warn!(command = %command, code, "batch command failed; continuing");
                    failures.push(CommandFailure { command, code });
                }
                // Cancellation (and anything that is not a plain non-zero
                // exit) stops the batch cold.
                Ok(other) => return Err(other.into()),
                Err(err) => return Err(err),
            }
        }
    }

    if failures.is_empty() {
        debug!(count = commands.len(), "batch completed cleanly");
        Ok(())
    } else {
        Err(SykleError::BatchFailed { failures }.into())
    }
}

fn bare_command_overlay(ctx: &BatchContext) -> Option<ResolvedVars> {
    ctx.deployment.as_ref().map(|name| {
        let mut overlay = ResolvedVars::new();
        overlay.insert(DEPLOYMENT_ENV_VAR.to_string(), name.clone());
        overlay
    })
}

// --- Unit Tests ---
// Batch routing through compose needs a docker-compose binary, so these
// tests exercise bare commands, which spawn real `sh` children.
#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ConfigDocument;

    fn test_config() -> ConfigDocument {
        serde_json::from_str(
            r#"{
                "version": 2,
                "project_name": "batch-test",
                "default_service": "web",
                "default_deployment": "staging",
                "deployments": {"staging": {"target": "user@host"}}
            }"#,
        )
        .unwrap()
    }

    fn bare(command: &str) -> CommandSpec {
        CommandSpec {
            service: None,
            input: command.split_whitespace().map(str::to_string).collect(),
            docker_type: DockerType::Dev,
            use_exec: false,
            env_file: None,
        }
    }

    #[tokio::test]
    async fn test_batch_success() {
        let sykle = Sykle::new(test_config(), false);
        let commands = vec![bare("true"), bare("true")];
        run_batch(&sykle, &commands, &BatchContext::default())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_batch_attempts_every_command_and_aggregates_in_order() {
        let sykle = Sykle::new(test_config(), false);
        // Failures at positions 1 and 3; all four must be attempted.
        let commands = vec![
            bare("true"),
            bare("sh -c exit_1_stand_in"), // unknown command: non-zero exit
            bare("true"),
            bare("false"),
        ];
        let err = run_batch(&sykle, &commands, &BatchContext::default())
            .await
            .unwrap_err();
        match err.downcast::<SykleError>().unwrap() {
            SykleError::BatchFailed { failures } => {
                assert_eq!(failures.len(), 2);
                assert!(failures[0].command.contains("exit_1_stand_in"));
                assert_eq!(failures[1].command, "false");
            }
            other => panic!("expected BatchFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_batch_appends_extra_input_to_every_command() {
        let sykle = Sykle::new(test_config(), false);
        // `true` ignores arguments; appending must not break the command.
        let commands = vec![bare("true"), bare("true")];
        let ctx = BatchContext {
            extra_input: vec!["--flag".to_string()],
            ..Default::default()
        };
        run_batch(&sykle, &commands, &ctx).await.unwrap();
    }

    #[tokio::test]
    async fn test_batch_injects_deployment_env_for_bare_commands() {
        let sykle = Sykle::new(test_config(), false);
        // The overlay reaches the child: the command itself checks $DEPLOYMENT.
        let check = CommandSpec {
            service: None,
            input: vec![
                "sh".to_string(),
                "-c".to_string(),
                "test \"$DEPLOYMENT\" = staging".to_string(),
            ],
            docker_type: DockerType::Dev,
            use_exec: false,
            env_file: None,
        };
        let ctx = BatchContext {
            deployment: Some("staging".to_string()),
            ..Default::default()
        };
        run_batch(&sykle, &[check], &ctx).await.unwrap();
    }
}
