//! # Sykle Orchestrator
//!
//! File: cli/src/core/orchestrator.rs
//! Repository: https://github.com/typecode/sykle
//!
//! ## Overview
//!
//! The `Sykle` façade composes configuration resolution, compose invocation,
//! bare subprocess execution, and batch sequencing into the operations the
//! CLI (and plugins) consume: build, up, down, test suites, push/pull,
//! deploy, ssh passthrough, and alias execution.
//!
//! ## Architecture
//!
//! Every compose-routed operation funnels through [`Sykle::dc`], which
//! evaluates the one rule coupling deployments to environment classes:
//! a deployment implies the `prod` class and remote routing to its target,
//! except under the `prod-build` class (image builds happen locally) or in
//! local-test mode (deployment settings honored, execution stays local).
//! Keeping that rule in a single method means build/up/down/push/pull/deploy
//! cannot drift apart in how they interpret `--deployment`.
//!
//! Sequencing state lives nowhere but the call stack: each operation is a
//! plain sequence of awaited steps, and a failed step leaves no persistent
//! state behind beyond whatever the already-executed subprocesses did.
//!
use crate::common::batch::{self, BatchContext};
use crate::common::compose::ComposeInvoker;
use crate::common::envfile;
use crate::common::process::{ProcessRunner, SSH_OPTIONS};
use crate::core::config::{self, ConfigDocument, DockerType};
use crate::core::error::Result;
use crate::core::interpolate::ResolvedVars;
use std::path::PathBuf;
use tracing::{debug, info};

/// Effective routing for one compose invocation, derived once per operation
/// entry.
#[derive(Debug)]
struct ComposeContext {
    docker_type: DockerType,
    docker_vars: Option<ResolvedVars>,
    target: Option<String>,
    env_values: Vec<(String, String)>,
}

/// Façade for programmatically invoking sykle operations.
pub struct Sykle {
    config: ConfigDocument,
    runner: ProcessRunner,
    invoker: ComposeInvoker,
}

impl Sykle {
    pub fn new(config: ConfigDocument, debug: bool) -> Self {
        let runner = ProcessRunner::new(debug);
        Sykle {
            config,
            runner,
            invoker: ComposeInvoker::new(runner),
        }
    }

    pub fn config(&self) -> &ConfigDocument {
        &self.config
    }

    pub fn runner(&self) -> &ProcessRunner {
        &self.runner
    }

    /// The deployment → class/target rule, evaluated once per operation.
    fn compose_context(
        &self,
        docker_type: DockerType,
        deployment: Option<&str>,
        local_test: bool,
    ) -> Result<ComposeContext> {
        let mut ctx = ComposeContext {
            docker_type,
            docker_vars: None,
            target: None,
            env_values: Vec::new(),
        };
        let Some(name) = deployment else {
            return Ok(ctx);
        };

        println!("Using `prod` docker type and {name} docker vars...");
        let dep = self.config.resolve_deployment(name)?;

        // `$NAME` references resolve against the local environment here, at
        // the point of use; routed commands also self-identify the active
        // deployment.
        let mut vars = self.config.docker_vars_for_deployment(name)?;
        vars.insert(batch::DEPLOYMENT_ENV_VAR.to_string(), name.to_string());
        ctx.docker_vars = Some(vars);

        if docker_type == DockerType::ProdBuild {
            // Image builds always run locally, with the deployment's env
            // file available as build arguments.
            ctx.env_values = dep.env_values;
        } else {
            ctx.docker_type = DockerType::Prod;
            if local_test {
                // Dry-run validation: deployment config honored, execution
                // stays off the remote host.
                ctx.env_values = dep.env_values;
            } else {
                ctx.target = Some(dep.target);
            }
        }
        Ok(ctx)
    }

    /// Runs a command with the correct docker compose file(s).
    pub async fn dc(
        &self,
        input: &[String],
        docker_type: DockerType,
        deployment: Option<&str>,
        local_test: bool,
    ) -> Result<()> {
        self.dc_with_env(input, docker_type, deployment, local_test, &[])
            .await
    }

    async fn dc_with_env(
        &self,
        input: &[String],
        docker_type: DockerType,
        deployment: Option<&str>,
        local_test: bool,
        extra_env_values: &[(String, String)],
    ) -> Result<()> {
        let mut ctx = self.compose_context(docker_type, deployment, local_test)?;
        ctx.env_values.extend_from_slice(extra_env_values);
        let project_name = self.config.get_project_name(ctx.docker_type);
        self.invoker
            .invoke(
                input,
                ctx.docker_type,
                &project_name,
                ctx.docker_vars.as_ref(),
                ctx.target.as_deref(),
                &ctx.env_values,
            )
            .await
    }

    /// Spins up and runs a command on a fresh container for a compose
    /// service (`run --rm` semantics).
    pub async fn dc_run(
        &self,
        input: &[String],
        service: &str,
        docker_type: DockerType,
        deployment: Option<&str>,
        env_file: Option<&str>,
    ) -> Result<()> {
        let command_env = match env_file {
            Some(file) => {
                let expanded = shellexpand::tilde(file).into_owned();
                envfile::read_env_file(&PathBuf::from(expanded))?
            }
            None => Vec::new(),
        };
        let mut full_input = vec!["run".to_string(), "--rm".to_string(), service.to_string()];
        full_input.extend(input.iter().cloned());
        self.dc_with_env(&full_input, docker_type, deployment, false, &command_env)
            .await
    }

    /// Runs a command on an already-running service container (`exec`
    /// semantics).
    pub async fn dc_exec(
        &self,
        input: &[String],
        service: &str,
        docker_type: DockerType,
        deployment: Option<&str>,
    ) -> Result<()> {
        let mut full_input = vec!["exec".to_string(), service.to_string()];
        full_input.extend(input.iter().cloned());
        self.dc(&full_input, docker_type, deployment, false).await
    }

    /// Builds docker images based on compose files.
    ///
    /// `prod` images are always built via the `prod-build` compose file with
    /// the deployment's variables. For every other class the deployment is
    /// ignored: dev and test images must not vary with deployment settings.
    pub async fn build(
        &self,
        input: &[String],
        docker_type: DockerType,
        deployment: Option<&str>,
    ) -> Result<()> {
        let mut full_input = vec!["build".to_string()];
        full_input.extend(input.iter().cloned());
        if docker_type == DockerType::Prod {
            self.dc(&full_input, DockerType::ProdBuild, deployment, false)
                .await
        } else {
            self.dc(&full_input, docker_type, None, false).await
        }
    }

    /// Runs the configured `preup` commands, then starts the relevant
    /// compose services.
    pub async fn up(
        &self,
        input: &[String],
        docker_type: DockerType,
        deployment: Option<&str>,
    ) -> Result<()> {
        let docker_type = if deployment.is_some() {
            DockerType::Prod
        } else {
            docker_type
        };
        self.preup(docker_type, deployment).await?;
        let mut full_input = vec![
            "up".to_string(),
            "--build".to_string(),
            "--force-recreate".to_string(),
        ];
        full_input.extend(input.iter().cloned());
        self.dc(&full_input, docker_type, deployment, false).await
    }

    /// Spins down the relevant compose services.
    pub async fn down(
        &self,
        input: &[String],
        docker_type: DockerType,
        deployment: Option<&str>,
    ) -> Result<()> {
        let mut full_input = vec!["down".to_string()];
        full_input.extend(input.iter().cloned());
        self.dc(&full_input, docker_type, deployment, false).await
    }

    async fn preup(&self, docker_type: DockerType, deployment: Option<&str>) -> Result<()> {
        let ctx = BatchContext {
            docker_type: Some(docker_type),
            deployment: deployment.map(str::to_string),
            ..Default::default()
        };
        batch::run_batch(self, &self.config.preup_commands(), &ctx).await
    }

    async fn predeploy(&self, deployment: &str) -> Result<()> {
        let ctx = BatchContext {
            docker_type: Some(DockerType::ProdBuild),
            deployment: Some(deployment.to_string()),
            ..Default::default()
        };
        batch::run_batch(self, &self.config.predeploy_commands(), &ctx).await
    }

    async fn run_test_batch(
        &self,
        commands: Vec<config::CommandSpec>,
        input: &[String],
        service: Option<&str>,
        fast: bool,
    ) -> Result<()> {
        let commands = match service {
            Some(service) => config::filter_for_service(commands, service),
            None => commands,
        };
        let ctx = BatchContext {
            docker_type: Some(DockerType::Test),
            force_exec: fast,
            extra_input: input.to_vec(),
            ..Default::default()
        };
        batch::run_batch(self, &commands, &ctx).await
    }

    /// Runs the configured unit test suite.
    ///
    /// Unless `fast`: builds the test image set first and tears the test
    /// stack down afterwards — even when the batch failed, so a full run
    /// never leaves orphaned test containers. The aggregate failure
    /// surfaces only after teardown. A `fast` run assumes the stack is
    /// already up and execs into it.
    pub async fn unittest(
        &self,
        input: &[String],
        service: Option<&str>,
        fast: bool,
    ) -> Result<()> {
        if !fast {
            self.build(&[], DockerType::Test, None).await?;
        }
        let outcome = self.run_preunittest_and_tests(input, service, fast).await;
        if !fast {
            let teardown = self.down(&[], DockerType::Test, None).await;
            outcome?;
            teardown?;
        } else {
            outcome?;
        }
        Ok(())
    }

    async fn run_preunittest_and_tests(
        &self,
        input: &[String],
        service: Option<&str>,
        fast: bool,
    ) -> Result<()> {
        let preunittest = self.config.preunittest_commands();
        if !preunittest.is_empty() {
            let ctx = BatchContext {
                docker_type: Some(DockerType::Test),
                ..Default::default()
            };
            batch::run_batch(self, &preunittest, &ctx).await?;
        }
        self.run_test_batch(self.config.unittest_commands(), input, service, fast)
            .await
    }

    /// Runs the configured end-to-end suite; same build/teardown policy as
    /// [`Sykle::unittest`], without the preunittest setup batch.
    pub async fn e2e(&self, input: &[String], service: Option<&str>, fast: bool) -> Result<()> {
        if !fast {
            self.build(&[], DockerType::Test, None).await?;
        }
        let outcome = self
            .run_test_batch(self.config.e2e_commands(), input, service, fast)
            .await;
        if !fast {
            let teardown = self.down(&[], DockerType::Test, None).await;
            outcome?;
            teardown?;
        } else {
            outcome?;
        }
        Ok(())
    }

    /// Pushes docker images for a deployment (`prod-build` class).
    pub async fn push(&self, deployment: &str) -> Result<()> {
        self.dc(
            &["push".to_string()],
            DockerType::ProdBuild,
            Some(deployment),
            false,
        )
        .await
    }

    /// Pulls docker images for a deployment (`prod` class, routed to the
    /// target).
    pub async fn pull(&self, deployment: &str) -> Result<()> {
        self.dc(
            &["pull".to_string()],
            DockerType::Prod,
            Some(deployment),
            false,
        )
        .await
    }

    /// Copies files to the deployment target's `dest` over scp.
    pub async fn ssh_cp(&self, input: &[String], deployment: &str, dest: &str) -> Result<()> {
        let dep = self.config.resolve_deployment(deployment)?;
        let mut command = vec!["scp".to_string()];
        command.extend(SSH_OPTIONS.iter().map(|s| s.to_string()));
        command.extend(input.iter().cloned());
        command.push(format!("{}:{}", dep.target, dest));
        self.runner.run(&command, None, None).await
    }

    /// Runs a command on the deployment target.
    pub async fn ssh_exec(&self, input: &[String], deployment: &str) -> Result<()> {
        let dep = self.config.resolve_deployment(deployment)?;
        self.runner.run(input, None, Some(&dep.target)).await
    }

    /// Opens an interactive ssh session to the deployment target.
    pub async fn ssh(&self, deployment: &str) -> Result<()> {
        let dep = self.config.resolve_deployment(deployment)?;
        self.runner
            .run(&["ssh".to_string(), dep.target.clone()], None, None)
            .await
    }

    /// Deploys docker images/static assets and starts services.
    ///
    /// Fixed sequence; any failed step aborts the remaining ones — a failed
    /// predeploy must never result in pushing or deploying a broken build.
    pub async fn deploy(&self, deployment: &str) -> Result<()> {
        let dep = self.config.resolve_deployment(deployment)?;
        info!(deployment = %dep.name, target = %dep.target, "starting deploy sequence");

        self.predeploy(deployment).await?;
        self.push(deployment).await?;

        match &dep.env_file {
            Some(env_file) => {
                self.ssh_cp(&[env_file.clone()], deployment, "~/.env")
                    .await?;
            }
            None => info!(deployment, "no env file configured; skipping copy"),
        }
        self.ssh_cp(
            &["docker-compose.prod.yml".to_string()],
            deployment,
            "~",
        )
        .await?;

        self.pull(deployment).await?;
        self.up(&["-d".to_string()], DockerType::Prod, Some(deployment))
            .await?;

        // Reclaims disk on the target after the new stack is up.
        self.ssh_exec(
            &["docker", "system", "prune", "-a", "--force"]
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<_>>(),
            deployment,
        )
        .await
    }

    /// Resolves an alias and executes it as a single-element batch.
    pub async fn run_alias(
        &self,
        alias: &str,
        input: &[String],
        deployment: Option<&str>,
    ) -> Result<()> {
        let spec = self.config.resolve_alias(alias, input)?;
        debug!(alias, "running alias");
        let ctx = BatchContext {
            deployment: deployment.map(str::to_string),
            ..Default::default()
        };
        batch::run_batch(self, &[spec], &ctx).await
    }
}

// --- Unit Tests ---
// Compose-routed operations need a docker-compose binary; these tests cover
// the resolution logic and the bare-subprocess paths.
#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::SykleError;

    fn sykle_with(config_json: &str) -> Sykle {
        Sykle::new(serde_json::from_str(config_json).unwrap(), false)
    }

    fn sykle() -> Sykle {
        sykle_with(
            r#"{
                "version": 2,
                "project_name": "app",
                "default_service": "web",
                "default_deployment": "staging",
                "deployments": {
                    "staging": {
                        "target": "user@staging",
                        "docker_vars": {"BUILD_NUMBER": "latest"}
                    }
                },
                "aliases": {
                    "say": {"command": "echo hello"},
                    "fail": {"command": "false"}
                }
            }"#,
        )
    }

    #[test]
    fn test_compose_context_without_deployment_is_identity() {
        let s = sykle();
        let ctx = s
            .compose_context(DockerType::Dev, None, false)
            .unwrap();
        assert_eq!(ctx.docker_type, DockerType::Dev);
        assert!(ctx.docker_vars.is_none());
        assert!(ctx.target.is_none());
    }

    #[test]
    fn test_compose_context_deployment_forces_prod_and_target() {
        let s = sykle();
        let ctx = s
            .compose_context(DockerType::Dev, Some("staging"), false)
            .unwrap();
        assert_eq!(ctx.docker_type, DockerType::Prod);
        assert_eq!(ctx.target.as_deref(), Some("user@staging"));
        let vars = ctx.docker_vars.unwrap();
        assert_eq!(vars.get("BUILD_NUMBER").unwrap(), "latest");
        assert_eq!(vars.get("DEPLOYMENT").unwrap(), "staging");
    }

    #[test]
    fn test_compose_context_prod_build_stays_local() {
        let s = sykle();
        let ctx = s
            .compose_context(DockerType::ProdBuild, Some("staging"), false)
            .unwrap();
        assert_eq!(ctx.docker_type, DockerType::ProdBuild);
        assert!(ctx.target.is_none());
    }

    #[test]
    fn test_compose_context_local_test_keeps_execution_local() {
        let s = sykle();
        let ctx = s
            .compose_context(DockerType::Dev, Some("staging"), true)
            .unwrap();
        assert_eq!(ctx.docker_type, DockerType::Prod);
        assert!(ctx.target.is_none());
    }

    #[test]
    fn test_compose_context_unknown_deployment_fails() {
        let s = sykle();
        let err = s
            .compose_context(DockerType::Dev, Some("nope"), false)
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SykleError>(),
            Some(SykleError::UnknownDeployment { .. })
        ));
    }

    #[tokio::test]
    async fn test_run_alias_executes_bare_command() {
        let s = sykle();
        s.run_alias("say", &["world".to_string()], None)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_run_alias_unknown_is_resolution_error() {
        let s = sykle();
        let err = s.run_alias("nope", &[], None).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SykleError>(),
            Some(SykleError::UnknownAlias { .. })
        ));
    }

    #[tokio::test]
    async fn test_run_alias_failure_surfaces_as_batch_aggregate() {
        let s = sykle();
        let err = s.run_alias("fail", &[], None).await.unwrap_err();
        match err.downcast_ref::<SykleError>() {
            Some(SykleError::BatchFailed { failures }) => {
                assert_eq!(failures.len(), 1);
                assert_eq!(failures[0].command, "false");
            }
            other => panic!("expected BatchFailed, got {other:?}"),
        }
    }
}
