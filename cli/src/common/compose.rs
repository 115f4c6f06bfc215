//! # Sykle Compose Invocation (`common::compose`)
//!
//! File: cli/src/common/compose.rs
//! Repository: https://github.com/typecode/sykle
//!
//! ## Overview
//!
//! Builds concrete `docker-compose` command lines — compose file selected by
//! environment class, project qualified with `-p`, env-file pairs injected
//! into the argv where compose expects them — and delegates execution to
//! [`ProcessRunner`]. The orchestrator decides *what* to run and under which
//! class/target; this module only assembles and dispatches the argv.
//!
//! ## Env-file injection
//!
//! Compose's build-time and run-time variable mechanisms are argv-level, not
//! process-environment-level, so a deployment env file is rewritten into the
//! argv: after a leading `build` token as `--build-arg KEY=VALUE` pairs,
//! after a leading `run` token as `-e KEY=VALUE` pairs. The rewrite is keyed
//! off the first input token and isolated in [`inject_env_file_args`].
//!
use crate::common::process::ProcessRunner;
use crate::core::config::DockerType;
use crate::core::error::Result;
use crate::core::interpolate::ResolvedVars;
use tracing::debug;

/// Compose binary name. The orchestrator depends only on its exit code and
/// never parses its output.
pub const COMPOSE_BINARY: &str = "docker-compose";

/// Assembles `docker-compose -p <project> -f <file> <input...>`.
pub fn compose_argv(input: &[String], docker_type: DockerType, project_name: &str) -> Vec<String> {
    let mut argv = vec![
        COMPOSE_BINARY.to_string(),
        "-p".to_string(),
        project_name.to_string(),
        "-f".to_string(),
        docker_type.compose_file().to_string(),
    ];
    argv.extend(input.iter().cloned());
    argv
}

/// Rewrites env-file pairs into the argv after a leading `build` (as
/// `--build-arg`) or `run` (as `-e`). Any other head passes through
/// untouched.
pub fn inject_env_file_args(input: &[String], pairs: &[(String, String)]) -> Vec<String> {
    if pairs.is_empty() {
        return input.to_vec();
    }
    let flag = match input.first().map(String::as_str) {
        Some("build") => "--build-arg",
        Some("run") => "-e",
        _ => return input.to_vec(),
    };
    let mut rewritten = vec![input[0].clone()];
    for (key, value) in pairs {
        rewritten.push(flag.to_string());
        rewritten.push(format!("{key}={value}"));
    }
    rewritten.extend(input[1..].iter().cloned());
    rewritten
}

/// Executes compose command lines through a [`ProcessRunner`].
#[derive(Debug, Clone, Copy)]
pub struct ComposeInvoker {
    runner: ProcessRunner,
}

impl ComposeInvoker {
    pub fn new(runner: ProcessRunner) -> Self {
        ComposeInvoker { runner }
    }

    /// Composes and runs one compose invocation.
    ///
    /// - `docker_vars`: resolved env overlay for the compose files.
    /// - `target`: remote routing for deployment operations.
    /// - `env_values`: env-file pairs for the argv rewrite.
    pub async fn invoke(
        &self,
        input: &[String],
        docker_type: DockerType,
        project_name: &str,
        docker_vars: Option<&ResolvedVars>,
        target: Option<&str>,
        env_values: &[(String, String)],
    ) -> Result<()> {
        let input = inject_env_file_args(input, env_values);
        let argv = compose_argv(&input, docker_type, project_name);
        debug!(
            class = %docker_type,
            project = project_name,
            remote = target.is_some(),
            "compose invocation"
        );
        self.runner.run(&argv, docker_vars, target).await
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    fn pairs(entries: &[(&str, &str)]) -> Vec<(String, String)> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_compose_argv_selects_file_by_class() {
        let argv = compose_argv(&tokens(&["up", "-d"]), DockerType::Prod, "cool-project");
        assert_eq!(
            argv,
            tokens(&[
                "docker-compose",
                "-p",
                "cool-project",
                "-f",
                "./docker-compose.prod.yml",
                "up",
                "-d"
            ])
        );
    }

    #[test]
    fn test_compose_argv_dev_and_test_files() {
        let dev = compose_argv(&tokens(&["ps"]), DockerType::Dev, "app-dev");
        assert!(dev.contains(&"./docker-compose.yml".to_string()));
        let test = compose_argv(&tokens(&["ps"]), DockerType::Test, "app-test");
        assert!(test.contains(&"./docker-compose.test.yml".to_string()));
        let build = compose_argv(&tokens(&["build"]), DockerType::ProdBuild, "app");
        assert!(build.contains(&"./docker-compose.prod-build.yml".to_string()));
    }

    #[test]
    fn test_inject_build_args_after_build_head() {
        let rewritten = inject_env_file_args(
            &tokens(&["build", "web"]),
            &pairs(&[("A", "1"), ("B", "2")]),
        );
        assert_eq!(
            rewritten,
            tokens(&["build", "--build-arg", "A=1", "--build-arg", "B=2", "web"])
        );
    }

    #[test]
    fn test_inject_env_flags_after_run_head() {
        let rewritten = inject_env_file_args(
            &tokens(&["run", "--rm", "web", "ls"]),
            &pairs(&[("KEY", "value")]),
        );
        assert_eq!(
            rewritten,
            tokens(&["run", "-e", "KEY=value", "--rm", "web", "ls"])
        );
    }

    #[test]
    fn test_inject_leaves_other_heads_untouched() {
        let input = tokens(&["exec", "web", "ls"]);
        assert_eq!(
            inject_env_file_args(&input, &pairs(&[("K", "v")])),
            input
        );
    }

    #[test]
    fn test_inject_without_pairs_is_identity() {
        let input = tokens(&["build", "web"]);
        assert_eq!(inject_env_file_args(&input, &[]), input);
    }
}
