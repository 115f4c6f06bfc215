//! # Sykle Configuration System
//!
//! File: cli/src/core/config.rs
//! Repository: https://github.com/typecode/sykle
//!
//! ## Overview
//!
//! This module implements the configuration system for sykle: loading and
//! validating the versioned `.sykle.json` document and resolving the typed
//! values the orchestrator consumes (command lists, deployments, aliases,
//! plugin settings, compose project names).
//!
//! ## Architecture
//!
//! The configuration system follows these principles:
//! - The document is parsed fresh on every invocation and never mutated.
//! - Malformed JSON and missing required fields fail differently
//!   (`ConfigDecode` vs `InvalidConfig`), so loading is two-stage:
//!   deserialize, then validate.
//! - A version mismatch is a degraded-compatibility warning, not a failure.
//! - Deployment `docker_vars` beginning with `$` are placeholders resolved
//!   lazily against the *local* process environment, once, at the point the
//!   deployment is used; the resolution is never written back.
//! - A deployment's `env_file` is read eagerly at resolution time; naming an
//!   unreadable file is a hard error, not a silent no-op.
//!
//! ## Examples
//!
//! Loading and using configuration:
//!
//! ```rust
//! let config = ConfigDocument::load(Path::new(".sykle.json"))?;
//! let deployment = config.resolve_deployment("staging")?;
//! let project = config.get_project_name(DockerType::Dev);
//! ```
//!
use crate::common::envfile;
use crate::core::error::{Result, SykleError};
use crate::core::interpolate::{self, RawVars, ResolvedVars};
use anyhow::Context;
use owo_colors::OwoColorize;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Schema version this build understands.
pub const SUPPORTED_CONFIG_VERSION: i64 = 2;

/// Default config document name, looked up in the current directory.
pub const CONFIG_FILENAME: &str = ".sykle.json";

/// The execution environment class. Selects which compose file and which
/// project-naming rule applies.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum DockerType {
    #[default]
    Dev,
    Test,
    Prod,
    ProdBuild,
}

impl DockerType {
    /// The compose file for this class. Fixed 1:1 mapping, never overridden
    /// by configuration.
    pub fn compose_file(self) -> &'static str {
        match self {
            DockerType::Dev => "./docker-compose.yml",
            DockerType::Test => "./docker-compose.test.yml",
            DockerType::Prod => "./docker-compose.prod.yml",
            DockerType::ProdBuild => "./docker-compose.prod-build.yml",
        }
    }

    /// Prod-class environments use the configured project name unqualified,
    /// so local naming matches the name used on the remote host.
    pub fn is_prod_class(self) -> bool {
        matches!(self, DockerType::Prod | DockerType::ProdBuild)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DockerType::Dev => "dev",
            DockerType::Test => "test",
            DockerType::Prod => "prod",
            DockerType::ProdBuild => "prod-build",
        }
    }
}

impl std::fmt::Display for DockerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One command entry as written in the config document (`unittest`,
/// `predeploy`, `aliases`, ...).
#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct CommandConfig {
    /// Compose service to run against. Absent means a bare local shell
    /// invocation that must never be routed through compose.
    #[serde(default)]
    pub service: Option<String>,
    /// The command line, whitespace-split into tokens at resolution time.
    pub command: String,
    /// Optional env file whose pairs are injected when this command is
    /// routed through compose.
    #[serde(default)]
    pub env: Option<String>,
    /// Execution environment class; `dev` unless the surrounding operation
    /// forces another (predeploy forces `prod-build`).
    #[serde(default)]
    pub docker_type: DockerType,
    /// Run against an already-running container (`exec`) instead of a fresh
    /// one (`run --rm`).
    #[serde(default)]
    pub use_exec: bool,
}

/// A single resolved unit of work, ready for the batch executor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub service: Option<String>,
    pub input: Vec<String>,
    pub docker_type: DockerType,
    pub use_exec: bool,
    pub env_file: Option<String>,
}

impl CommandConfig {
    /// Resolves the raw entry into a `CommandSpec`, appending `extra` to the
    /// configured tokens. Extra operator input is append-only: it is never
    /// prepended or interleaved.
    pub fn to_spec(&self, extra: &[String]) -> CommandSpec {
        let mut input: Vec<String> = self
            .command
            .split_whitespace()
            .map(str::to_string)
            .collect();
        input.extend(extra.iter().cloned());
        CommandSpec {
            service: self.service.clone(),
            input,
            docker_type: self.docker_type,
            use_exec: self.use_exec,
            env_file: self.env.clone(),
        }
    }
}

/// One deployment entry as written in the config document.
#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct DeploymentConfig {
    /// SSH-style address (`user@host`). Required for the deployment to be
    /// usable; checked at resolution, not at load.
    #[serde(default)]
    pub target: Option<String>,
    /// Optional local file of KEY=VALUE pairs.
    #[serde(default)]
    pub env_file: Option<String>,
    /// Variables made available to the prod-build/prod compose files.
    /// `$NAME` values reference the local process environment.
    #[serde(default)]
    pub docker_vars: RawVars,
}

/// A deployment resolved for use: target validated, env file read eagerly.
#[derive(Debug, Clone)]
pub struct Deployment {
    pub name: String,
    pub target: String,
    pub env_file: Option<String>,
    /// Pairs read from `env_file` at resolution time, in file order.
    pub env_values: Vec<(String, String)>,
    pub docker_vars: RawVars,
}

/// The versioned configuration document, immutable after load.
#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct ConfigDocument {
    #[serde(default)]
    pub version: Option<i64>,
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(default)]
    pub default_service: Option<String>,
    #[serde(default)]
    pub default_deployment: Option<String>,
    #[serde(default)]
    pub unittest: Vec<CommandConfig>,
    #[serde(default)]
    pub preunittest: Vec<CommandConfig>,
    #[serde(default)]
    pub e2e: Vec<CommandConfig>,
    #[serde(default)]
    pub predeploy: Vec<CommandConfig>,
    #[serde(default)]
    pub preup: Vec<CommandConfig>,
    #[serde(default)]
    pub deployments: BTreeMap<String, DeploymentConfig>,
    #[serde(default)]
    pub aliases: BTreeMap<String, CommandConfig>,
    /// Per-plugin settings, passed through to plugins unmodified.
    #[serde(default)]
    pub plugins: BTreeMap<String, serde_json::Value>,
}

impl ConfigDocument {
    /// Loads and validates the document at `path`.
    ///
    /// Failure modes:
    /// - missing file ⇒ `ConfigNotFound` (the diagnostic suggests `syk init`)
    /// - malformed JSON or unknown keys ⇒ `ConfigDecode`
    /// - missing required top-level fields ⇒ `InvalidConfig`
    ///
    /// A version mismatch prints a warning and loading continues.
    pub fn load(path: &Path) -> Result<ConfigDocument> {
        if !path.is_file() {
            return Err(SykleError::ConfigNotFound {
                path: path.display().to_string(),
            }
            .into());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: ConfigDocument = serde_json::from_str(&content)
            .map_err(|e| SykleError::ConfigDecode(e.to_string()))?;
        config.validate()?;
        config.warn_on_version_mismatch();
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("project_name", &self.project_name),
            ("default_service", &self.default_service),
            ("default_deployment", &self.default_deployment),
        ] {
            if value.as_deref().map_or(true, str::is_empty) {
                return Err(SykleError::InvalidConfig(format!(
                    "missing required field \"{field}\""
                ))
                .into());
            }
        }
        Ok(())
    }

    /// Degraded-compatibility mode: an unexpected version is surfaced to the
    /// operator but does not block loading.
    fn warn_on_version_mismatch(&self) {
        if self.version != Some(SUPPORTED_CONFIG_VERSION) {
            let found = self
                .version
                .map_or_else(|| "none".to_string(), |v| v.to_string());
            warn!(
                expected = SUPPORTED_CONFIG_VERSION,
                found = %found,
                "config version mismatch"
            );
            eprintln!(
                "{}",
                format!(
                    "Expected config file with version=\"{}\", not \"{}\".\n\
                     (run \"syk config\" to see an example of expected config)",
                    SUPPORTED_CONFIG_VERSION, found
                )
                .yellow()
            );
        }
    }

    /// Required-field accessors. `validate` ran at load, so these are total
    /// on any document obtained through `load`.
    pub fn project_name(&self) -> &str {
        self.project_name.as_deref().unwrap_or_default()
    }

    pub fn default_service(&self) -> &str {
        self.default_service.as_deref().unwrap_or_default()
    }

    pub fn default_deployment(&self) -> &str {
        self.default_deployment.as_deref().unwrap_or_default()
    }

    fn deployment_entry(&self, name: &str) -> Result<&DeploymentConfig> {
        let entry = self
            .deployments
            .get(name)
            .ok_or_else(|| SykleError::UnknownDeployment {
                name: name.to_string(),
            })?;
        if entry.target.as_deref().map_or(true, str::is_empty) {
            return Err(SykleError::InvalidDeployment {
                name: name.to_string(),
            }
            .into());
        }
        Ok(entry)
    }

    /// Resolves a deployment for use. The env file, when configured, is read
    /// here, eagerly: a deployment that names an unreadable file must fail
    /// before any command runs against it.
    pub fn resolve_deployment(&self, name: &str) -> Result<Deployment> {
        let entry = self.deployment_entry(name)?;
        let env_values = match &entry.env_file {
            Some(file) => {
                let expanded = shellexpand::tilde(file).into_owned();
                envfile::read_env_file(&PathBuf::from(expanded))
                    .with_context(|| format!("Deployment \"{name}\" env file is unreadable"))?
            }
            None => Vec::new(),
        };
        Ok(Deployment {
            name: name.to_string(),
            target: entry.target.clone().unwrap_or_default(),
            env_file: entry.env_file.clone(),
            env_values,
            docker_vars: entry.docker_vars.clone(),
        })
    }

    /// Interpolates a deployment's `docker_vars` against the current process
    /// environment. Recomputed on every call: the environment can change
    /// between calls, and resolution happens at the point of use.
    pub fn docker_vars_for_deployment(&self, name: &str) -> Result<ResolvedVars> {
        let entry = self.deployment_entry(name)?;
        Ok(interpolate::interpolate_process_env(&entry.docker_vars))
    }

    /// Resolves an alias into a `CommandSpec` with `extra` appended to the
    /// configured input.
    pub fn resolve_alias(&self, name: &str, extra: &[String]) -> Result<CommandSpec> {
        let alias = self
            .aliases
            .get(name)
            .ok_or_else(|| SykleError::UnknownAlias {
                name: name.to_string(),
            })?;
        Ok(alias.to_spec(extra))
    }

    /// Settings block for a plugin; an empty object when the document has
    /// none.
    pub fn for_plugin(&self, name: &str) -> serde_json::Value {
        self.plugins
            .get(name)
            .cloned()
            .unwrap_or_else(|| serde_json::json!({}))
    }

    /// The compose project name for an environment class.
    ///
    /// `dev`/`test` derive the name from the current working directory's base
    /// name, so concurrent checkouts of the same project get isolated compose
    /// projects. Prod classes use the configured `project_name` verbatim, so
    /// the local name matches the name used on the remote host at deploy time.
    pub fn get_project_name(&self, docker_type: DockerType) -> String {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        self.project_name_for_dir(docker_type, &cwd)
    }

    /// Naming rule with an explicit directory, for callers and tests that
    /// should not depend on the process-wide working directory.
    pub fn project_name_for_dir(&self, docker_type: DockerType, dir: &Path) -> String {
        if docker_type.is_prod_class() {
            return self.project_name().to_string();
        }
        let base = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.project_name().to_string());
        format!("{}-{}", base, docker_type)
    }

    /// Command-list accessors, resolved in insertion order. Order is
    /// execution order.
    pub fn unittest_commands(&self) -> Vec<CommandSpec> {
        resolve_all(&self.unittest)
    }

    pub fn preunittest_commands(&self) -> Vec<CommandSpec> {
        resolve_all(&self.preunittest)
    }

    pub fn e2e_commands(&self) -> Vec<CommandSpec> {
        resolve_all(&self.e2e)
    }

    pub fn predeploy_commands(&self) -> Vec<CommandSpec> {
        resolve_all(&self.predeploy)
    }

    pub fn preup_commands(&self) -> Vec<CommandSpec> {
        resolve_all(&self.preup)
    }
}

fn resolve_all(configs: &[CommandConfig]) -> Vec<CommandSpec> {
    configs.iter().map(|c| c.to_spec(&[])).collect()
}

/// Keeps only the commands bound to `service`. Used by the test suites'
/// `--service` filter.
pub fn filter_for_service(specs: Vec<CommandSpec>, service: &str) -> Vec<CommandSpec> {
    specs
        .into_iter()
        .filter(|spec| spec.service.as_deref() == Some(service))
        .collect()
}

/// Writes a skeleton config document to `path` unless one already exists.
/// Returns whether a file was created.
pub fn init_config(path: &Path) -> Result<bool> {
    if path.is_file() {
        return Ok(false);
    }
    let skeleton = serde_json::json!({
        "version": SUPPORTED_CONFIG_VERSION,
        "project_name": null,
        "default_service": null,
        "default_deployment": "staging",
        "unittest": [{"service": null, "command": null}],
        "e2e": [{"service": null, "command": null}],
        "predeploy": [],
        "preup": [],
        "deployments": {
            "staging": {"env_file": ".env.staging", "target": null, "docker_vars": {}},
            "prod": {"env_file": ".env.prod", "target": null, "docker_vars": {}}
        },
        "aliases": {},
        "plugins": {}
    });
    let content = serde_json::to_string_pretty(&skeleton)?;
    std::fs::write(path, content + "\n")
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(true)
}

/// Annotated example printed by `syk config`. JSON-with-comments on purpose:
/// this is operator documentation, never parsed.
pub const CONFIG_FILE_EXAMPLE: &str = r#"
{
    // specifies which version of .sykle.json is being used
    "version": 2,
    // name of the project (used when naming docker images)
    "project_name": "cool-project",
    // docker compose service to use for commands by default
    "default_service": "django",
    // list of commands needed to run unittests (run sequentially)
    "unittest": [
        {
            // docker compose service on which to run the command
            "service": "django",
            // command invoked via 'docker-compose run --rm <service>'
            "command": "django-admin test"
        },
        {
            "service": "node",
            "command": "npm test"
        }
    ],
    // list of commands needed to run e2e tests (run sequentially)
    "e2e": [
        {
            "service": "django",
            "command": "behave"
        }
    ],
    // list of commands to invoke before deploy (run sequentially)
    "predeploy": [
        {
            "service": "django",
            "command": "django-admin collectstatic --no-input"
        },
        {
            // if no service is specified, will run as a normal shell command
            "command": "aws ecr get-login --region us-east-1"
        }
    ],
    // list of commands to invoke before up (run sequentially)
    "preup": [
        {
            "command": "syk down"
        }
    ],
    // deployment to use by default (must be listed in deployments section)
    "default_deployment": "staging",
    // a collection of locations where you can deploy the project to.
    // each remote instance is assumed to be reachable over ssh and to have
    // docker and docker-compose installed.
    "deployments": {
        "prod": {
            // the ssh address of the machine the deployment points to
            "target": "ec2-user@www.my-site.com",
            // env file to ship to the remote host as ~/.env
            "env_file": ".env.prod",
            // docker_vars are made available to the prod-build and prod
            // compose files
            "docker_vars": {
                "SERVICE_IMAGE": "some-ecr-url/prod-repo",
                // a variable beginning with a $ sign pulls its value from
                // the local environment
                "BUILD_NUMBER": "$BUILD_NUMBER"
            }
        },
        "staging": {
            "target": "ec2-user@staging.my-site.com",
            "env_file": ".env.staging",
            "docker_vars": {
                "SERVICE_IMAGE": "some-ecr-url/staging-repo",
                "BUILD_NUMBER": "$BUILD_NUMBER"
            }
        }
    },
    // defines shortcuts for commonly used commands
    "aliases": {
        // name of the shortcut (invoked as 'syk dj <INPUT>')
        "dj": {
            "service": "django",
            "command": "django-admin"
        }
    },
    // defines settings specific to plugins
    "plugins": {}
}
"#;
