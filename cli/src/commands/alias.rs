//! # Sykle Alias/Plugin Fallback Handler (`commands::alias`)
//!
//! File: cli/src/commands/alias.rs
//! Repository: https://github.com/typecode/sykle
//!
//! ## Overview
//!
//! Implements the trailing fallback: `syk <name> [args…]` where `<name>` is
//! not a built-in subcommand. Resolution order is aliases first, then the
//! plugin registry; anything else is a readable resolution error. Alias
//! arguments append to the configured command (append-only).
//!
//! ```bash
//! # alias "dj" = {service: "django", command: "django-admin"}
//! syk dj migrate        # docker-compose run --rm django django-admin migrate
//! ```
//!
use crate::core::error::{Result, SykleError};
use crate::core::orchestrator::Sykle;
use crate::plugins;
use tracing::debug;

/// Dispatches the raw fallback tokens: the first is the alias or plugin
/// name, the rest are appended input.
pub async fn handle_fallback(tokens: &[String], sykle: &Sykle) -> Result<()> {
    let Some((name, input)) = tokens.split_first() else {
        return Err(SykleError::UnknownPlugin {
            name: String::new(),
        }
        .into());
    };
    debug!(name, "fallback dispatch");

    if sykle.config().aliases.contains_key(name) {
        return sykle.run_alias(name, input, None).await;
    }
    if plugins::get_plugin(name).is_some() {
        return plugins::run_plugin(name, sykle).await;
    }
    Err(SykleError::UnknownPlugin {
        name: name.to_string(),
    }
    .into())
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    fn sykle() -> Sykle {
        let config = serde_json::from_str(
            r#"{
                "version": 2,
                "project_name": "p",
                "default_service": "s",
                "default_deployment": "d",
                "aliases": {"say": {"command": "echo"}}
            }"#,
        )
        .unwrap();
        Sykle::new(config, false)
    }

    #[tokio::test]
    async fn test_fallback_runs_alias_with_appended_input() {
        let tokens = vec!["say".to_string(), "hello".to_string()];
        handle_fallback(&tokens, &sykle()).await.unwrap();
    }

    #[tokio::test]
    async fn test_fallback_unknown_name_is_resolution_error() {
        let tokens = vec!["definitely-not-a-thing".to_string()];
        let err = handle_fallback(&tokens, &sykle()).await.unwrap_err();
        match err.downcast_ref::<SykleError>() {
            Some(SykleError::UnknownPlugin { name }) => {
                assert_eq!(name, "definitely-not-a-thing")
            }
            other => panic!("expected UnknownPlugin, got {other:?}"),
        }
    }
}
