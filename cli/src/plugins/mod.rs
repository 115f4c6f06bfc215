//! # Sykle Plugin Registry (`plugins`)
//!
//! File: cli/src/plugins/mod.rs
//! Repository: https://github.com/typecode/sykle
//!
//! ## Overview
//!
//! Plugins extend the `syk` command surface without being part of the core
//! command set: `syk <name>` falls through alias resolution to the plugin
//! registry. A plugin is handed the loaded configuration (its own settings
//! block via [`ConfigDocument::for_plugin`]) and the orchestrator, and
//! consumes the orchestrator's public operations (`dc`, `build`, `push`, …)
//! exactly as the built-in command handlers do.
//!
//! ## Architecture
//!
//! Registration is an explicit compile-time table ([`all_plugins`]) — no
//! directory scanning, no runtime module discovery. Each entry is a boxed
//! [`SyklePlugin`] looked up by name. The heavy plugin bodies (database
//! sync, bucket sync, …) ship as external programs the plugin shells out to
//! through the orchestrator.
//!
use crate::core::error::{Result, SykleError};
use crate::core::orchestrator::Sykle;
use futures_util::future::BoxFuture;

/// A named capability invocable as `syk <name>`.
///
/// `run` receives the orchestrator, and through it the loaded configuration;
/// plugins read their settings with `sykle.config().for_plugin(self.name())`.
pub trait SyklePlugin: Send + Sync {
    fn name(&self) -> &'static str;

    fn run<'a>(&'a self, sykle: &'a Sykle) -> BoxFuture<'a, Result<()>>;
}

/// The registry table. Extending the command surface means adding a
/// constructor here.
pub fn all_plugins() -> Vec<Box<dyn SyklePlugin>> {
    Vec::new()
}

/// Looks a plugin up by name.
pub fn get_plugin(name: &str) -> Option<Box<dyn SyklePlugin>> {
    all_plugins().into_iter().find(|p| p.name() == name)
}

/// Registered plugin names, for `syk plugins`.
pub fn plugin_names() -> Vec<&'static str> {
    all_plugins().iter().map(|p| p.name()).collect()
}

/// Dispatches `syk <name>` to a registered plugin.
pub async fn run_plugin(name: &str, sykle: &Sykle) -> Result<()> {
    match get_plugin(name) {
        Some(plugin) => plugin.run(sykle).await,
        None => Err(SykleError::UnknownPlugin {
            name: name.to_string(),
        }
        .into()),
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    static RAN: AtomicBool = AtomicBool::new(false);

    struct RecordingPlugin;

    impl SyklePlugin for RecordingPlugin {
        fn name(&self) -> &'static str {
            "recording"
        }

        fn run<'a>(&'a self, sykle: &'a Sykle) -> BoxFuture<'a, Result<()>> {
            Box::pin(async move {
                // Plugins read their settings block through the orchestrator.
                let settings = sykle.config().for_plugin(self.name());
                assert!(settings.is_object());
                RAN.store(true, Ordering::SeqCst);
                Ok(())
            })
        }
    }

    fn sykle() -> Sykle {
        let config = serde_json::from_str(
            r#"{
                "version": 2,
                "project_name": "p",
                "default_service": "s",
                "default_deployment": "d",
                "plugins": {"recording": {"enabled": true}}
            }"#,
        )
        .unwrap();
        Sykle::new(config, false)
    }

    #[tokio::test]
    async fn test_plugin_trait_dispatch() {
        let plugin = RecordingPlugin;
        plugin.run(&sykle()).await.unwrap();
        assert!(RAN.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_unknown_plugin_is_resolution_error() {
        let err = run_plugin("nope", &sykle()).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SykleError>(),
            Some(SykleError::UnknownPlugin { .. })
        ));
    }

    #[test]
    fn test_registry_lookup_misses_unregistered_names() {
        assert!(get_plugin("nope").is_none());
        assert!(plugin_names().is_empty());
    }
}
