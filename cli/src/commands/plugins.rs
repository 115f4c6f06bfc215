//! # Sykle Plugins Listing Handler (`commands::plugins`)
//!
//! File: cli/src/commands/plugins.rs
//! Repository: https://github.com/typecode/sykle
//!
//! ## Overview
//!
//! Implements `syk plugins`: lists the names registered in the plugin
//! registry. Needs no configuration — the registry is a compile-time table.
//!
use crate::core::error::Result;
use crate::plugins;
use clap::Parser;

/// Arguments for `syk plugins`.
#[derive(Parser, Debug)]
#[command(about = "Lists available plugins")]
pub struct PluginsArgs {}

pub fn handle_plugins(_args: PluginsArgs) -> Result<()> {
    println!("Installed syk plugins:");
    let names = plugins::plugin_names();
    if names.is_empty() {
        println!("  (none)");
    }
    for name in names {
        println!("  {name}");
    }
    Ok(())
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plugins_args_take_nothing() {
        assert!(PluginsArgs::try_parse_from(["plugins"]).is_ok());
    }
}
