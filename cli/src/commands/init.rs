//! # Sykle Init Handler (`commands::init`)
//!
//! File: cli/src/commands/init.rs
//! Repository: https://github.com/typecode/sykle
//!
//! ## Overview
//!
//! Implements `syk init`: writes a skeleton `.sykle.json` into the current
//! directory so a project can start filling in services and deployments.
//! Never overwrites an existing config.
//!
use crate::core::config::{self, CONFIG_FILENAME};
use crate::core::error::Result;
use clap::Parser;
use owo_colors::OwoColorize;
use std::path::Path;

/// Arguments for `syk init`.
#[derive(Parser, Debug)]
#[command(about = "Creates a blank config file")]
pub struct InitArgs {}

pub fn handle_init(_args: InitArgs) -> Result<()> {
    if config::init_config(Path::new(CONFIG_FILENAME))? {
        println!("{}", format!("\"{CONFIG_FILENAME}\" created!").green());
    } else {
        println!(
            "{}",
            format!("\"{CONFIG_FILENAME}\" already exists").yellow()
        );
    }
    Ok(())
}
