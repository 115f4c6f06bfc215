//! # Sykle Config Example Handler (`commands::config`)
//!
//! File: cli/src/commands/config.rs
//! Repository: https://github.com/typecode/sykle
//!
//! ## Overview
//!
//! Implements `syk config`: prints the annotated example configuration so an
//! operator can see every supported key without leaving the terminal. The
//! example is documentation (JSON with comments), not a parseable document —
//! `syk init` writes the parseable skeleton.
//!
use crate::core::config::CONFIG_FILE_EXAMPLE;
use crate::core::error::Result;
use clap::Parser;

/// Arguments for `syk config`.
#[derive(Parser, Debug)]
#[command(about = "Prints an example config")]
pub struct ConfigArgs {}

pub fn handle_config(_args: ConfigArgs) -> Result<()> {
    println!("{CONFIG_FILE_EXAMPLE}");
    Ok(())
}
