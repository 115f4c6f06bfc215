//! # Sykle CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//! Repository: https://github.com/typecode/sykle
//!
//! ## Overview
//!
//! Shared helpers for the integration tests: building an `assert_cmd`
//! command pointing at the compiled `syk` binary, and writing throwaway
//! project directories with a `.sykle.json` inside.
//!

// Different test files use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;
use tempfile::TempDir;

/// An `assert_cmd::Command` for the compiled `syk` binary.
pub fn syk_cmd() -> Command {
    Command::cargo_bin("syk").expect("Failed to find syk binary for testing")
}

/// A throwaway project directory containing the given `.sykle.json`.
pub fn project_dir(config_json: &str) -> TempDir {
    let dir = tempfile::tempdir().expect("Failed to create temp project dir");
    std::fs::write(dir.path().join(".sykle.json"), config_json)
        .expect("Failed to write .sykle.json");
    dir
}

/// A config with bare-command aliases only, so tests never need a
/// docker-compose binary.
pub fn alias_config() -> &'static str {
    r#"{
        "version": 2,
        "project_name": "it-project",
        "default_service": "web",
        "default_deployment": "staging",
        "deployments": {
            "staging": {"target": "user@staging.example.com"},
            "broken": {}
        },
        "aliases": {
            "say": {"command": "echo hello"},
            "fail": {"command": "false"},
            "missing-binary": {"command": "./does-not-exist"}
        }
    }"#
}
