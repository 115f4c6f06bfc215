//! # Sykle Error Types
//!
//! File: cli/src/core/error.rs
//! Repository: https://github.com/typecode/sykle
//!
//! ## Overview
//!
//! This module defines the error types and error handling mechanisms used
//! throughout the sykle application. It provides a consistent approach to
//! error management with detailed error information and context.
//!
//! ## Architecture
//!
//! The error system consists of two main components:
//! - `SykleError`: A custom error enum using `thiserror` for specific error types
//! - `Result<T>`: A type alias for `anyhow::Result<T>` for flexible error handling
//!
//! The error types cover four domains:
//! - Configuration errors (missing file, malformed JSON, missing required fields)
//! - Resolution errors (unknown/invalid deployment, unknown alias or plugin)
//! - Execution errors (non-zero subprocess exit, aggregated batch failures)
//! - Cancellation (operator interrupt, always distinct from a failure)
//!
//! ## Examples
//!
//! Pattern matching on error types at the top level:
//!
//! ```rust
//! match result {
//!     Ok(value) => println!("Success: {:?}", value),
//!     Err(e) if e.downcast_ref::<SykleError>().map_or(false, |se| matches!(se, SykleError::Cancelled)) => {
//!         println!("Cancelled");
//!     },
//!     Err(e) => return Err(e),
//! }
//! ```
//!
use thiserror::Error;

/// One captured command failure inside a batch. Carries the exact command
/// line that ran so a failure can be replayed by hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandFailure {
    /// The fully composed command line, verbatim as executed.
    pub command: String,
    /// The child's exit code.
    pub code: i32,
}

/// Custom error type for the sykle application.
#[derive(Error, Debug)]
pub enum SykleError {
    #[error("Config file '{path}' does not exist!\nYou can create an empty config by running:\n    syk init")]
    ConfigNotFound { path: String },

    #[error("Config decode error: {0}")]
    ConfigDecode(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Unknown deployment \"{name}\"")]
    UnknownDeployment { name: String },

    #[error("Deployment \"{name}\" has no target!")]
    InvalidDeployment { name: String },

    #[error("Unknown alias \"{name}\"")]
    UnknownAlias { name: String },

    #[error("Unknown alias/plugin \"{name}\"")]
    UnknownPlugin { name: String },

    #[error("Command returned a non-zero exit code ({code}): {command}")]
    NonZeroExit { code: i32, command: String },

    #[error("{}", batch_failed_summary(.failures))]
    BatchFailed { failures: Vec<CommandFailure> },

    #[error("Cancelled")]
    Cancelled,
}

/// Terse one-line-per-command summary for an aggregated batch failure.
/// Debug mode renders a fuller per-command report separately (see `main.rs`).
fn batch_failed_summary(failures: &[CommandFailure]) -> String {
    let commands: Vec<&str> = failures.iter().map(|f| f.command.as_str()).collect();
    format!(
        "{} command(s) failed:\n  {}",
        failures.len(),
        commands.join("\n  ")
    )
}

/// Type alias for Result using anyhow::Error for broad compatibility.
/// Anyhow allows for easy context addition and flexible error handling.
pub type Result<T> = anyhow::Result<T>;

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let not_found = SykleError::ConfigNotFound {
            path: ".sykle.json".into(),
        };
        assert!(not_found
            .to_string()
            .contains("'.sykle.json' does not exist"));
        assert!(not_found.to_string().contains("syk init"));

        let unknown = SykleError::UnknownDeployment {
            name: "staging".into(),
        };
        assert_eq!(unknown.to_string(), "Unknown deployment \"staging\"");

        let invalid = SykleError::InvalidDeployment {
            name: "staging".into(),
        };
        assert_eq!(invalid.to_string(), "Deployment \"staging\" has no target!");
    }

    #[test]
    fn test_non_zero_exit_display_carries_command() {
        let err = SykleError::NonZeroExit {
            code: 2,
            command: "docker-compose -p app-dev -f ./docker-compose.yml up".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("(2)"));
        assert!(msg.contains("docker-compose -p app-dev"));
    }

    #[test]
    fn test_batch_failed_lists_every_command_in_order() {
        let err = SykleError::BatchFailed {
            failures: vec![
                CommandFailure {
                    command: "first".into(),
                    code: 1,
                },
                CommandFailure {
                    command: "second".into(),
                    code: 2,
                },
            ],
        };
        let msg = err.to_string();
        assert!(msg.starts_with("2 command(s) failed"));
        let first = msg.find("first").unwrap();
        let second = msg.find("second").unwrap();
        assert!(first < second);
    }
}
