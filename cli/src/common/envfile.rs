//! # Sykle Env File Reader
//!
//! File: cli/src/common/envfile.rs
//! Repository: https://github.com/typecode/sykle
//!
//! ## Overview
//!
//! Reads the simple `KEY=VALUE` environment files referenced by deployments
//! (`env_file`) and by per-command `env` settings. One assignment per line;
//! blank lines and `#` comments are skipped; surrounding single or double
//! quotes around a value are stripped.
//!
//! Order is preserved: the pairs are later rendered as positional
//! `--build-arg`/`-e` argv flags, and a stable order keeps composed command
//! lines reproducible between runs.
//!
use crate::core::error::Result;
use anyhow::Context;
use std::path::Path;

/// Parses `path` into an ordered list of `(KEY, VALUE)` pairs.
///
/// A referenced but unreadable file is a hard error: a deployment that names
/// an env file expects its contents to reach the containers.
pub fn read_env_file(path: &Path) -> Result<Vec<(String, String)>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read env file: {}", path.display()))?;
    Ok(parse_env_file(&content))
}

/// Parses env-file text. Lines without `=` are ignored rather than rejected;
/// env files in the wild carry stray `export`-less junk lines.
pub fn parse_env_file(content: &str) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            let key = key.trim();
            if key.is_empty() {
                continue;
            }
            pairs.push((key.to_string(), unquote(value.trim()).to_string()));
        }
    }
    pairs
}

/// Strips one matching pair of surrounding quotes, if present.
fn unquote(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && (first == b'"' || first == b'\'') {
            return &value[1..value.len() - 1];
        }
    }
    value
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_parse_basic_pairs_in_order() {
        let pairs = parse_env_file("A=1\nB=two\nC=three");
        assert_eq!(
            pairs,
            vec![
                ("A".to_string(), "1".to_string()),
                ("B".to_string(), "two".to_string()),
                ("C".to_string(), "three".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_skips_comments_and_blanks() {
        let pairs = parse_env_file("# leading comment\n\nKEY=value\n   \n# trailing");
        assert_eq!(pairs, vec![("KEY".to_string(), "value".to_string())]);
    }

    #[test]
    fn test_parse_strips_matching_quotes() {
        let pairs = parse_env_file("A=\"quoted\"\nB='single'\nC=\"unbalanced");
        assert_eq!(pairs[0].1, "quoted");
        assert_eq!(pairs[1].1, "single");
        assert_eq!(pairs[2].1, "\"unbalanced");
    }

    #[test]
    fn test_parse_keeps_equals_in_value() {
        let pairs = parse_env_file("DATABASE_URL=postgres://u:p@host/db?sslmode=require");
        assert_eq!(pairs[0].1, "postgres://u:p@host/db?sslmode=require");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = read_env_file(&PathBuf::from("/definitely/not/here/.env"));
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Failed to read env file"));
    }
}
