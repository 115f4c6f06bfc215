//! # Sykle Environment Interpolation
//!
//! File: cli/src/core/interpolate.rs
//! Repository: https://github.com/typecode/sykle
//!
//! ## Overview
//!
//! Pure substitution of `$NAME`-prefixed configuration values with values
//! from a supplied environment mapping. Deployment `docker_vars` use this to
//! reference local environment variables (EX: `"BUILD_NUMBER": "$BUILD_NUMBER"`)
//! without hardcoding them into `.sykle.json`.
//!
//! ## Rules
//!
//! - `null` or an empty string interpolates to the empty string.
//! - A value not starting with `$` passes through unchanged (stringified).
//! - A value starting with `$` is replaced by the environment value for the
//!   name after the `$`, or the empty string when the name is absent.
//!
//! Missing environment variables never fail: optional variables must not
//! block execution.
//!
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

/// Raw `docker_vars` as they appear in the config document. BTreeMap keeps
/// the rendered `KEY=VALUE` order stable across invocations.
pub type RawVars = BTreeMap<String, Value>;

/// Fully interpolated variables, ready to merge into a child environment or
/// render as inline `KEY=VALUE` prefixes.
pub type ResolvedVars = BTreeMap<String, String>;

/// Substitutes `$NAME` values in `values` using `env`.
///
/// Pure and total: no side effects, no errors. Interpolation happens at the
/// point of use and the result is never written back into the document.
pub fn interpolate(values: &RawVars, env: &HashMap<String, String>) -> ResolvedVars {
    let mut resolved = BTreeMap::new();
    for (key, raw) in values {
        let value = stringify(raw);
        let interpolated = match value.strip_prefix('$') {
            Some(name) => env.get(name).cloned().unwrap_or_default(),
            None => value,
        };
        resolved.insert(key.clone(), interpolated);
    }
    resolved
}

/// Like [`interpolate`], but sourcing the environment from the current
/// process. Recomputed on every call: the process environment can change
/// within a long-lived process and a stale interpolation must never be reused.
pub fn interpolate_process_env(values: &RawVars) -> ResolvedVars {
    interpolate(values, &std::env::vars().collect())
}

/// Renders a JSON config value as the string the child environment sees.
/// `null` becomes empty; strings are used as-is; numbers and booleans are
/// rendered in their JSON form.
fn stringify(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn vars(pairs: &[(&str, Value)]) -> RawVars {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_empty_input_yields_empty_output() {
        assert!(interpolate(&RawVars::new(), &env(&[("X", "v")])).is_empty());
    }

    #[test]
    fn test_null_becomes_empty_string() {
        let resolved = interpolate(&vars(&[("k", Value::Null)]), &HashMap::new());
        assert_eq!(resolved.get("k").map(String::as_str), Some(""));
    }

    #[test]
    fn test_missing_env_var_becomes_empty_string() {
        let resolved = interpolate(&vars(&[("k", json!("$X"))]), &HashMap::new());
        assert_eq!(resolved.get("k").map(String::as_str), Some(""));
    }

    #[test]
    fn test_env_var_is_substituted() {
        let resolved = interpolate(&vars(&[("k", json!("$X"))]), &env(&[("X", "v")]));
        assert_eq!(resolved.get("k").map(String::as_str), Some("v"));
    }

    #[test]
    fn test_literal_passes_through() {
        let resolved = interpolate(&vars(&[("k", json!("literal"))]), &HashMap::new());
        assert_eq!(resolved.get("k").map(String::as_str), Some("literal"));
    }

    #[test]
    fn test_number_is_stringified() {
        let resolved = interpolate(&vars(&[("PORT", json!(8887))]), &HashMap::new());
        assert_eq!(resolved.get("PORT").map(String::as_str), Some("8887"));
    }

    #[test]
    fn test_dollar_name_only_strips_leading_dollar() {
        // `$A$B` looks up the env var literally named `A$B`.
        let resolved = interpolate(
            &vars(&[("k", json!("$A$B"))]),
            &env(&[("A$B", "joined")]),
        );
        assert_eq!(resolved.get("k").map(String::as_str), Some("joined"));
    }
}
