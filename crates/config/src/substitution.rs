use anyhow::Result;
use regex::Regex;
use std::env;
use std::sync::OnceLock;
use tracing::{debug, warn};

/// Matches `${VAR}` and `${VAR:-fallback}`
fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\$\{(\w+)(?::-([^}]*))?\}").unwrap_or_else(|e| panic!("invalid placeholder regex: {e}"))
    })
}

/// Substitute environment variables written as `${VAR_NAME}` or `${VAR_NAME:-fallback}`
///
/// Unset variables without a fallback are left in place so the validator can
/// report them.
pub fn substitute_env_vars(content: &str) -> Result<String> {
    let mut missing_vars = Vec::new();

    let result = placeholder_regex().replace_all(content, |caps: &regex::Captures<'_>| {
        let var_name = &caps[1];
        match env::var(var_name) {
            Ok(value) => {
                debug!(var = var_name, "Substituting environment variable");
                value
            }
            Err(_) => match caps.get(2) {
                Some(fallback) => fallback.as_str().to_string(),
                None => {
                    warn!("Environment variable '{}' not set", var_name);
                    missing_vars.push(var_name.to_string());
                    caps[0].to_string()
                }
            },
        }
    });

    if !missing_vars.is_empty() {
        debug!(
            "Environment variables not set (may be optional or fail validation): {:?}",
            missing_vars
        );
    }

    Ok(result.into_owned())
}

/// Get environment variable with a default value
pub fn get_env_or_default(var_name: &str, default: &str) -> String {
    match env::var(var_name) {
        Ok(value) => value,
        Err(_) => {
            warn!(
                "Environment variable '{}' not set, using default: \"{}\"",
                var_name, default
            );
            default.to_string()
        }
    }
}

/// Check if a string contains unresolved environment variable placeholders
pub fn has_unresolved_env_vars(content: &str) -> bool {
    placeholder_regex().is_match(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitutes_set_variable() {
        env::set_var("TICKERWIRE_TEST_SUBST_SET", "s3cret");
        let out = substitute_env_vars("secret: ${TICKERWIRE_TEST_SUBST_SET}").unwrap();
        assert_eq!(out, "secret: s3cret");
    }

    #[test]
    fn test_keeps_unset_placeholder() {
        let out = substitute_env_vars("key: ${TICKERWIRE_TEST_SURELY_UNSET}").unwrap();
        assert_eq!(out, "key: ${TICKERWIRE_TEST_SURELY_UNSET}");
        assert!(has_unresolved_env_vars(&out));
    }

    #[test]
    fn test_fallback_used_when_unset() {
        let out = substitute_env_vars("port: ${TICKERWIRE_TEST_UNSET_PORT:-8080}").unwrap();
        assert_eq!(out, "port: 8080");
    }

    #[test]
    fn test_dollar_amounts_are_not_placeholders() {
        assert!(!has_unresolved_env_vars("costs $5 or $HOME"));
    }
}
