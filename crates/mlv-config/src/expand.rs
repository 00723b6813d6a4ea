//! `${VAR}` and `${VAR:-default}` expansion for configuration strings.

use crate::ConfigError;

/// Expand environment variable references in `value`.
///
/// Only the braced form is recognised; a bare `$VAR` is left as written.
/// `field` names the config key in error messages.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |var| -> Result<Option<String>, Unset> {
        std::env::var(var).map(Some).map_err(|_| Unset(var.to_owned()))
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{}}} not set", e.cause.0),
    })
}

/// Lookup failure carrying the variable name.
struct Unset(String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_set_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("MLV_EXPAND_SET", "content");
        }
        let result = expand_env("${MLV_EXPAND_SET}/lessons", "content.root").unwrap();
        assert_eq!(result, "content/lessons");
        unsafe {
            std::env::remove_var("MLV_EXPAND_SET");
        }
    }

    #[test]
    fn test_expand_default_when_unset() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("MLV_EXPAND_UNSET");
        }
        let result = expand_env("${MLV_EXPAND_UNSET:-0.0.0.0}", "server.host").unwrap();
        assert_eq!(result, "0.0.0.0");
    }

    #[test]
    fn test_expand_missing_var_names_field() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("MLV_EXPAND_MISSING");
        }
        let err = expand_env("${MLV_EXPAND_MISSING}", "progress.dir").unwrap_err();

        assert!(matches!(err, ConfigError::EnvVar { .. }));
        let message = err.to_string();
        assert!(message.contains("MLV_EXPAND_MISSING"));
        assert!(message.contains("progress.dir"));
    }

    #[test]
    fn test_bare_dollar_left_alone() {
        assert_eq!(expand_env("$HOME/x", "content.root").unwrap(), "$HOME/x");
    }
}
