//! Environment variable expansion for configuration strings.

use crate::ConfigError;

/// Expand environment variable references in a string.
///
/// Supports:
/// - `${VAR}` - expands to the value of VAR, errors if unset
/// - `${VAR:-default}` - expands to VAR if set, otherwise uses default
///
/// Bare `$VAR` is left alone so that paths containing `$` survive.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |var| -> Result<Option<String>, UnsetVar> {
        std::env::var(var)
            .map(Some)
            .map_err(|_| UnsetVar(var.to_owned()))
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{}}} not set", e.cause.0),
    })
}

/// Optional variant of [`expand_env`].
pub(crate) fn expand_opt(value: Option<&str>, field: &str) -> Result<Option<String>, ConfigError> {
    value.map(|v| expand_env(v, field)).transpose()
}

/// Name of an environment variable that is not set.
struct UnsetVar(String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_var() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::set_var("DOCTEX_TEST_BOOKS", "/srv/books");
        }
        let result = expand_env("${DOCTEX_TEST_BOOKS}/急救", "handbooks.source").unwrap();
        assert_eq!(result, "/srv/books/急救");
        unsafe {
            std::env::remove_var("DOCTEX_TEST_BOOKS");
        }
    }

    #[test]
    fn test_expand_default() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::remove_var("DOCTEX_TEST_UNSET_OUT");
        }
        let result = expand_env("${DOCTEX_TEST_UNSET_OUT:-output}", "output.dir").unwrap();
        assert_eq!(result, "output");
    }

    #[test]
    fn test_expand_missing_var_error() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::remove_var("DOCTEX_TEST_MISSING");
        }
        let err = expand_env("${DOCTEX_TEST_MISSING}", "assets.image_dir").unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("DOCTEX_TEST_MISSING"));
        assert!(err.to_string().contains("assets.image_dir"));
    }

    #[test]
    fn test_bare_dollar_not_expanded() {
        assert_eq!(expand_env("$HOME/docs", "document.source").unwrap(), "$HOME/docs");
    }

    #[test]
    fn test_expand_opt_none() {
        assert_eq!(expand_opt(None, "modules.config").unwrap(), None);
    }
}
