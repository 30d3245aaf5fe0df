//! Generator configuration.

use crate::error::{CodegenError, Result};

/// Default path under which every generated artifact module is mounted.
pub const DEFAULT_MODULE_PREFIX: &str = "crate";

/// Default path of the runtime crate imported by generated code.
pub const DEFAULT_RUNTIME_PATH: &str = "::idlgen";

/// Options controlling the generated code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Module path under which the artifact modules live, e.g. `crate::generated`.
    pub module_prefix: String,
    /// Path of the runtime crate exposing `core` and `rpc`.
    pub runtime_path: String,
    /// Wraps every artifact in an extra innermost `embedded` module.
    pub embedded_namespace: bool,
    /// Emits the server skeleton artifact for each service.
    pub generate_skeleton: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            module_prefix: DEFAULT_MODULE_PREFIX.to_string(),
            runtime_path: DEFAULT_RUNTIME_PATH.to_string(),
            embedded_namespace: false,
            generate_skeleton: true,
        }
    }
}

impl GeneratorConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the module prefix used for cross-artifact references.
    #[must_use]
    pub fn with_module_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.module_prefix = prefix.into();
        self
    }

    /// Sets the runtime crate path.
    #[must_use]
    pub fn with_runtime_path(mut self, path: impl Into<String>) -> Self {
        self.runtime_path = path.into();
        self
    }

    /// Enables or disables the extra `embedded` module.
    #[must_use]
    pub fn with_embedded_namespace(mut self, enabled: bool) -> Self {
        self.embedded_namespace = enabled;
        self
    }

    /// Enables or disables server skeleton output.
    #[must_use]
    pub fn with_skeleton(mut self, enabled: bool) -> Self {
        self.generate_skeleton = enabled;
        self
    }

    /// Parses a comma separated generator option string.
    ///
    /// Recognized options are `include_prefix=<path>`, `runtime=<path>`,
    /// `embedded_namespace` and `no_skeleton`. An empty string yields the
    /// defaults.
    ///
    /// # Errors
    /// Returns `CodegenError::InvalidOption` for unknown keys, missing values
    /// and values that are not module paths.
    pub fn from_options(options: &str) -> Result<Self> {
        let mut config = Self::default();
        for option in options.split(',').map(str::trim).filter(|o| !o.is_empty()) {
            let (key, value) = match option.split_once('=') {
                Some((key, value)) => (key.trim(), Some(value.trim())),
                None => (option, None),
            };
            match (key, value) {
                ("include_prefix", Some(path)) => {
                    config.module_prefix = parse_path(option, path)?;
                }
                ("runtime", Some(path)) => {
                    config.runtime_path = parse_path(option, path)?;
                }
                ("embedded_namespace", None) => config.embedded_namespace = true,
                ("no_skeleton", None) => config.generate_skeleton = false,
                ("include_prefix" | "runtime", None) => {
                    return Err(invalid(option, "expected a value"));
                }
                ("embedded_namespace" | "no_skeleton", Some(_)) => {
                    return Err(invalid(option, "option takes no value"));
                }
                _ => return Err(invalid(option, "unknown option")),
            }
        }
        Ok(config)
    }
}

fn invalid(option: &str, message: &str) -> CodegenError {
    CodegenError::InvalidOption {
        option: option.to_string(),
        message: message.to_string(),
    }
}

/// Accepts `a::b`, `crate::x` and `::a` style paths.
fn parse_path(option: &str, path: &str) -> Result<String> {
    let body = path.strip_prefix("::").unwrap_or(path);
    let valid = !body.is_empty()
        && body.split("::").all(|segment| {
            let mut chars = segment.chars();
            chars
                .next()
                .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        });
    if valid {
        Ok(path.to_string())
    } else {
        Err(invalid(option, "not a module path"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GeneratorConfig::default();
        assert_eq!(config.module_prefix, "crate");
        assert_eq!(config.runtime_path, "::idlgen");
        assert!(!config.embedded_namespace);
        assert!(config.generate_skeleton);
        assert_eq!(GeneratorConfig::from_options("").unwrap(), config);
    }

    #[test]
    fn test_builder() {
        let config = GeneratorConfig::new()
            .with_module_prefix("crate::generated")
            .with_runtime_path("::my_runtime")
            .with_embedded_namespace(true)
            .with_skeleton(false);
        assert_eq!(config.module_prefix, "crate::generated");
        assert_eq!(config.runtime_path, "::my_runtime");
        assert!(config.embedded_namespace);
        assert!(!config.generate_skeleton);
    }

    #[test]
    fn test_from_options() {
        let config = GeneratorConfig::from_options(
            "include_prefix=crate::gen, embedded_namespace,no_skeleton",
        )
        .unwrap();
        assert_eq!(config.module_prefix, "crate::gen");
        assert!(config.embedded_namespace);
        assert!(!config.generate_skeleton);
    }

    #[test]
    fn test_from_options_rejects_bad_input() {
        for options in [
            "include_prefix",
            "include_prefix=a::",
            "include_prefix=1abc",
            "embedded_namespace=yes",
            "colour=blue",
        ] {
            assert!(
                matches!(
                    GeneratorConfig::from_options(options),
                    Err(CodegenError::InvalidOption { .. })
                ),
                "{options} should be rejected"
            );
        }
    }
}
