//! Path exemption rules for the security header layer.

use crate::config::SecurityHeadersConfig;

/// Decides which request paths skip header injection.
///
/// A path is exempt when it starts with any configured prefix or equals any
/// configured exact path. Plain string comparison, no regex.
#[derive(Debug, Clone, Default)]
pub struct ExemptPaths {
    prefixes: Vec<String>,
    exact: Vec<String>,
}

impl ExemptPaths {
    #[must_use]
    pub const fn new(prefixes: Vec<String>, exact: Vec<String>) -> Self {
        Self { prefixes, exact }
    }

    /// Build the rule set from configuration.
    #[must_use]
    pub fn from_config(config: &SecurityHeadersConfig) -> Self {
        Self::new(
            config.exempt_path_prefixes.clone(),
            config.exempt_paths.clone(),
        )
    }

    /// Returns true if `path` is excluded from header injection.
    #[must_use]
    pub fn is_exempt(&self, path: &str) -> bool {
        self.exact.iter().any(|exact| exact == path)
            || self.prefixes.iter().any(|prefix| path.starts_with(prefix.as_str()))
    }
}
