use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_aux::prelude::deserialize_vec_from_string_or_vec;
use std::fmt;

/// Application configuration loaded from multiple sources.
///
/// Configuration is loaded in priority order (lowest to highest):
/// 1. Struct defaults
/// 2. config.yaml file (if exists)
/// 3. Environment variables with EDGE_ prefix (always wins)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub security_headers: SecurityHeadersConfig,
    /// Deployment environment. Controls whether the CSP header is attached.
    #[serde(default)]
    pub environment: Environment,
}

/// Deployment environment the service runs in.
///
/// Only the exact string `"production"` selects [`Environment::Production`];
/// every other value (including absence) is treated as development, so a
/// misspelled setting degrades to the permissive mode rather than failing
/// startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl From<String> for Environment {
    fn from(value: String) -> Self {
        if value == "production" {
            Self::Production
        } else {
            Self::Development
        }
    }
}

impl Environment {
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => f.write_str("development"),
            Self::Production => f.write_str("production"),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// HTTP server port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// HTTP server bind address.
    #[serde(default = "default_host")]
    pub host: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level filter (debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CorsConfig {
    /// Allowed origins for CORS requests.
    /// Use `"*"` to allow any origin (not recommended for production).
    /// Accepts either an array or comma-separated string.
    /// Example: `["http://localhost:5173"]` or `"http://localhost:5173,https://shop.example.com"`
    #[serde(
        default = "default_allowed_origins",
        deserialize_with = "deserialize_string_list"
    )]
    pub allowed_origins: Vec<String>,
}

/// Deserialize a list from comma-separated string or array, filtering empty values.
fn deserialize_string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let values: Vec<String> = deserialize_vec_from_string_or_vec(deserializer)?;
    Ok(values.into_iter().filter(|s| !s.is_empty()).collect())
}

// These functions cannot be const because serde uses function pointers for defaults
#[allow(clippy::missing_const_for_fn)]
fn default_port() -> u16 {
    8080
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_allowed_origins() -> Vec<String> {
    // Default to empty (no cross-origin requests allowed) - safe for production
    // Configure explicitly via EDGE_CORS__ALLOWED_ORIGINS or config.yaml
    vec![]
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_allowed_origins(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SecurityHeadersConfig {
    /// Enable the security headers layer (default: true).
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Request path prefixes excluded from header injection.
    /// Defaults cover the fronted application's API and static asset routes.
    /// Accepts either an array or comma-separated string.
    #[serde(
        default = "default_exempt_path_prefixes",
        deserialize_with = "deserialize_string_list"
    )]
    pub exempt_path_prefixes: Vec<String>,

    /// Exact request paths excluded from header injection.
    /// Accepts either an array or comma-separated string.
    #[serde(
        default = "default_exempt_paths",
        deserialize_with = "deserialize_string_list"
    )]
    pub exempt_paths: Vec<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_true() -> bool {
    true
}

fn default_exempt_path_prefixes() -> Vec<String> {
    vec![
        "/api/".to_string(),
        "/_next/static/".to_string(),
        "/_next/image/".to_string(),
    ]
}

fn default_exempt_paths() -> Vec<String> {
    vec!["/favicon.ico".to_string()]
}

impl Default for SecurityHeadersConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            exempt_path_prefixes: default_exempt_path_prefixes(),
            exempt_paths: default_exempt_paths(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                port: default_port(),
                host: default_host(),
            },
            logging: LoggingConfig {
                level: default_log_level(),
            },
            cors: CorsConfig::default(),
            security_headers: SecurityHeadersConfig::default(),
            environment: Environment::default(),
        }
    }
}

/// Configuration loading and validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Figment(#[from] Box<figment::Error>),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// Sources are merged in priority order:
    /// 1. Struct defaults (lowest)
    /// 2. config.yaml file (if exists)
    /// 3. Environment variables with EDGE_ prefix (highest)
    ///
    /// # Errors
    /// Returns an error if configuration cannot be loaded or is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config.yaml")
    }

    /// Load configuration with a custom YAML file path.
    ///
    /// # Errors
    /// Returns an error if configuration cannot be loaded or is invalid.
    pub fn load_from(yaml_path: &str) -> Result<Self, ConfigError> {
        let config: Self = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Yaml::file(yaml_path))
            .merge(Env::prefixed("EDGE_").split("__"))
            .extract()?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    /// Returns an error if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Port must be non-zero
        if self.server.port == 0 {
            return Err(ConfigError::Validation("server.port cannot be 0".into()));
        }

        // CORS origins must be valid URLs or "*"
        for origin in &self.cors.allowed_origins {
            if origin != "*" && !origin.starts_with("http://") && !origin.starts_with("https://") {
                return Err(ConfigError::Validation(format!(
                    "cors.allowed_origins contains invalid origin '{origin}'. Must be '*' or start with http:// or https://"
                )));
            }
        }

        // Exempt entries are matched against the request path, which always
        // carries a leading slash
        for prefix in &self.security_headers.exempt_path_prefixes {
            if !prefix.starts_with('/') {
                return Err(ConfigError::Validation(format!(
                    "security_headers.exempt_path_prefixes entry '{prefix}' must start with '/'"
                )));
            }
        }
        for path in &self.security_headers.exempt_paths {
            if !path.starts_with('/') {
                return Err(ConfigError::Validation(format!(
                    "security_headers.exempt_paths entry '{path}' must start with '/'"
                )));
            }
        }

        Ok(())
    }
}
