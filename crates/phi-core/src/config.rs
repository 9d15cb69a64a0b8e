//! Configuration loading for verifiers and the `phi` binary.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::CoreError;

/// Full Phi configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PhiConfig {
    /// Credential verification settings.
    #[serde(default)]
    pub verifier: VerifierConfig,

    /// Registry access settings.
    #[serde(default)]
    pub registry: RegistryConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct VerifierConfig {
    /// How far in the future an `issuanceDate` may lie, in seconds.
    #[serde(default)]
    pub clock_skew_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Per-attempt timeout for a remote resolution.
    #[serde(default = "default_resolve_timeout_ms")]
    pub resolve_timeout_ms: u64,
    /// Retries after a timed-out attempt. Values above 1 are clamped.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (text, json).
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_resolve_timeout_ms() -> u64 {
    2_000
}
fn default_max_retries() -> u32 {
    1
}
fn default_log_level() -> String {
    "info".into()
}
fn default_log_format() -> String {
    "text".into()
}

impl VerifierConfig {
    /// Clock-skew tolerance as a `Duration`.
    pub fn clock_skew(&self) -> Duration {
        Duration::from_secs(self.clock_skew_secs)
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            resolve_timeout_ms: default_resolve_timeout_ms(),
            max_retries: default_max_retries(),
        }
    }
}

impl RegistryConfig {
    /// Per-attempt resolution timeout.
    pub fn resolve_timeout(&self) -> Duration {
        Duration::from_millis(self.resolve_timeout_ms)
    }

    /// Effective retry count; at most one retry is ever attempted.
    pub fn effective_retries(&self) -> u32 {
        self.max_retries.min(1)
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl PhiConfig {
    /// Load config from a TOML file, falling back to defaults for missing fields.
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            Self::from_toml(&contents)
        } else {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Parse config from a TOML string.
    pub fn from_toml(contents: &str) -> Result<Self, CoreError> {
        let config: PhiConfig =
            toml::from_str(contents).map_err(|e| CoreError::Config(e.to_string()))?;
        if !matches!(config.logging.format.as_str(), "text" | "json") {
            return Err(CoreError::Config(format!(
                "unknown log format '{}' (expected text or json)",
                config.logging.format
            )));
        }
        Ok(config)
    }

    /// Serialize the config as pretty TOML.
    pub fn to_toml(&self) -> Result<String, CoreError> {
        toml::to_string_pretty(self).map_err(|e| CoreError::Config(e.to_string()))
    }
}
