//! Configuration loading and management.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Engine configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Script discovery configuration.
    pub scripts: ScriptConfig,
    /// Dispatch/invocation configuration.
    pub engine: EngineConfig,
}

/// Script discovery configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScriptConfig {
    /// Directory scanned for script modules.
    pub dir: PathBuf,
    /// File extension of loadable scripts (without the dot).
    pub extension: String,
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("scripts"),
            extension: "rhai".to_string(),
        }
    }
}

/// Dispatch/invocation configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Per-invocation deadline for script handlers, in milliseconds.
    /// 0 means unbounded: a hanging handler blocks its processing slot.
    pub timeout_ms: u64,
}

impl EngineConfig {
    /// Configured invocation deadline, if any.
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_ms > 0).then(|| Duration::from_millis(self.timeout_ms))
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = Config::default();
        assert_eq!(config.scripts.dir, PathBuf::from("scripts"));
        assert_eq!(config.scripts.extension, "rhai");
        assert_eq!(config.engine.timeout(), None);
    }

    #[test]
    fn parses_partial_toml() {
        let config: Config = toml::from_str(
            r#"
            [scripts]
            dir = "/var/lib/subtext/scripts"

            [engine]
            timeout_ms = 250
            "#,
        )
        .expect("valid config");
        assert_eq!(config.scripts.dir, PathBuf::from("/var/lib/subtext/scripts"));
        assert_eq!(config.scripts.extension, "rhai");
        assert_eq!(config.engine.timeout(), Some(Duration::from_millis(250)));
    }
}
