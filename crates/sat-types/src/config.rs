//! Interpreter configuration, passed explicitly to every pipeline stage.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Settings shared by the lexer, parser and evaluator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Emit a trace record on entry to every lex/parse/run routine.
    pub trace: bool,
    /// Polling behaviour of `healthcheck:`.
    pub healthcheck: HealthcheckConfig,
}

/// Fixed-interval polling settings for `healthcheck:`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthcheckConfig {
    pub interval_ms: u64,
    pub max_attempts: u32,
}

impl HealthcheckConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl Default for HealthcheckConfig {
    fn default() -> Self {
        Self {
            interval_ms: 1000,
            max_attempts: 100,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            trace: false,
            healthcheck: HealthcheckConfig::default(),
        }
    }
}

impl Config {
    /// Default configuration with tracing switched on.
    pub fn traced() -> Self {
        Self {
            trace: true,
            ..Self::default()
        }
    }

    /// Load a configuration from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Emit a trace record for `stage` if tracing is enabled.
    pub fn trace(&self, stage: &str, detail: impl fmt::Display) {
        if self.trace {
            log::trace!(target: "sat", "{stage}\n\t{detail}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(!config.trace);
        assert_eq!(config.healthcheck.max_attempts, 100);
        assert_eq!(config.healthcheck.interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_from_json_partial() {
        let config = Config::from_json(r#"{"healthcheck": {"max_attempts": 5}}"#).unwrap();
        assert!(!config.trace);
        assert_eq!(config.healthcheck.max_attempts, 5);
        assert_eq!(config.healthcheck.interval_ms, 1000);
    }

    #[test]
    fn test_from_json_empty_object() {
        assert_eq!(Config::from_json("{}").unwrap(), Config::default());
    }

    #[test]
    fn test_traced() {
        assert!(Config::traced().trace);
    }
}
