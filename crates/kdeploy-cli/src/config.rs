//! Configuration for kdeploy-rollout

use kdeploy_resources::DEFAULT_LOG_TAIL_LINES;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main rollout watcher configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RolloutConfig {
    /// Seconds between sync cycles
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    /// Overrides the resource's own timeout
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Lines requested per container when printing debug logs
    #[serde(default = "default_log_tail_lines")]
    pub log_tail_lines: usize,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for RolloutConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval(),
            timeout_secs: None,
            log_tail_lines: default_log_tail_lines(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// JSON format
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_poll_interval() -> u64 {
    3
}

fn default_log_tail_lines() -> usize {
    DEFAULT_LOG_TAIL_LINES
}

fn default_log_level() -> String {
    "info".to_string()
}

impl RolloutConfig {
    /// Load configuration from defaults, an optional file, then the environment
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        builder = builder.add_source(config::Config::try_from(&RolloutConfig::default())?);

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        // KDEPLOY_POLL_INTERVAL_SECS, KDEPLOY_LOGGING__LEVEL, ...
        builder = builder.add_source(
            config::Environment::with_prefix("KDEPLOY")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = RolloutConfig::default();
        assert_eq!(config.poll_interval(), Duration::from_secs(3));
        assert_eq!(config.timeout(), None);
        assert_eq!(config.log_tail_lines, 250);
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.json);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "poll_interval_secs: 10\ntimeout_secs: 120\nlogging:\n  level: debug").unwrap();

        let config = RolloutConfig::load(file.path().to_str()).unwrap();
        assert_eq!(config.poll_interval_secs, 10);
        assert_eq!(config.timeout(), Some(Duration::from_secs(120)));
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.log_tail_lines, 250);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = RolloutConfig::load(Some("/nonexistent/kdeploy-rollout")).unwrap();
        assert_eq!(config.poll_interval_secs, 3);
    }
}
