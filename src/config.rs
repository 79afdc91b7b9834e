//! Runtime configuration.
//!
//! Values come from `RISK_PREDICTOR_*` environment variables with defaults
//! that work from the repository root.

use std::path::PathBuf;
use std::time::Duration;

/// Model directory (`RISK_PREDICTOR_MODEL_DIR`).
pub const MODEL_DIR_ENV: &str = "RISK_PREDICTOR_MODEL_DIR";
/// Model artifact identifier (`RISK_PREDICTOR_MODEL_ID`).
pub const MODEL_ID_ENV: &str = "RISK_PREDICTOR_MODEL_ID";
/// Hospital list file (`RISK_PREDICTOR_HOSPITALS_FILE`).
pub const HOSPITALS_FILE_ENV: &str = "RISK_PREDICTOR_HOSPITALS_FILE";
/// `auto`, `file` or `stdout` (`RISK_PREDICTOR_LOG_MODE`).
pub const LOG_MODE_ENV: &str = "RISK_PREDICTOR_LOG_MODE";
/// Log file used in file mode (`RISK_PREDICTOR_LOG_FILE`).
pub const LOG_FILE_ENV: &str = "RISK_PREDICTOR_LOG_FILE";

pub const DEFAULT_MODEL_DIR: &str = "models";
pub const DEFAULT_MODEL_ID: &str = "patient_risk_gbm";
pub const DEFAULT_HOSPITALS_FILE: &str = "hospital_levels.txt";
pub const DEFAULT_LOG_FILE: &str = "risk_predictor.log";

/// Where log output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogMode {
    /// File when attached to a terminal, stdout otherwise
    Auto,
    File,
    Stdout,
}

impl LogMode {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "file" => Self::File,
            "stdout" => Self::Stdout,
            _ => Self::Auto,
        }
    }

    /// Whether logs go to the log file, given whether stdout is a terminal.
    #[must_use]
    pub fn uses_file(&self, interactive: bool) -> bool {
        match self {
            Self::Auto => interactive,
            Self::File => true,
            Self::Stdout => false,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub model_dir: PathBuf,
    pub model_id: String,
    pub hospitals_file: PathBuf,
    pub log_mode: LogMode,
    pub log_file: PathBuf,

    /// How long the loading splash stays up at startup
    pub startup_delay: Duration,

    /// Delay between showing the busy indicator and calling the predictor
    pub dispatch_delay: Duration,

    /// Busy indicator animation period
    pub indicator_tick: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from(DEFAULT_MODEL_DIR),
            model_id: DEFAULT_MODEL_ID.to_string(),
            hospitals_file: PathBuf::from(DEFAULT_HOSPITALS_FILE),
            log_mode: LogMode::Auto,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            startup_delay: Duration::from_millis(2000),
            dispatch_delay: Duration::from_millis(100),
            indicator_tick: Duration::from_millis(30),
        }
    }
}

impl AppConfig {
    /// Read configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through `lookup`; unset or blank values keep
    /// their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Self {
            model_dir: get(MODEL_DIR_ENV).map_or(defaults.model_dir, PathBuf::from),
            model_id: get(MODEL_ID_ENV)
                .map(|v| v.trim().to_string())
                .unwrap_or(defaults.model_id),
            hospitals_file: get(HOSPITALS_FILE_ENV).map_or(defaults.hospitals_file, PathBuf::from),
            log_mode: get(LOG_MODE_ENV).map_or(defaults.log_mode, |v| LogMode::parse(&v)),
            log_file: get(LOG_FILE_ENV).map_or(defaults.log_file, PathBuf::from),
            ..defaults
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_when_unset() {
        let config = AppConfig::from_lookup(|_| None);
        assert_eq!(config.model_dir, PathBuf::from("models"));
        assert_eq!(config.model_id, "patient_risk_gbm");
        assert_eq!(config.hospitals_file, PathBuf::from("hospital_levels.txt"));
        assert_eq!(config.log_mode, LogMode::Auto);
        assert_eq!(config.startup_delay, Duration::from_millis(2000));
        assert_eq!(config.dispatch_delay, Duration::from_millis(100));
        assert_eq!(config.indicator_tick, Duration::from_millis(30));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            (MODEL_DIR_ENV, "/opt/models"),
            (MODEL_ID_ENV, " gbm_v2 "),
            (HOSPITALS_FILE_ENV, "/etc/hospitals.txt"),
            (LOG_MODE_ENV, "STDOUT"),
            (LOG_FILE_ENV, "   "),
        ]);
        let config = AppConfig::from_lookup(|name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(config.model_dir, PathBuf::from("/opt/models"));
        assert_eq!(config.model_id, "gbm_v2");
        assert_eq!(config.hospitals_file, PathBuf::from("/etc/hospitals.txt"));
        assert_eq!(config.log_mode, LogMode::Stdout);
        assert_eq!(config.log_file, PathBuf::from(DEFAULT_LOG_FILE));
    }

    #[test]
    fn test_log_mode_selection() {
        assert!(LogMode::Auto.uses_file(true));
        assert!(!LogMode::Auto.uses_file(false));
        assert!(LogMode::File.uses_file(false));
        assert!(!LogMode::Stdout.uses_file(true));
        assert_eq!(LogMode::parse("bogus"), LogMode::Auto);
    }
}
