//! Top-level configuration and file loading

use crate::logging::LoggingConfig;
use crate::patterns::PatternTable;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error while reading the config file
    #[error("I/O error reading {path}: {source}")]
    Io {
        /// File that failed to read
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The file extension does not map to a supported format
    #[error("unsupported config format for {0} (expected .toml, .yaml, .yml or .json)")]
    UnsupportedFormat(PathBuf),

    /// TOML parsing error
    #[cfg(feature = "toml")]
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// YAML parsing error
    #[cfg(feature = "yaml")]
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for config operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Session logger settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Directory that receives `<session>.jsonl` files and summaries
    pub log_dir: PathBuf,
    /// Model name recorded in the session start metadata
    pub model: Option<String>,
    /// Experiment version recorded in the session start metadata
    pub experiment_version: String,
    /// Call `sync_data` after every appended line
    pub fsync_each_write: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("consciousness_logs"),
            model: Some("microsoft/Phi-3-mini-4k-instruct".to_string()),
            experiment_version: "1.0".to_string(),
            fsync_each_write: false,
        }
    }
}

/// Host sensor sampling settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    /// Time between the two CPU refreshes of a snapshot, in milliseconds
    pub cpu_sample_interval_ms: u64,
    /// Whether to walk the process table (the slowest category)
    pub collect_processes: bool,
    /// Mount point used for `disk_usage_percent`
    pub disk_mount_point: PathBuf,
    /// Length of each microphone capture, in milliseconds
    pub audio_window_ms: u64,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            cpu_sample_interval_ms: 100,
            collect_processes: true,
            disk_mount_point: PathBuf::from("/"),
            audio_window_ms: 100,
        }
    }
}

/// Complete mindtrace configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MindtraceConfig {
    /// Session log settings
    pub logger: LoggerConfig,
    /// Lexical pattern table used by the classifier
    pub patterns: PatternTable,
    /// Sensor sampling settings
    pub sensors: SensorConfig,
    /// Diagnostic output settings
    pub logging: LoggingConfig,
}

impl MindtraceConfig {
    /// Load configuration from a file, choosing the format by extension
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(path, &content)?;
        debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Load configuration, falling back to defaults if the file does not exist
    pub fn load_or_default(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Parse configuration text whose format is implied by `path`
    pub fn parse(path: &Path, content: &str) -> ConfigResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            #[cfg(feature = "toml")]
            Some("toml") => Ok(toml::from_str(content)?),
            #[cfg(feature = "yaml")]
            Some("yaml") | Some("yml") => Ok(serde_yaml::from_str(content)?),
            Some("json") => Ok(serde_json::from_str(content)?),
            _ => Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    /// Default per-user config location (`<config dir>/mindtrace/config.toml`)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("mindtrace").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::LogFormat;
    use crate::patterns::MatchMode;
    use tempfile::TempDir;
    use test_case::test_case;

    #[test]
    fn defaults_match_documented_values() {
        let config = MindtraceConfig::default();
        assert_eq!(config.logger.log_dir, PathBuf::from("consciousness_logs"));
        assert_eq!(config.logger.experiment_version, "1.0");
        assert!(!config.logger.fsync_each_write);
        assert_eq!(config.sensors.cpu_sample_interval_ms, 100);
        assert!(config.sensors.collect_processes);
        assert_eq!(config.sensors.audio_window_ms, 100);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn parses_toml_with_partial_sections() {
        let toml_str = r#"
[logger]
log_dir = "/tmp/thoughts"
fsync_each_write = true

[patterns.emotional_language]
mode = "substring"
words = ["happy", "grumpy"]

[logging]
format = "json"
"#;
        let config = MindtraceConfig::parse(Path::new("c.toml"), toml_str).unwrap();

        assert_eq!(config.logger.log_dir, PathBuf::from("/tmp/thoughts"));
        assert!(config.logger.fsync_each_write);
        assert_eq!(config.logger.experiment_version, "1.0");
        assert_eq!(config.patterns.emotional_language.words.len(), 2);
        assert_eq!(config.patterns.questioning.mode, MatchMode::Literal);
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn parses_yaml() {
        let yaml = "logger:\n  model: tiny-model\nsensors:\n  collect_processes: false\n";
        let config = MindtraceConfig::parse(Path::new("c.yml"), yaml).unwrap();

        assert_eq!(config.logger.model.as_deref(), Some("tiny-model"));
        assert!(!config.sensors.collect_processes);
    }

    #[test]
    fn parses_json() {
        let json = r#"{"sensors": {"cpu_sample_interval_ms": 250, "audio_window_ms": 40}}"#;
        let config = MindtraceConfig::parse(Path::new("c.JSON"), json).unwrap();
        assert_eq!(config.sensors.cpu_sample_interval_ms, 250);
        assert_eq!(config.sensors.audio_window_ms, 40);
        assert!(config.sensors.collect_processes);
    }

    #[test_case("config.ini" ; "ini")]
    #[test_case("config" ; "no extension")]
    fn rejects_unknown_extensions(name: &str) {
        let err = MindtraceConfig::parse(Path::new(name), "").unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
    }

    #[test]
    fn load_or_default_handles_missing_file() {
        let dir = TempDir::new().unwrap();
        let config = MindtraceConfig::load_or_default(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, MindtraceConfig::default());
    }

    #[test]
    fn load_reads_file_from_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mindtrace.toml");
        std::fs::write(&path, "[logger]\nexperiment_version = \"2.1\"\n").unwrap();

        let config = MindtraceConfig::load(&path).unwrap();
        assert_eq!(config.logger.experiment_version, "2.1");
    }

    #[test]
    fn load_reports_missing_file_as_io() {
        let dir = TempDir::new().unwrap();
        let err = MindtraceConfig::load(dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn default_path_ends_with_crate_dir() {
        if let Some(path) = MindtraceConfig::default_path() {
            assert!(path.ends_with("mindtrace/config.toml"));
        }
    }
}
