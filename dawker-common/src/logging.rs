//! Per-level log file pipeline
//!
//! Console output is filtered by `RUST_LOG` (or the configured level). When
//! file logging is on, one file per level is written to the log directory:
//!
//! | File        | Receives                  |
//! |-------------|---------------------------|
//! | TRACE.log   | every record              |
//! | DEBUG.log   | DEBUG and more severe     |
//! | INFO.log    | INFO and more severe      |
//! | WARN.log    | WARN and ERROR            |
//! | ERROR.log   | ERROR only                |
//!
//! Writers are non-blocking; keep the returned [`LoggingGuard`] alive until
//! shutdown so buffered records are flushed.

use crate::config::TomlConfig;
use crate::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

/// Log files in order of decreasing verbosity
pub const LEVEL_FILES: [(Level, &str); 5] = [
    (Level::TRACE, "TRACE.log"),
    (Level::DEBUG, "DEBUG.log"),
    (Level::INFO, "INFO.log"),
    (Level::WARN, "WARN.log"),
    (Level::ERROR, "ERROR.log"),
];

/// Resolved logging settings
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub log_dir: PathBuf,
    /// Default console filter directive when `RUST_LOG` is unset
    pub console_level: String,
    pub file_logging: bool,
    pub clear_on_start: bool,
}

impl LoggingConfig {
    /// Build from the TOML `[logging]` section and the resolved root folder
    pub fn from_toml(toml: &TomlConfig, root: &Path) -> Self {
        Self {
            log_dir: toml.log_directory(root),
            console_level: toml.logging.level.clone(),
            file_logging: toml.logging.files,
            clear_on_start: toml.logging.clear_on_start,
        }
    }
}

/// Keeps the non-blocking writer threads alive
///
/// Dropping it flushes and stops the file writers.
pub struct LoggingGuard {
    _file_guards: Vec<WorkerGuard>,
}

/// Create the log directory, optionally removing files left from a previous run
pub fn prepare_log_dir(dir: &Path, clear: bool) -> Result<()> {
    std::fs::create_dir_all(dir)?;

    if clear {
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() {
                std::fs::remove_file(&path)?;
            }
        }
    }

    Ok(())
}

/// Boxed layer over the root registry
pub type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Build the console layer and, when enabled, one file layer per level
///
/// The returned guards must outlive every record written through the layers.
pub fn build_layers(config: &LoggingConfig) -> Result<(Vec<BoxedLayer>, Vec<WorkerGuard>)> {
    let mut guards = Vec::new();
    let mut layers: Vec<BoxedLayer> = Vec::new();

    let console_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.console_level))
        .map_err(|e| Error::Config(format!("Invalid log level: {}", e)))?;
    layers.push(
        fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_filter(console_filter)
            .boxed(),
    );

    if config.file_logging {
        prepare_log_dir(&config.log_dir, config.clear_on_start)?;

        for (level, file_name) in LEVEL_FILES {
            let appender = tracing_appender::rolling::never(&config.log_dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            guards.push(guard);

            layers.push(
                fmt::layer()
                    .with_writer(writer)
                    .with_target(true)
                    .with_ansi(false)
                    .with_filter(LevelFilter::from_level(level))
                    .boxed(),
            );
        }
    }

    Ok((layers, guards))
}

/// Install the global subscriber
///
/// Fails if a global subscriber is already set.
pub fn init_logging(config: &LoggingConfig) -> Result<LoggingGuard> {
    let (layers, guards) = build_layers(config)?;

    Registry::default()
        .with(layers)
        .try_init()
        .map_err(|e| Error::Internal(format!("Failed to initialize logging: {}", e)))?;

    if config.file_logging {
        tracing::info!("Writing log files to {}", config.log_dir.display());
    }

    Ok(LoggingGuard {
        _file_guards: guards,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn file_config(dir: &Path) -> LoggingConfig {
        LoggingConfig {
            log_dir: dir.to_path_buf(),
            console_level: "off".to_string(),
            file_logging: true,
            clear_on_start: true,
        }
    }

    fn read_log(dir: &Path, name: &str) -> String {
        std::fs::read_to_string(dir.join(name)).unwrap_or_default()
    }

    #[test]
    fn test_warn_record_lands_in_warn_and_more_verbose_files() {
        let temp = TempDir::new().unwrap();
        let (layers, guards) = build_layers(&file_config(temp.path())).unwrap();

        tracing::subscriber::with_default(Registry::default().with(layers), || {
            tracing::warn!("pickup hum on channel 2");
        });
        drop(guards);

        for name in ["TRACE.log", "DEBUG.log", "INFO.log", "WARN.log"] {
            let content = read_log(temp.path(), name);
            assert!(
                content.contains("pickup hum on channel 2"),
                "{} should contain the WARN record, got: {:?}",
                name,
                content
            );
        }
        assert!(!read_log(temp.path(), "ERROR.log").contains("pickup hum"));
    }

    #[test]
    fn test_debug_record_skips_info_and_more_severe_files() {
        let temp = TempDir::new().unwrap();
        let (layers, guards) = build_layers(&file_config(temp.path())).unwrap();

        tracing::subscriber::with_default(Registry::default().with(layers), || {
            tracing::debug!("buffer size 256");
        });
        drop(guards);

        assert!(read_log(temp.path(), "TRACE.log").contains("buffer size 256"));
        assert!(read_log(temp.path(), "DEBUG.log").contains("buffer size 256"));
        for name in ["INFO.log", "WARN.log", "ERROR.log"] {
            assert!(!read_log(temp.path(), name).contains("buffer size 256"));
        }
    }

    #[test]
    fn test_file_logging_off_builds_console_layer_only() {
        let temp = TempDir::new().unwrap();
        let mut config = file_config(&temp.path().join("logs"));
        config.file_logging = false;

        let (layers, guards) = build_layers(&config).unwrap();

        assert_eq!(layers.len(), 1);
        assert!(guards.is_empty());
        assert!(!temp.path().join("logs").exists());
    }

    #[test]
    fn test_prepare_log_dir_clears_old_files() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("logs");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("INFO.log"), "old run").unwrap();

        prepare_log_dir(&dir, true).unwrap();

        assert!(dir.exists());
        assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 0);
    }

    #[test]
    fn test_prepare_log_dir_keeps_files_when_not_clearing() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("WARN.log"), "keep").unwrap();

        prepare_log_dir(temp.path(), false).unwrap();

        let content = std::fs::read_to_string(temp.path().join("WARN.log")).unwrap();
        assert_eq!(content, "keep");
    }

    #[test]
    fn test_config_from_toml_defaults_to_root_logs() {
        let toml = TomlConfig::default();
        let config = LoggingConfig::from_toml(&toml, Path::new("/data/dawker"));

        assert_eq!(config.log_dir, PathBuf::from("/data/dawker/logs"));
        assert_eq!(config.console_level, "info");
        assert!(config.file_logging);
        assert!(config.clear_on_start);
    }
}
