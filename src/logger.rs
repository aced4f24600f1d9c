use crate::config::Config;
use crate::error::{FlowgenError, Result};
use chrono::{DateTime, Utc};
use colored::*;
use log::{Level, Metadata, Record};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

static FLOW_LOGGER: Lazy<FlowLogger> = Lazy::new(FlowLogger::new);

pub fn init() -> Result<()> {
    init_with_config(LoggerConfig::default())
}

/// Installs the global logger. Fails if any logger is already installed, in
/// which case the running logger keeps its configuration.
pub fn init_with_config(config: LoggerConfig) -> Result<()> {
    let log_file = FlowLogger::open_log_file(&config)?;

    log::set_logger(&*FLOW_LOGGER)
        .map_err(|e| FlowgenError::Internal(format!("Failed to set logger: {}", e)))?;

    log::set_max_level(config.min_level.to_log_level_filter());
    FLOW_LOGGER.apply_config(config, log_file);
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
}

impl LogLevel {
    pub fn color(&self) -> Color {
        match self {
            LogLevel::Trace => Color::Cyan,
            LogLevel::Debug => Color::Blue,
            LogLevel::Info => Color::Green,
            LogLevel::Warn => Color::Yellow,
            LogLevel::Error => Color::Red,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }

    pub fn to_log_level(&self) -> Level {
        match self {
            LogLevel::Trace => Level::Trace,
            LogLevel::Debug => Level::Debug,
            LogLevel::Info => Level::Info,
            LogLevel::Warn => Level::Warn,
            LogLevel::Error => Level::Error,
        }
    }

    pub fn to_log_level_filter(&self) -> log::LevelFilter {
        self.to_log_level().to_level_filter()
    }

    pub fn from_log_level(level: Level) -> Self {
        match level {
            Level::Trace => LogLevel::Trace,
            Level::Debug => LogLevel::Debug,
            Level::Info => LogLevel::Info,
            Level::Warn => LogLevel::Warn,
            Level::Error => LogLevel::Error,
        }
    }
}

/// One structured log record, serialized as-is for JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
    pub module: String,
    pub file: String,
    pub line: u32,
}

impl LogEntry {
    pub fn new(level: LogLevel, message: String, module: String, file: String, line: u32) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            level,
            message,
            module,
            file,
            line,
        }
    }

    fn from_record(record: &Record) -> Self {
        Self::new(
            LogLevel::from_log_level(record.level()),
            record.args().to_string(),
            record.module_path().unwrap_or("unknown").to_string(),
            record.file().unwrap_or("unknown").to_string(),
            record.line().unwrap_or(0),
        )
    }
}

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub min_level: LogLevel,
    pub show_colors: bool,
    pub show_file_location: bool,
    pub show_module: bool,
    pub timestamp_format: String,
    pub output_json: bool,
    /// Console output goes to stderr so it never mixes with the rendered view.
    pub log_to_console: bool,
    pub log_to_file: bool,
    pub log_file_path: String,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            min_level: LogLevel::Info,
            show_colors: true,
            show_file_location: false,
            show_module: true,
            timestamp_format: "%Y-%m-%d %H:%M:%S%.3f".to_string(),
            output_json: false,
            log_to_console: true,
            log_to_file: false,
            log_file_path: "flowgen.log".to_string(),
        }
    }
}

impl LoggerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    pub fn with_colors(mut self, enabled: bool) -> Self {
        self.show_colors = enabled;
        self
    }

    pub fn with_console(mut self, enabled: bool) -> Self {
        self.log_to_console = enabled;
        self
    }

    pub fn with_file_output(mut self, path: &str) -> Self {
        self.log_to_file = true;
        self.log_file_path = path.to_string();
        self
    }

    pub fn with_json_output(mut self, enabled: bool) -> Self {
        self.output_json = enabled;
        self
    }

    pub fn production() -> Self {
        Self {
            min_level: LogLevel::Info,
            show_colors: false,
            output_json: true,
            log_to_console: false,
            log_to_file: true,
            ..Default::default()
        }
    }

    pub fn development() -> Self {
        Self {
            min_level: LogLevel::Debug,
            show_colors: true,
            show_file_location: true,
            ..Default::default()
        }
    }
}

pub struct FlowLogger {
    config: Arc<Mutex<LoggerConfig>>,
    log_file: Arc<Mutex<Option<File>>>,
}

impl FlowLogger {
    pub fn new() -> Self {
        Self {
            config: Arc::new(Mutex::new(LoggerConfig::default())),
            log_file: Arc::new(Mutex::new(None)),
        }
    }

    fn open_log_file(config: &LoggerConfig) -> Result<Option<File>> {
        if !config.log_to_file {
            return Ok(None);
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.log_file_path)?;
        Ok(Some(file))
    }

    fn apply_config(&self, new_config: LoggerConfig, file: Option<File>) {
        if let Ok(mut log_file) = self.log_file.lock() {
            *log_file = file;
        }
        if let Ok(mut config) = self.config.lock() {
            *config = new_config;
        }
    }

    fn format_line(entry: &LogEntry, config: &LoggerConfig, colors: bool) -> String {
        if config.output_json {
            return serde_json::to_string(entry).unwrap_or_default();
        }

        let timestamp = entry.timestamp.format(&config.timestamp_format).to_string();
        let level = entry.level.as_str();
        let mut output = if colors {
            format!(
                "{} [{}] ",
                timestamp.bright_black(),
                level.color(entry.level.color()).bold()
            )
        } else {
            format!("{} [{}] ", timestamp, level)
        };

        if config.show_module && !entry.module.is_empty() {
            if colors {
                output.push_str(&format!("{}: ", entry.module.bright_blue()));
            } else {
                output.push_str(&format!("{}: ", entry.module));
            }
        }

        output.push_str(&entry.message);

        if config.show_file_location {
            output.push_str(&format!(" ({}:{})", entry.file, entry.line));
        }

        output
    }

    fn write_to_file(&self, entry: &LogEntry, config: &LoggerConfig) {
        if let Ok(mut log_file_guard) = self.log_file.lock() {
            if let Some(ref mut file) = *log_file_guard {
                let content = Self::format_line(entry, config, false) + "\n";
                let _ = file.write_all(content.as_bytes());
            }
        }
    }
}

impl Default for FlowLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl log::Log for FlowLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        match self.config.lock() {
            Ok(config) => metadata.level() <= config.min_level.to_log_level(),
            Err(_) => true,
        }
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let entry = LogEntry::from_record(record);
        if let Ok(config) = self.config.lock() {
            if config.log_to_console {
                eprintln!("{}", Self::format_line(&entry, &config, config.show_colors));
            }
            if config.log_to_file {
                self.write_to_file(&entry, &config);
            }
        }
    }

    fn flush(&self) {
        let _ = io::stderr().flush();
        if let Ok(mut log_file_guard) = self.log_file.lock() {
            if let Some(ref mut file) = *log_file_guard {
                let _ = file.flush();
            }
        }
    }
}

pub fn log_startup_info(app_name: &str, version: &str) {
    log::info!("Starting {} v{}", app_name, version);
}

pub fn log_config_info(config: &Config) {
    log::info!("Configuration loaded:");
    log::info!(
        "   Endpoint: {}",
        config.endpoint.as_deref().unwrap_or("<unset>")
    );
    log::info!("   Output directory: {}", config.output_dir.display());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(level: LogLevel, message: &str) -> LogEntry {
        LogEntry::new(
            level,
            message.to_string(),
            "flowgen::controller".to_string(),
            "src/controller.rs".to_string(),
            42,
        )
    }

    #[test]
    fn test_log_levels() {
        assert_eq!(LogLevel::Info.as_str(), "INFO");
        assert_eq!(LogLevel::Debug.color(), Color::Blue);
        assert_eq!(LogLevel::Warn.to_log_level_filter(), log::LevelFilter::Warn);
        assert_eq!(LogLevel::from_log_level(Level::Error), LogLevel::Error);
        assert!(LogLevel::Trace < LogLevel::Error);
    }

    #[test]
    fn test_logger_config() {
        let config = LoggerConfig::development();
        assert_eq!(config.min_level, LogLevel::Debug);
        assert!(config.show_colors);
        assert!(config.log_to_console);

        let prod_config = LoggerConfig::production();
        assert!(!prod_config.show_colors);
        assert!(prod_config.output_json);
        assert!(!prod_config.log_to_console);
    }

    #[test]
    fn test_plain_format() {
        let config = LoggerConfig::new().with_colors(false);
        let line = FlowLogger::format_line(&entry(LogLevel::Warn, "request #2 rejected"), &config, false);
        assert!(line.contains("[WARN] flowgen::controller: request #2 rejected"));
        assert!(!line.contains("src/controller.rs"));

        let config = LoggerConfig::development();
        let line = FlowLogger::format_line(&entry(LogLevel::Info, "hi"), &config, false);
        assert!(line.ends_with("hi (src/controller.rs:42)"));
    }

    #[test]
    fn test_json_format() {
        let config = LoggerConfig::new().with_json_output(true);
        let line = FlowLogger::format_line(&entry(LogLevel::Error, "boom"), &config, false);
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["message"], "boom");
        assert_eq!(value["level"], "Error");
    }

    #[test]
    fn test_logger_initialization() {
        let _ = init_with_config(
            LoggerConfig::new()
                .with_level(LogLevel::Error)
                .with_console(false),
        );
        let current = || FLOW_LOGGER.config.lock().unwrap().clone();
        let level_before = current().min_level;
        let max_before = log::max_level();

        let second = LoggerConfig::new()
            .with_level(LogLevel::Trace)
            .with_console(true);
        assert!(init_with_config(second).is_err());

        assert_eq!(current().min_level, level_before);
        assert_eq!(log::max_level(), max_before);
        assert!(!current().log_to_console);
    }
}
