use chrono::Local;
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Mutex;

/// Name of the file created inside the log directory.
pub const LOG_FILE_NAME: &str = "santa_tracker.log";

#[derive(Debug, Clone, Copy)]
enum Color {
    Red,
    Green,
    Yellow,
    Cyan,
    Magenta,
}

impl Color {
    fn to_ansi_code(self) -> &'static str {
        match self {
            Color::Red => "\x1b[91m",
            Color::Green => "\x1b[32m",
            Color::Yellow => "\x1b[93m",
            Color::Cyan => "\x1b[36m",
            Color::Magenta => "\x1b[35m",
        }
    }

    fn for_level(level: Level) -> Color {
        match level {
            Level::Error => Color::Red,
            Level::Warn => Color::Yellow,
            Level::Info => Color::Green,
            Level::Debug => Color::Cyan,
            Level::Trace => Color::Magenta,
        }
    }
}

/// A `log` backend writing to a file and, optionally, to the console.
#[derive(Debug)]
pub struct Logger {
    level: LevelFilter,
    to_console: bool,
    log_file: Option<(PathBuf, Mutex<File>)>,
}

impl Logger {
    /// Creates a new `Logger`.
    ///
    /// # Parameters
    /// - `log_dir`: Existing directory where `santa_tracker.log` is created.
    ///   When `None`, nothing is written to disk.
    /// - `level`: Most verbose level that gets through.
    /// - `to_console`: Whether records are also printed to stdout with colors.
    pub fn new(
        log_dir: Option<&Path>,
        level: LevelFilter,
        to_console: bool,
    ) -> Result<Self, LoggerError> {
        let log_file = match log_dir {
            Some(dir) => {
                if !dir.is_dir() {
                    return Err(LoggerError::InvalidPath(format!(
                        "{} is not a directory.",
                        dir.display()
                    )));
                }

                let path = dir.join(LOG_FILE_NAME);
                let file = OpenOptions::new()
                    .create(true)
                    .write(true)
                    .truncate(true)
                    .open(&path)?;
                Some((path, Mutex::new(file)))
            }
            None => None,
        };

        Ok(Logger {
            level,
            to_console,
            log_file,
        })
    }

    /// Installs this logger as the global `log` backend.
    pub fn init(self) -> Result<(), LoggerError> {
        let level = self.level;
        log::set_boxed_logger(Box::new(self))
            .map_err(|e| LoggerError::AlreadyInitialized(e.to_string()))?;
        log::set_max_level(level);
        Ok(())
    }

    pub fn log_file(&self) -> Option<&Path> {
        self.log_file.as_ref().map(|(path, _)| path.as_path())
    }

    fn write_to_file(&self, line: &str) -> Result<(), LoggerError> {
        if let Some((_, file)) = &self.log_file {
            let mut file = file
                .lock()
                .map_err(|_| LoggerError::InvalidPath("log file lock poisoned".into()))?;
            file.write_all(line.as_bytes())?;
            file.flush()?;
        }
        Ok(())
    }

    fn write_to_console(&self, level: Level, line: &str) -> Result<(), LoggerError> {
        let colored = format!("{}{}\x1b[0m", Color::for_level(level).to_ansi_code(), line);
        let mut stdout = io::stdout().lock();
        stdout.write_all(colored.as_bytes())?;
        stdout.flush()?;
        Ok(())
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let line = format_line(record.level(), record.target(), &record.args().to_string());

        if self.to_console {
            let _ = self.write_to_console(record.level(), &line);
        }
        if let Err(e) = self.write_to_file(&line) {
            eprintln!("Failed to write log line: {e}");
        }
    }

    fn flush(&self) {
        if let Some((_, file)) = &self.log_file {
            if let Ok(mut file) = file.lock() {
                let _ = file.flush();
            }
        }
    }
}

/// `[LEVEL] [timestamp] target: message` followed by a newline.
fn format_line(level: Level, target: &str, message: &str) -> String {
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
    format!("[{}] [{}] {}: {}\n", level, timestamp, target, message)
}

/// Parses a level name such as `info` or `DEBUG`; `off` disables logging.
pub fn parse_level(level: &str) -> Result<LevelFilter, LoggerError> {
    LevelFilter::from_str(level.trim()).map_err(|_| LoggerError::InvalidLevel(level.to_string()))
}

#[derive(thiserror::Error, Debug)]
pub enum LoggerError {
    #[error("I/O Error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Invalid Path: {0}")]
    InvalidPath(String),
    #[error("Invalid log level: {0}")]
    InvalidLevel(String),
    #[error("Logger already initialized: {0}")]
    AlreadyInitialized(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_logger_creation_and_logging() {
        let log_dir = std::env::temp_dir().join("santa_tracker_test_logs");
        fs::create_dir_all(&log_dir).expect("Failed to create test directory");

        let logger =
            Logger::new(Some(&log_dir), LevelFilter::Info, false).expect("Failed to create logger");

        let message = "Test log message.";
        logger.log(
            &Record::builder()
                .level(Level::Info)
                .target("tracker")
                .args(format_args!("{}", message))
                .build(),
        );
        logger.log(
            &Record::builder()
                .level(Level::Debug)
                .target("tracker")
                .args(format_args!("filtered out"))
                .build(),
        );

        let log_file_path = log_dir.join(LOG_FILE_NAME);
        assert_eq!(logger.log_file(), Some(log_file_path.as_path()));
        let log_contents = fs::read_to_string(&log_file_path).expect("Failed to read log file");

        assert!(log_contents.contains("[INFO]"), "INFO level missing in log");
        assert!(log_contents.contains("tracker: Test log message."), "Logged message missing");
        assert!(!log_contents.contains("filtered out"), "DEBUG line should be filtered");

        fs::remove_dir_all(&log_dir).expect("Failed to remove test directory");
    }

    #[test]
    fn test_invalid_path() {
        let invalid_path = Path::new("/invalid/path");

        let result = Logger::new(Some(invalid_path), LevelFilter::Info, false);
        assert!(
            matches!(result, Err(LoggerError::InvalidPath(_))),
            "Logger should fail with an invalid path"
        );
    }

    #[test]
    fn test_console_only_logger_has_no_file() {
        let logger = Logger::new(None, LevelFilter::Warn, false).expect("Failed to create logger");
        assert!(logger.log_file().is_none());
        assert!(logger.enabled(&Metadata::builder().level(Level::Error).build()));
        assert!(!logger.enabled(&Metadata::builder().level(Level::Info).build()));
    }

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug").unwrap(), LevelFilter::Debug);
        assert_eq!(parse_level(" WARN ").unwrap(), LevelFilter::Warn);
        assert_eq!(parse_level("off").unwrap(), LevelFilter::Off);
        assert!(matches!(parse_level("loud"), Err(LoggerError::InvalidLevel(_))));
    }

    #[test]
    fn test_format_line() {
        let line = format_line(Level::Warn, "itinerary", "Skipped 2 records");
        assert!(line.starts_with("[WARN] ["));
        assert!(line.ends_with("] itinerary: Skipped 2 records\n"));
    }
}
