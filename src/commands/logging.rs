//! Logging for Chat Shell.
//!
//! Every `log::` record goes to the console through `env_logger` (filtered by
//! `RUST_LOG`, default `info`) and, once the app directories are known, to a
//! daily log file with size-based rotation and cleanup.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;
use lazy_static::lazy_static;
use log::Log;
use parking_lot::Mutex;
use tauri::{AppHandle, Manager};

use crate::error::{ResultExt, ShellResult};

/// Maximum log file size before rotation (5MB)
const MAX_LOG_SIZE: u64 = 5 * 1024 * 1024;

/// Maximum number of log files to keep
const MAX_LOG_FILES: usize = 5;

const LOG_FILE_PREFIX: &str = "chat-shell";

lazy_static! {
    /// Open log file, if file logging is initialized
    static ref LOG_FILE: Mutex<Option<File>> = Mutex::new(None);
    /// Log directory path
    static ref LOG_DIR: Mutex<Option<PathBuf>> = Mutex::new(None);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warn => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

impl From<log::Level> for LogLevel {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => LogLevel::Error,
            log::Level::Warn => LogLevel::Warn,
            log::Level::Info => LogLevel::Info,
            log::Level::Debug | log::Level::Trace => LogLevel::Debug,
        }
    }
}

/// `log` backend: console via env_logger, plus the log file.
struct ShellLogger {
    console: env_logger::Logger,
}

impl Log for ShellLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        self.console.enabled(metadata)
    }

    fn log(&self, record: &log::Record) {
        if !self.console.matches(record) {
            return;
        }
        self.console.log(record);
        write_to_file(
            record.level().into(),
            record.target(),
            &record.args().to_string(),
        );
    }

    fn flush(&self) {
        self.console.flush();
        if let Some(file) = LOG_FILE.lock().as_mut() {
            let _ = file.flush();
        }
    }
}

/// Install the global logger. Call once, before anything logs.
pub fn init_logger() {
    let console =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .build();
    let max_level = console.filter();

    if log::set_boxed_logger(Box::new(ShellLogger { console })).is_ok() {
        log::set_max_level(max_level);
    }
}

/// Start writing log records to the app log directory.
pub fn init_logging(app: &AppHandle) -> ShellResult<()> {
    let log_dir = app
        .path()
        .app_log_dir()
        .context("Failed to get log directory")?;
    init_logging_in(&log_dir)
}

fn init_logging_in(log_dir: &Path) -> ShellResult<()> {
    fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    *LOG_DIR.lock() = Some(log_dir.to_path_buf());

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(current_log_path(log_dir))
        .context("Failed to open log file")?;
    *LOG_FILE.lock() = Some(file);

    log_internal(LogLevel::Info, "ChatShell", "Logging system initialized");
    log_internal(
        LogLevel::Info,
        "ChatShell",
        &format!("Log directory: {:?}", log_dir),
    );

    cleanup_old_logs(log_dir);
    Ok(())
}

/// Path of today's log file.
fn current_log_path(log_dir: &Path) -> PathBuf {
    let date = Local::now().format("%Y-%m-%d");
    log_dir.join(format!("{}_{}.log", LOG_FILE_PREFIX, date))
}

/// Keep only the newest MAX_LOG_FILES log files.
fn cleanup_old_logs(log_dir: &Path) {
    let Ok(entries) = fs::read_dir(log_dir) else {
        return;
    };

    let mut log_files: Vec<_> = entries
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "log"))
        .collect();

    // Newest first
    log_files.sort_by(|a, b| {
        let a_time = a.metadata().and_then(|m| m.modified()).ok();
        let b_time = b.metadata().and_then(|m| m.modified()).ok();
        b_time.cmp(&a_time)
    });

    for file in log_files.into_iter().skip(MAX_LOG_FILES) {
        let _ = fs::remove_file(file.path());
    }
}

/// Rotate the current file once it grows past MAX_LOG_SIZE.
fn check_rotation() {
    let Some(log_dir) = LOG_DIR.lock().clone() else {
        return;
    };
    let current_path = current_log_path(&log_dir);

    let too_big = fs::metadata(&current_path).is_ok_and(|m| m.len() > MAX_LOG_SIZE);
    if !too_big {
        return;
    }

    let timestamp = Local::now().format("%Y-%m-%d_%H%M%S");
    let rotated_path = log_dir.join(format!("{}_{}.log", LOG_FILE_PREFIX, timestamp));
    let _ = fs::rename(&current_path, &rotated_path);

    if let Ok(file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&current_path)
    {
        *LOG_FILE.lock() = Some(file);
    }

    cleanup_old_logs(&log_dir);
}

fn write_to_file(level: LogLevel, source: &str, message: &str) {
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
    let log_line = format!("[{}] [{}] [{}] {}\n", timestamp, level, source, message);

    let wrote = match LOG_FILE.lock().as_mut() {
        Some(file) => file.write_all(log_line.as_bytes()).is_ok(),
        None => false,
    };

    if wrote {
        check_rotation();
    }
}

/// Write a line straight to the log file and, in debug builds, the console.
pub fn log_internal(level: LogLevel, source: &str, message: &str) {
    write_to_file(level, source, message);

    #[cfg(debug_assertions)]
    match level {
        LogLevel::Error => eprintln!("[{}] [{}] {}", level, source, message),
        _ => println!("[{}] [{}] {}", level, source, message),
    }
}

/// Log a lifecycle event from Rust code
#[macro_export]
macro_rules! app_log {
    ($level:expr, $source:expr, $($arg:tt)*) => {
        $crate::commands::logging::log_internal($level, $source, &format!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "chat-shell-logs-{}-{}",
            name,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_log_level_display() {
        assert_eq!(LogLevel::Warn.to_string(), "WARN");
        assert_eq!(LogLevel::from(log::Level::Trace), LogLevel::Debug);
        assert_eq!(LogLevel::from(log::Level::Error), LogLevel::Error);
    }

    #[test]
    fn test_current_log_path_is_dated() {
        let path = current_log_path(Path::new("/tmp/logs"));
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("chat-shell_"));
        assert!(name.ends_with(".log"));
        // chat-shell_YYYY-MM-DD.log
        assert_eq!(name.len(), "chat-shell_".len() + 10 + ".log".len());
    }

    #[test]
    fn test_cleanup_keeps_newest_files() {
        let dir = temp_dir("cleanup");
        for i in 0..(MAX_LOG_FILES + 3) {
            fs::write(dir.join(format!("old_{}.log", i)), "x").unwrap();
        }
        fs::write(dir.join("notes.txt"), "keep me").unwrap();

        cleanup_old_logs(&dir);

        let logs = fs::read_dir(&dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "log"))
            .count();
        assert_eq!(logs, MAX_LOG_FILES);
        assert!(dir.join("notes.txt").exists());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_init_logging_writes_file() {
        let dir = temp_dir("init");
        init_logging_in(&dir).expect("init");
        app_log!(LogLevel::Info, "Test", "hello {}", 42);

        let content = fs::read_to_string(current_log_path(&dir)).unwrap();
        assert!(content.contains("Logging system initialized"));
        assert!(content.contains("[INFO] [Test] hello 42"));

        let _ = fs::remove_dir_all(&dir);
    }
}
