//! Central error types for Chat Shell.
//!
//! Startup and command paths return typed errors. The badge pipeline itself
//! never surfaces errors to callers; it logs them and keeps the previous
//! indicator state. All errors implement `Serialize` for Tauri IPC compatibility.

use serde::Serialize;
use thiserror::Error;

/// Main error type for Chat Shell operations.
#[derive(Error, Debug)]
pub enum ShellError {
    /// Main window could not be created or addressed
    #[error("Window error: {0}")]
    WindowError(String),

    /// Tray icon or tray menu failure
    #[error("Tray error: {0}")]
    TrayError(String),

    /// Global shortcut could not be parsed or registered
    #[error("Shortcut error: {0}")]
    ShortcutError(String),

    /// Favicon could not be fetched or decoded
    #[error("Icon load failed: {0}")]
    IconLoadError(String),

    /// Badge composition or encoding failed
    #[error("Render error: {0}")]
    RenderError(String),

    /// Desktop notification could not be shown
    #[error("Notification error: {0}")]
    NotificationError(String),

    /// Configuration file could not be read or parsed
    #[error("Config error: {0}")]
    ConfigError(String),

    /// Filesystem operation failed
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Error bubbled up from the Tauri runtime
    #[error("Tauri error: {0}")]
    TauriError(#[from] tauri::Error),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

/// Tauri requires command errors to be serializable.
impl Serialize for ShellError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl From<image::ImageError> for ShellError {
    fn from(err: image::ImageError) -> Self {
        ShellError::IconLoadError(err.to_string())
    }
}

/// Extension trait for adding context to Results.
///
/// # Example
/// ```ignore
/// use crate::error::{ResultExt, ShellResult};
///
/// fn load_config() -> ShellResult<String> {
///     std::fs::read_to_string("config.json").context("failed to read config file")
/// }
/// ```
pub trait ResultExt<T> {
    /// Add context to an error, converting it to ShellError::Other.
    fn context(self, msg: &str) -> ShellResult<T>;

    /// Add context lazily (only evaluated on error).
    fn with_context<F: FnOnce() -> String>(self, f: F) -> ShellResult<T>;
}

impl<T, E: std::fmt::Display> ResultExt<T> for Result<T, E> {
    fn context(self, msg: &str) -> ShellResult<T> {
        self.map_err(|e| ShellError::Other(format!("{}: {}", msg, e)))
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> ShellResult<T> {
        self.map_err(|e| ShellError::Other(format!("{}: {}", f(), e)))
    }
}

/// Extension trait for adding context to Option types.
pub trait OptionExt<T> {
    /// Convert None to ShellError::Other with the given message.
    fn context(self, msg: &str) -> ShellResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn context(self, msg: &str) -> ShellResult<T> {
        self.ok_or_else(|| ShellError::Other(msg.to_string()))
    }
}

/// Type alias for Results using ShellError.
pub type ShellResult<T> = Result<T, ShellError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ShellError::TrayError("no tray".to_string());
        assert_eq!(err.to_string(), "Tray error: no tray");
    }

    #[test]
    fn test_error_serialization() {
        let err = ShellError::ShortcutError("invalid accelerator".to_string());
        let json = serde_json::to_string(&err).unwrap();
        assert_eq!(json, "\"Shortcut error: invalid accelerator\"");
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ShellError = io_err.into();
        assert!(matches!(err, ShellError::IoError(_)));
    }

    #[test]
    fn test_from_image_error_is_icon_load() {
        let decode_err = image::load_from_memory(b"not an image").unwrap_err();
        let err: ShellError = decode_err.into();
        assert!(matches!(err, ShellError::IconLoadError(_)));
    }

    #[test]
    fn test_result_ext_context() {
        let result: Result<(), &str> = Err("original error");
        let msg = result.context("operation failed").unwrap_err().to_string();
        assert!(msg.contains("operation failed"));
        assert!(msg.contains("original error"));
    }

    #[test]
    fn test_result_ext_with_context() {
        let result: Result<(), &str> = Err("inner");
        let msg = result
            .with_context(|| format!("ctx-{}", 42))
            .unwrap_err()
            .to_string();
        assert!(msg.contains("ctx-42"));
        assert!(msg.contains("inner"));
    }

    #[test]
    fn test_option_ext_context() {
        let opt: Option<i32> = None;
        let result = opt.context("value was missing");
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("value was missing"));
        assert_eq!(Some(7).context("unused").unwrap(), 7);
    }
}
