//! Application configuration management.
//!
//! `ShellConfig` holds everything the shell needs at startup: the remote
//! page, the user agent sent to it, window geometry, tray wording and the
//! privacy shortcut. It lives behind a `parking_lot::RwLock` so tray and
//! window handlers can read it without poisoning concerns.

pub mod app;

pub use app::{ShellConfig, APP_CONFIG};
