//! Application lifecycle and platform integration.
//!
//! - `context`: shared handles registered as Tauri state
//! - `window`: main window construction and link policy wiring
//! - `tray`: system tray setup and menu handling
//! - `shortcuts`: global privacy hotkey
//! - `events`: window and run-loop event handlers

pub mod context;
pub mod events;
pub mod shortcuts;
pub mod tray;
pub mod window;

use tauri::{App, Manager};

pub use context::AppContext;

use crate::app_log;
use crate::commands::logging::{self, LogLevel};
use crate::config;
use crate::error::ShellResult;

/// Startup wiring run from the builder's `setup` hook.
pub fn init(app: &App) -> ShellResult<()> {
    if let Err(e) = logging::init_logging(app.handle()) {
        log::warn!("[LOGGING] file logging disabled: {}", e);
    }

    match app.path().app_config_dir() {
        Ok(dir) => config::app::init_from_dir(&dir),
        Err(e) => log::warn!("[APP_CONFIG] no config directory, using defaults: {}", e),
    }
    let config = config::app::current();

    let window = window::build_main_window(app.handle(), &config)?;
    let tray = tray::setup_system_tray(app, &config.tray_label)?;
    let context = AppContext::new(window.clone(), tray, &config);

    // A taken hotkey leaves the tray toggle working
    match shortcuts::register_privacy_shortcut(app.handle(), &config.privacy_shortcut) {
        Ok(shortcut) => context.set_privacy_shortcut(shortcut),
        Err(e) => log::warn!("[SHORTCUT] {}", e),
    }

    app.manage(context);

    // Titles seen before the context existed only reached the window title
    let title = window.title()?;
    events::on_title_changed(&window, &title);

    app_log!(LogLevel::Info, "App", "Shell started on {}", config.app_url);
    Ok(())
}
