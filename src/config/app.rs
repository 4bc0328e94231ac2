//! Application-level configuration.
//!
//! Defaults reproduce the stock shell. An optional `config.json` in the app
//! config directory overrides individual fields (camelCase keys); unknown
//! keys are ignored and a broken file falls back to the defaults.

use std::path::Path;

use lazy_static::lazy_static;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::{ResultExt, ShellResult};

/// Desktop Chrome user agent. The page refuses unknown browsers.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

pub const DEFAULT_APP_URL: &str = "https://web.whatsapp.com";

/// Name of the optional override file inside the app config dir.
pub const CONFIG_FILE_NAME: &str = "config.json";

lazy_static! {
    /// Global shell configuration.
    pub static ref APP_CONFIG: RwLock<ShellConfig> = RwLock::new(ShellConfig::default());
}

/// Startup and runtime preferences for the shell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShellConfig {
    /// Remote page loaded into the main window.
    pub app_url: String,
    /// User agent sent on every request to the page.
    pub user_agent: String,
    pub window_width: f64,
    pub window_height: f64,
    /// Main window title.
    pub title: String,
    /// Base tray tooltip; the unread suffix is appended to it.
    pub tray_label: String,
    /// Accelerator for the privacy blur, e.g. `CommandOrControl+Shift+B`.
    pub privacy_shortcut: String,
    pub blur_radius_px: u32,
    pub blur_transition_ms: u32,
    /// Hide instead of quitting when the window is closed.
    pub close_to_tray: bool,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            app_url: DEFAULT_APP_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            window_width: 1200.0,
            window_height: 900.0,
            title: "WhatsApp".to_string(),
            tray_label: "WhatsApp".to_string(),
            privacy_shortcut: "CommandOrControl+Shift+B".to_string(),
            blur_radius_px: 8,
            blur_transition_ms: 200,
            close_to_tray: true,
        }
    }
}

impl ShellConfig {
    /// Parse a config document. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> ShellResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load overrides from `path`, or the defaults when the file is absent.
    pub fn load_from(path: &Path) -> ShellResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_json(&json)
    }
}

/// Load the config file from `dir` into [`APP_CONFIG`].
///
/// A malformed file is logged and the defaults stay in place.
pub fn init_from_dir(dir: &Path) {
    let path = dir.join(CONFIG_FILE_NAME);
    match ShellConfig::load_from(&path) {
        Ok(config) => {
            log::debug!("[APP_CONFIG] loaded {:?}", config);
            *APP_CONFIG.write() = config;
        },
        Err(e) => {
            log::warn!(
                "[APP_CONFIG] ignoring {}: {}; using defaults",
                path.display(),
                e
            );
        },
    }
}

// ============================================================================
// Getters (for internal Rust use)
// ============================================================================

/// Snapshot of the current configuration.
pub fn current() -> ShellConfig {
    APP_CONFIG.read().clone()
}

/// Check if close-to-tray is enabled.
pub fn is_close_to_tray() -> bool {
    APP_CONFIG.read().close_to_tray
}
