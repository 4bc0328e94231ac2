//! Shared application context.
//!
//! Owns the handles every handler needs (main window, tray icon, global
//! shortcut registration) and is registered as Tauri state in `setup`.
//! Handlers fetch it with `try_state`, so events that arrive before setup
//! finishes are simply skipped.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tauri::tray::TrayIcon;
use tauri::{AppHandle, Manager, WebviewWindow};
use tauri_plugin_global_shortcut::{GlobalShortcutExt, Shortcut};

use crate::badge::{BadgeRenderer, BadgeSync, FaviconTracker, SurfaceSynchronizer, TauriSurfaces};
use crate::config::ShellConfig;
use crate::error::ShellResult;
use crate::page::{privacy, BlurSpec};

pub struct AppContext {
    pub window: WebviewWindow,
    pub tray: TrayIcon,
    pub favicon: Arc<FaviconTracker>,
    pub badges: BadgeSync,
    blur: BlurSpec,
    privacy_shortcut: Mutex<Option<Shortcut>>,
    quitting: AtomicBool,
}

impl AppContext {
    pub fn new(window: WebviewWindow, tray: TrayIcon, config: &ShellConfig) -> Self {
        let favicon = Arc::new(FaviconTracker::new());
        let badges = SurfaceSynchronizer::new(
            Arc::new(TauriSurfaces::new(window.clone(), tray.clone())),
            Arc::new(BadgeRenderer::new(&config.user_agent)),
            Arc::clone(&favicon),
            config.tray_label.clone(),
        );

        Self {
            window,
            tray,
            favicon,
            badges,
            blur: BlurSpec::from(config),
            privacy_shortcut: Mutex::new(None),
            quitting: AtomicBool::new(false),
        }
    }

    pub fn set_privacy_shortcut(&self, shortcut: Shortcut) {
        *self.privacy_shortcut.lock() = Some(shortcut);
    }

    /// Flip the privacy blur in the loaded page.
    pub fn toggle_privacy(&self) -> ShellResult<()> {
        privacy::toggle(&self.window, &self.blur)
    }

    pub fn is_quitting(&self) -> bool {
        self.quitting.load(Ordering::SeqCst)
    }

    pub fn mark_quitting(&self) {
        self.quitting.store(true, Ordering::SeqCst);
    }

    /// Unregister the privacy hotkey. Safe to call more than once.
    pub fn release_shortcuts(&self, app: &AppHandle) {
        if let Some(shortcut) = self.privacy_shortcut.lock().take() {
            match app.global_shortcut().unregister(shortcut) {
                Ok(()) => log::debug!("[SHORTCUT] privacy hotkey unregistered"),
                Err(e) => log::warn!("[SHORTCUT] failed to unregister privacy hotkey: {}", e),
            }
        }
    }

    /// Explicit quit: closing the window stops hiding it, hotkeys go away, the process exits.
    pub fn request_quit(&self, app: &AppHandle) {
        self.mark_quitting();
        self.release_shortcuts(app);
        app.exit(0);
    }
}

/// Toggle the privacy blur from any handler that only has the app handle.
pub fn toggle_privacy(app: &AppHandle) {
    let Some(context) = app.try_state::<AppContext>() else {
        return;
    };
    if let Err(e) = context.toggle_privacy() {
        log::warn!("[PRIVACY] toggle failed: {}", e);
    }
}
