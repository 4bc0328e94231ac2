//! Indicator surfaces backed by the live main window and tray icon.

use tauri::tray::TrayIcon;
use tauri::WebviewWindow;

use super::renderer::BadgeImage;
use super::sync::IndicatorSurfaces;
use super::unread::UnreadCount;
use crate::error::ShellResult;

pub struct TauriSurfaces {
    window: WebviewWindow,
    tray: TrayIcon,
}

impl TauriSurfaces {
    pub fn new(window: WebviewWindow, tray: TrayIcon) -> Self {
        Self { window, tray }
    }
}

impl IndicatorSurfaces for TauriSurfaces {
    fn set_os_badge(&self, count: UnreadCount) -> ShellResult<()> {
        // Dock label on macOS shows the literal count.
        #[cfg(target_os = "macos")]
        self.window
            .set_badge_label((!count.is_zero()).then(|| count.to_string()))?;

        // Windows has no numeric taskbar badge; the rendered window icon carries the count.
        #[cfg(target_os = "windows")]
        log::trace!("[BADGE] no numeric taskbar badge on Windows (count {})", count);

        #[cfg(not(any(target_os = "macos", target_os = "windows")))]
        self.window
            .set_badge_count((!count.is_zero()).then(|| i64::from(count.get())))?;

        Ok(())
    }

    fn set_icons(&self, image: &BadgeImage) -> ShellResult<()> {
        self.window.set_icon(image.to_icon())?;
        self.tray.set_icon(Some(image.to_icon()))?;
        Ok(())
    }

    fn set_tooltip(&self, text: &str) -> ShellResult<()> {
        self.tray.set_tooltip(Some(text))?;
        Ok(())
    }
}
