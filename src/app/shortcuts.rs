//! Global shortcut for the privacy blur.
//!
//! The hotkey is system-wide, so it works while the window is hidden in the tray.

use tauri::AppHandle;
use tauri_plugin_global_shortcut::{GlobalShortcutExt, Shortcut, ShortcutState};

use super::context;
use crate::error::{ShellError, ShellResult};

pub fn parse_accelerator(accelerator: &str) -> ShellResult<Shortcut> {
    accelerator.parse::<Shortcut>().map_err(|e| {
        ShellError::ShortcutError(format!("invalid accelerator {:?}: {}", accelerator, e))
    })
}

/// Register `accelerator` to toggle the privacy blur.
pub fn register_privacy_shortcut(app: &AppHandle, accelerator: &str) -> ShellResult<Shortcut> {
    let shortcut = parse_accelerator(accelerator)?;

    app.global_shortcut()
        .on_shortcut(shortcut, |app, _shortcut, event| {
            if event.state != ShortcutState::Pressed {
                return;
            }
            context::toggle_privacy(app);
        })
        .map_err(|e| {
            ShellError::ShortcutError(format!("failed to register {:?}: {}", accelerator, e))
        })?;

    log::info!("[SHORTCUT] privacy blur bound to {}", accelerator);
    Ok(shortcut)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tauri_plugin_global_shortcut::{Code, Modifiers};

    #[test]
    fn test_parse_default_accelerator() {
        let shortcut = parse_accelerator("CommandOrControl+Shift+B").expect("valid");
        #[cfg(target_os = "macos")]
        assert!(shortcut.matches(Modifiers::SUPER | Modifiers::SHIFT, Code::KeyB));
        #[cfg(not(target_os = "macos"))]
        assert!(shortcut.matches(Modifiers::CONTROL | Modifiers::SHIFT, Code::KeyB));
    }

    #[test]
    fn test_parse_invalid_accelerator() {
        let err = parse_accelerator("Shift+NotAKey").unwrap_err();
        assert!(matches!(err, ShellError::ShortcutError(_)));
        assert!(err.to_string().contains("Shift+NotAKey"));
    }
}
