//! Window and run-loop event handlers.

use tauri::{AppHandle, Manager, RunEvent, WebviewWindow, Window, WindowEvent};

use super::context::AppContext;
use super::window::MAIN_WINDOW_LABEL;
use crate::app_log;
use crate::commands::logging::LogLevel;
use crate::config::app::is_close_to_tray;

/// What a close request on the main window turns into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClosePolicy {
    Hide,
    Terminate,
}

pub fn close_policy(quitting: bool, close_to_tray: bool) -> ClosePolicy {
    if close_to_tray && !quitting {
        ClosePolicy::Hide
    } else {
        ClosePolicy::Terminate
    }
}

/// Handle window events for the application.
///
/// This is called from the Tauri builder's `on_window_event` hook.
pub fn handle_window_event(window: &Window, event: &WindowEvent) {
    match event {
        // Fix Windows resize lag by adding small delay
        // See: https://github.com/tauri-apps/tauri/issues/6322#issuecomment-2495685888
        #[cfg(target_os = "windows")]
        WindowEvent::Resized(_) => {
            std::thread::sleep(std::time::Duration::from_millis(1));
        },

        // Hide to tray instead of closing, unless a quit is in progress
        WindowEvent::CloseRequested { api, .. } => {
            if window.label() != MAIN_WINDOW_LABEL {
                return;
            }

            let quitting = window
                .app_handle()
                .try_state::<AppContext>()
                .is_some_and(|context| context.is_quitting());
            let close_to_tray = is_close_to_tray();

            if close_policy(quitting, close_to_tray) == ClosePolicy::Hide {
                api.prevent_close();
                let _ = window.hide();
            }
        },

        _ => {},
    }
}

/// The page title changed: mirror it on the window and feed the badge pipeline.
pub fn on_title_changed(window: &WebviewWindow, title: &str) {
    let _ = window.set_title(title);

    let Some(context) = window.app_handle().try_state::<AppContext>() else {
        return;
    };
    tauri::async_runtime::spawn(context.badges.on_title_changed(title));
}

/// Run-loop hook passed to `App::run`.
pub fn handle_run_event(app: &AppHandle, event: RunEvent) {
    match event {
        RunEvent::ExitRequested { .. } => {
            if let Some(context) = app.try_state::<AppContext>() {
                context.mark_quitting();
                context.release_shortcuts(app);
            }
        },
        RunEvent::Exit => {
            app_log!(LogLevel::Info, "App", "Shell exiting");
        },
        #[cfg(target_os = "macos")]
        RunEvent::Reopen { .. } => {
            super::window::show_main_window(app);
        },
        _ => {},
    }
}
