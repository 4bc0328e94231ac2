//! Main window construction.

use tauri::webview::NewWindowResponse;
use tauri::{AppHandle, Manager, Url, WebviewUrl, WebviewWindow, WebviewWindowBuilder};
use tauri_plugin_opener::OpenerExt;

use super::events;
use crate::config::ShellConfig;
use crate::error::{ShellError, ShellResult};
use crate::page::{bridge, policy, LinkAction};

pub const MAIN_WINDOW_LABEL: &str = "main";

/// Create the window hosting the remote page, with link policy and title tracking wired in.
pub fn build_main_window(app: &AppHandle, config: &ShellConfig) -> ShellResult<WebviewWindow> {
    let app_url: Url = config.app_url.parse().map_err(|e| {
        ShellError::ConfigError(format!("invalid appUrl {:?}: {}", config.app_url, e))
    })?;

    let navigation_app = app.clone();
    let navigation_origin = app_url.clone();
    let popup_app = app.clone();

    let window = WebviewWindowBuilder::new(app, MAIN_WINDOW_LABEL, WebviewUrl::External(app_url))
        .title(&config.title)
        .inner_size(config.window_width, config.window_height)
        .user_agent(&config.user_agent)
        .initialization_script(&bridge::init_script())
        .on_document_title_changed(|window, title| events::on_title_changed(&window, &title))
        .on_navigation(move |url| {
            match policy::navigation_action(url, &navigation_origin) {
                LinkAction::AllowInApp => true,
                LinkAction::OpenExternally => {
                    open_externally(&navigation_app, url);
                    false
                },
            }
        })
        .on_new_window(move |url, _features| match policy::new_window_action(&url) {
            LinkAction::AllowInApp => NewWindowResponse::Allow,
            LinkAction::OpenExternally => {
                open_externally(&popup_app, &url);
                NewWindowResponse::Deny
            },
        })
        .build()
        .map_err(|e| ShellError::WindowError(format!("failed to create main window: {}", e)))?;

    Ok(window)
}

fn open_externally(app: &AppHandle, url: &Url) {
    log::info!("[LINKS] opening {} in the default browser", url);
    if let Err(e) = app.opener().open_url(url.as_str(), None::<&str>) {
        log::warn!("[LINKS] failed to open {}: {}", url, e);
    }
}

/// Bring the main window back from the tray (or from behind other windows).
pub fn show_main_window(app: &AppHandle) {
    let Some(window) = app.get_webview_window(MAIN_WINDOW_LABEL) else {
        return;
    };
    let _ = window.unminimize();
    let _ = window.show();
    let _ = window.set_focus();
}
