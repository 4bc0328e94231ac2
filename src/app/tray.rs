//! System tray setup and event handling.

use tauri::{
    image::Image,
    menu::{Menu, MenuItem, PredefinedMenuItem},
    tray::{MouseButton, MouseButtonState, TrayIcon, TrayIconBuilder, TrayIconEvent},
    App, AppHandle, Manager,
};

use super::context::{self, AppContext};
use super::window;
use crate::error::ShellResult;

pub const TRAY_ID: &str = "main-tray";

/// The fixed tray menu entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayAction {
    Show,
    TogglePrivacy,
    Quit,
}

impl TrayAction {
    pub const ALL: [TrayAction; 3] = [TrayAction::Show, TrayAction::TogglePrivacy, TrayAction::Quit];

    pub fn id(self) -> &'static str {
        match self {
            TrayAction::Show => "show",
            TrayAction::TogglePrivacy => "toggle_privacy",
            TrayAction::Quit => "quit",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TrayAction::Show => "Show Window",
            TrayAction::TogglePrivacy => "Toggle Privacy Blur",
            TrayAction::Quit => "Quit",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.id() == id)
    }
}

/// Build the tray icon and its menu.
pub fn setup_system_tray(app: &App, tooltip: &str) -> ShellResult<TrayIcon> {
    let show = menu_item(app, TrayAction::Show)?;
    let privacy = menu_item(app, TrayAction::TogglePrivacy)?;
    let quit = menu_item(app, TrayAction::Quit)?;
    let separator = PredefinedMenuItem::separator(app)?;

    let menu = Menu::with_items(app, &[&show, &privacy, &separator, &quit])?;

    // 32x32 is standard for system tray
    let tray_icon = Image::from_bytes(include_bytes!("../../icons/32x32.png"))?;

    let tray = TrayIconBuilder::with_id(TRAY_ID)
        .icon(tray_icon)
        .tooltip(tooltip)
        .menu(&menu)
        .show_menu_on_left_click(false)
        .on_menu_event(|app, event| handle_menu_event(app, event.id.as_ref()))
        .on_tray_icon_event(|tray, event| {
            if let TrayIconEvent::Click {
                button: MouseButton::Left,
                button_state: MouseButtonState::Up,
                ..
            } = event
            {
                window::show_main_window(tray.app_handle());
            }
        })
        .build(app)?;

    Ok(tray)
}

fn menu_item(app: &App, action: TrayAction) -> ShellResult<MenuItem<tauri::Wry>> {
    Ok(MenuItem::with_id(
        app,
        action.id(),
        action.label(),
        true,
        None::<&str>,
    )?)
}

pub fn handle_menu_event(app: &AppHandle, id: &str) {
    let Some(action) = TrayAction::from_id(id) else {
        return;
    };
    log::debug!("[TRAY] {:?}", action);

    match action {
        TrayAction::Show => window::show_main_window(app),
        TrayAction::TogglePrivacy => context::toggle_privacy(app),
        TrayAction::Quit => match app.try_state::<AppContext>() {
            Some(context) => context.request_quit(app),
            None => app.exit(0),
        },
    }
}
