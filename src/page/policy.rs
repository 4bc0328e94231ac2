//! What the shell lets the loaded page do: open links, ask for permissions.

use tauri::Url;

/// Where a link requested by the page should open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkAction {
    /// Hand the URL to the system's default handler.
    OpenExternally,
    /// Let the webview handle it.
    AllowInApp,
}

fn is_web_url(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}

/// Policy for `window.open` / `target=_blank` requests.
///
/// Web links go to the default browser; other schemes (blob:, about:, app
/// protocols) stay inside the app.
pub fn new_window_action(url: &Url) -> LinkAction {
    if is_web_url(url) {
        LinkAction::OpenExternally
    } else {
        LinkAction::AllowInApp
    }
}

/// Policy for top-level navigations of the main window.
///
/// Same-origin navigations and non-web schemes stay in the app; a web link
/// to any other origin would replace the app, so it opens externally.
pub fn navigation_action(url: &Url, app_url: &Url) -> LinkAction {
    if is_web_url(url) && url.origin() != app_url.origin() {
        LinkAction::OpenExternally
    } else {
        LinkAction::AllowInApp
    }
}

/// Permission kinds the page may ask for, named as in the Permissions API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionKind {
    Notifications,
    Camera,
    Microphone,
    Geolocation,
    ClipboardRead,
    Midi,
    PersistentStorage,
}

impl PermissionKind {
    /// Kinds the page bridge answers for explicitly.
    pub const KNOWN: [PermissionKind; 7] = [
        PermissionKind::Notifications,
        PermissionKind::Camera,
        PermissionKind::Microphone,
        PermissionKind::Geolocation,
        PermissionKind::ClipboardRead,
        PermissionKind::Midi,
        PermissionKind::PersistentStorage,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Notifications => "notifications",
            Self::Camera => "camera",
            Self::Microphone => "microphone",
            Self::Geolocation => "geolocation",
            Self::ClipboardRead => "clipboard-read",
            Self::Midi => "midi",
            Self::PersistentStorage => "persistent-storage",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionDecision {
    Grant,
    Deny,
}

impl PermissionDecision {
    /// Permissions API state string.
    pub fn as_state(self) -> &'static str {
        match self {
            Self::Grant => "granted",
            Self::Deny => "denied",
        }
    }
}

/// Only desktop notifications are granted; everything else is denied without a prompt.
pub fn decide(kind: &PermissionKind) -> PermissionDecision {
    match kind {
        PermissionKind::Notifications => PermissionDecision::Grant,
        _ => PermissionDecision::Deny,
    }
}
