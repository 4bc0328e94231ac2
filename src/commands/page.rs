//! IPC commands callable from the loaded page.
//!
//! The page is untrusted, so this surface is two narrow calls: a favicon
//! report and a desktop notification, both with size-checked strings.

use tauri::{AppHandle, Manager};
use tauri_plugin_notification::NotificationExt;

use crate::app::AppContext;
use crate::config;
use crate::error::{ShellError, ShellResult};
use crate::page::policy::{decide, PermissionDecision, PermissionKind};

/// Longest notification title or body passed to the OS, in characters.
pub const MAX_NOTIFICATION_TEXT: usize = 512;

/// The page's favicon link changed (or disappeared).
///
/// Fails while startup is still running so the page retries the report.
#[tauri::command]
pub fn report_favicon(app: AppHandle, href: Option<String>) -> ShellResult<()> {
    let Some(context) = app.try_state::<AppContext>() else {
        log::debug!("[FAVICON] report before startup finished, asking page to retry");
        return Err(ShellError::Other("shell is still starting".to_string()));
    };

    if context.favicon.update(href) {
        log::debug!("[FAVICON] page favicon changed");
        tauri::async_runtime::spawn(context.badges.on_favicon_changed());
    }
    Ok(())
}

/// A notification as handed to the OS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesktopNotification {
    pub title: String,
    pub body: Option<String>,
}

impl DesktopNotification {
    /// Clean up page-supplied text. An empty title falls back to `fallback_title`;
    /// nothing to show gives `None`.
    pub fn from_page(title: &str, body: Option<&str>, fallback_title: &str) -> Option<Self> {
        let title = clip(title);
        let body = body.map(clip).filter(|b| !b.is_empty());

        if title.is_empty() && body.is_none() {
            return None;
        }
        let title = if title.is_empty() {
            clip(fallback_title)
        } else {
            title
        };
        Some(Self { title, body })
    }
}

fn clip(text: &str) -> String {
    text.trim().chars().take(MAX_NOTIFICATION_TEXT).collect()
}

/// Show a desktop notification on behalf of the page's `Notification` API.
#[tauri::command]
pub fn notify(app: AppHandle, title: String, body: Option<String>) -> ShellResult<()> {
    if decide(&PermissionKind::Notifications) != PermissionDecision::Grant {
        return Err(ShellError::NotificationError(
            "notifications are not permitted".to_string(),
        ));
    }

    let fallback = config::app::current().title;
    let Some(message) = DesktopNotification::from_page(&title, body.as_deref(), &fallback)
    else {
        log::debug!("[NOTIFY] empty notification from page, skipping");
        return Ok(());
    };

    let mut builder = app.notification().builder().title(&message.title);
    if let Some(body) = &message.body {
        builder = builder.body(body);
    }
    builder
        .show()
        .map_err(|e| ShellError::NotificationError(format!("dispatch failed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_keeps_page_text() {
        let message =
            DesktopNotification::from_page(" Alice ", Some(" See you at 5 "), "WhatsApp")
                .expect("notification");
        assert_eq!(message.title, "Alice");
        assert_eq!(message.body.as_deref(), Some("See you at 5"));
    }

    #[test]
    fn test_notification_empty_title_uses_fallback() {
        let message = DesktopNotification::from_page("  ", Some("New message"), "WhatsApp")
            .expect("notification");
        assert_eq!(message.title, "WhatsApp");
        assert_eq!(message.body.as_deref(), Some("New message"));
    }

    #[test]
    fn test_notification_without_text_is_dropped() {
        assert_eq!(DesktopNotification::from_page("", None, "WhatsApp"), None);
        assert_eq!(DesktopNotification::from_page(" ", Some("  "), "WhatsApp"), None);
    }

    #[test]
    fn test_notification_text_is_clipped_on_char_boundaries() {
        let long = "é".repeat(MAX_NOTIFICATION_TEXT + 10);
        let message =
            DesktopNotification::from_page(&long, Some(&long), "WhatsApp").expect("notification");
        assert_eq!(message.title.chars().count(), MAX_NOTIFICATION_TEXT);
        assert_eq!(
            message.body.as_deref().map(|b| b.chars().count()),
            Some(MAX_NOTIFICATION_TEXT)
        );
    }

    #[test]
    fn test_notifications_are_permitted() {
        assert_eq!(
            decide(&PermissionKind::Notifications),
            PermissionDecision::Grant
        );
    }
}
