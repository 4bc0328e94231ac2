//! Keeps every unread indicator in step with the page title.
//!
//! Per title change the numeric surfaces (OS badge, tray tooltip) update
//! immediately; the rendered icon follows once the renderer resolves. Each
//! title gets a generation number, and a render is applied only while its
//! generation is still the newest, so a slow render for an old title can
//! never overwrite the icon of a newer one.

use std::future::Future;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;

use super::favicon::FaviconTracker;
use super::renderer::{BadgeImage, IconRenderer};
use super::unread::UnreadCount;
use crate::error::ShellResult;

/// The places an unread count is shown.
pub trait IndicatorSurfaces: Send + Sync + 'static {
    /// Numeric badge on the app icon. Zero clears it.
    fn set_os_badge(&self, count: UnreadCount) -> ShellResult<()>;

    /// Window icon and tray icon.
    fn set_icons(&self, image: &BadgeImage) -> ShellResult<()>;

    fn set_tooltip(&self, text: &str) -> ShellResult<()>;
}

/// Tray tooltip for a count: the bare label, or `"<label> (<n> unread)"`.
pub fn tooltip_text(label: &str, count: UnreadCount) -> String {
    if count.is_zero() {
        label.to_string()
    } else {
        format!("{} ({} unread)", label, count)
    }
}

pub struct SurfaceSynchronizer<S, R> {
    surfaces: Arc<S>,
    renderer: Arc<R>,
    favicon: Arc<FaviconTracker>,
    label: String,
    generation: Arc<AtomicU64>,
    last_count: AtomicU32,
}

impl<S: IndicatorSurfaces, R: IconRenderer> SurfaceSynchronizer<S, R> {
    pub fn new(
        surfaces: Arc<S>,
        renderer: Arc<R>,
        favicon: Arc<FaviconTracker>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            surfaces,
            renderer,
            favicon,
            label: label.into(),
            generation: Arc::new(AtomicU64::new(0)),
            last_count: AtomicU32::new(0),
        }
    }

    /// Handle a new page title.
    ///
    /// Numeric surfaces are updated before this returns. The returned future
    /// finishes the icon update and should be spawned, not awaited inline.
    pub fn on_title_changed(&self, title: &str) -> impl Future<Output = ()> + Send + 'static {
        let count = UnreadCount::from_title(title);
        self.last_count.store(count.get(), Ordering::SeqCst);
        log::debug!("[BADGE] title changed, unread={}", count);

        if let Err(e) = self.surfaces.set_os_badge(count) {
            log::warn!("[BADGE] failed to set OS badge: {}", e);
        }

        let icon_update = self.refresh_icons(count);

        if let Err(e) = self.surfaces.set_tooltip(&tooltip_text(&self.label, count)) {
            log::warn!("[BADGE] failed to set tray tooltip: {}", e);
        }

        icon_update
    }

    /// Re-render the icons for the last seen count, e.g. after the page swapped its favicon.
    pub fn on_favicon_changed(&self) -> impl Future<Output = ()> + Send + 'static {
        let count = UnreadCount::new(self.last_count.load(Ordering::SeqCst));
        self.refresh_icons(count)
    }

    fn refresh_icons(&self, count: UnreadCount) -> impl Future<Output = ()> + Send + 'static {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let render = self.renderer.render(self.favicon.current(), count);
        let latest = Arc::clone(&self.generation);
        let surfaces = Arc::clone(&self.surfaces);

        async move {
            let Some(image) = render.await else {
                return;
            };
            if latest.load(Ordering::SeqCst) != generation {
                log::debug!("[BADGE] dropping stale render (generation {})", generation);
                return;
            }
            if let Err(e) = surfaces.set_icons(&image) {
                log::warn!("[BADGE] failed to apply badge icon: {}", e);
            }
        }
    }
}
