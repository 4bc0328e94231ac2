//! Badge image composition.
//!
//! Turns the page's favicon plus an unread count into a 64x64 icon: the
//! favicon as the base layer, and for a nonzero count a red disc in the
//! top-right quadrant carrying the count in white bold text. The overlay is
//! drawn as a tiny SVG through resvg so text shaping uses the system fonts.

use std::io::Cursor;
use std::sync::{Arc, OnceLock};

use futures::future::{BoxFuture, FutureExt};
use image::{imageops::FilterType, RgbaImage};
use resvg::usvg::fontdb;

use super::favicon::{build_client, IconSource, LoadedIcon};
use super::unread::UnreadCount;
use crate::error::{OptionExt, ShellError, ShellResult};

/// Edge length of every generated badge.
pub const BADGE_SIZE: u32 = 64;

/// Fixed geometry and colors of the unread overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct BadgeStyle {
    pub fill: &'static str,
    pub text_fill: &'static str,
    pub radius: f32,
    pub center_x: f32,
    pub center_y: f32,
    /// Font size for one or two characters.
    pub font_size: f32,
    /// Font size for the overflow label.
    pub font_size_wide: f32,
}

impl Default for BadgeStyle {
    fn default() -> Self {
        Self {
            fill: "#FF3B30",
            text_fill: "#FFFFFF",
            radius: 16.0,
            center_x: 46.0,
            center_y: 18.0,
            font_size: 20.0,
            font_size_wide: 14.0,
        }
    }
}

/// Rendered badge, ready for the window and tray.
#[derive(Clone)]
pub struct BadgeImage {
    pub width: u32,
    pub height: u32,
    /// Straight (non-premultiplied) RGBA.
    pub rgba: Vec<u8>,
    /// PNG encoding of the same pixels.
    pub png: Vec<u8>,
}

impl std::fmt::Debug for BadgeImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BadgeImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("png_bytes", &self.png.len())
            .finish()
    }
}

impl BadgeImage {
    fn from_canvas(canvas: RgbaImage) -> ShellResult<Self> {
        let mut png = Vec::new();
        canvas
            .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
            .map_err(|e| ShellError::RenderError(format!("PNG encoding failed: {}", e)))?;

        Ok(Self {
            width: canvas.width(),
            height: canvas.height(),
            rgba: canvas.into_raw(),
            png,
        })
    }

    /// Convert into an icon Tauri can hand to windows and trays.
    pub fn to_icon(&self) -> tauri::image::Image<'static> {
        tauri::image::Image::new_owned(self.rgba.clone(), self.width, self.height)
    }
}

/// Asynchronous "icon source + count -> image" capability.
///
/// Every failure resolves to `None`; callers keep their current icons then.
pub trait IconRenderer: Send + Sync + 'static {
    fn render(
        &self,
        icon_href: Option<String>,
        count: UnreadCount,
    ) -> BoxFuture<'static, Option<BadgeImage>>;
}

/// Production renderer: loads the favicon and composes the badge off the event loop.
pub struct BadgeRenderer {
    client: reqwest::Client,
    style: BadgeStyle,
}

impl BadgeRenderer {
    pub fn new(user_agent: &str) -> Self {
        Self {
            client: build_client(user_agent),
            style: BadgeStyle::default(),
        }
    }
}

impl IconRenderer for BadgeRenderer {
    fn render(
        &self,
        icon_href: Option<String>,
        count: UnreadCount,
    ) -> BoxFuture<'static, Option<BadgeImage>> {
        let client = self.client.clone();
        let style = self.style.clone();

        async move {
            let Some(href) = icon_href else {
                log::debug!("[BADGE] page has no favicon, skipping render");
                return None;
            };

            match render_from_href(&client, &href, count, style).await {
                Ok(image) => Some(image),
                Err(e) => {
                    log::warn!("[BADGE] render for count {} failed: {}", count, e);
                    None
                },
            }
        }
        .boxed()
    }
}

async fn render_from_href(
    client: &reqwest::Client,
    href: &str,
    count: UnreadCount,
    style: BadgeStyle,
) -> ShellResult<BadgeImage> {
    let source = IconSource::parse(href).ok_or_else(|| {
        ShellError::IconLoadError("unsupported favicon reference".to_string())
    })?;
    let icon = source.load(client).await?;

    tokio::task::spawn_blocking(move || compose_badge(&icon, count, &style))
        .await
        .map_err(|e| ShellError::RenderError(format!("render task failed: {}", e)))?
}

/// Compose the badge synchronously.
pub fn compose_badge(
    icon: &LoadedIcon,
    count: UnreadCount,
    style: &BadgeStyle,
) -> ShellResult<BadgeImage> {
    let mut canvas = decode_base_layer(icon)?;

    if !count.is_zero() {
        let overlay = rasterize_svg(&overlay_svg(count, style), BADGE_SIZE)?;
        image::imageops::overlay(&mut canvas, &overlay, 0, 0);
    }

    BadgeImage::from_canvas(canvas)
}

fn decode_base_layer(icon: &LoadedIcon) -> ShellResult<RgbaImage> {
    if icon.is_svg {
        let svg = std::str::from_utf8(&icon.bytes)
            .map_err(|e| ShellError::IconLoadError(format!("SVG favicon is not UTF-8: {}", e)))?;
        return rasterize_svg(svg, BADGE_SIZE);
    }

    Ok(image::load_from_memory(&icon.bytes)?
        .resize_exact(BADGE_SIZE, BADGE_SIZE, FilterType::Lanczos3)
        .into_rgba8())
}

/// SVG markup for the unread disc and its label.
pub fn overlay_svg(count: UnreadCount, style: &BadgeStyle) -> String {
    let label = count.display_label();
    let font_size = if label.len() > 2 {
        style.font_size_wide
    } else {
        style.font_size
    };

    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{size}" height="{size}" viewBox="0 0 {size} {size}"><circle cx="{cx}" cy="{cy}" r="{r}" fill="{fill}"/><text x="{cx}" y="{cy}" text-anchor="middle" dominant-baseline="central" font-family="Arial, Helvetica, sans-serif" font-weight="bold" font-size="{font_size}" fill="{text_fill}">{label}</text></svg>"#,
        size = BADGE_SIZE,
        cx = style.center_x,
        cy = style.center_y,
        r = style.radius,
        fill = style.fill,
        text_fill = style.text_fill,
    )
}

/// Font database shared by every render; loading system fonts is slow.
fn system_fonts() -> Arc<fontdb::Database> {
    static FONTS: OnceLock<Arc<fontdb::Database>> = OnceLock::new();
    FONTS
        .get_or_init(|| {
            let mut db = fontdb::Database::new();
            db.load_system_fonts();
            log::debug!("[BADGE] loaded {} font faces", db.len());
            Arc::new(db)
        })
        .clone()
}

fn rasterize_svg(svg: &str, size: u32) -> ShellResult<RgbaImage> {
    let mut options = resvg::usvg::Options::default();
    options.fontdb = system_fonts();

    let tree = resvg::usvg::Tree::from_str(svg, &options)
        .map_err(|e| ShellError::RenderError(format!("invalid SVG: {}", e)))?;
    let tree_size = tree.size();

    let mut pixmap = resvg::tiny_skia::Pixmap::new(size, size)
        .context("failed to allocate badge surface")?;
    let transform = resvg::tiny_skia::Transform::from_scale(
        size as f32 / tree_size.width(),
        size as f32 / tree_size.height(),
    );
    resvg::render(&tree, transform, &mut pixmap.as_mut());

    // tiny-skia stores premultiplied alpha; icons want straight alpha.
    let mut rgba = Vec::with_capacity((size * size * 4) as usize);
    for pixel in pixmap.pixels() {
        let color = pixel.demultiply();
        rgba.extend_from_slice(&[color.red(), color.green(), color.blue(), color.alpha()]);
    }

    RgbaImage::from_raw(size, size, rgba).context("badge surface has unexpected size")
}
