//! Favicon references reported by the loaded page.
//!
//! The page bridge posts the `href` of the page's icon link whenever it
//! changes. The tracker keeps the latest one so a render started by a title
//! change reads whatever icon the page shows at that moment.

use std::time::Duration;

use base64::Engine;
use parking_lot::RwLock;
use tauri::Url;

use crate::error::{ShellError, ShellResult};

/// Hrefs longer than this are ignored. Inline icons are a few KiB at most.
pub const MAX_HREF_LEN: usize = 2 * 1024 * 1024;

/// Remote favicon bodies larger than this are rejected.
pub const MAX_ICON_BYTES: usize = 1024 * 1024;

/// Remote favicons that take longer than this are abandoned.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// A favicon reference the shell knows how to load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconSource {
    /// `data:` URL, already decoded.
    Inline { mime: String, bytes: Vec<u8> },
    /// `http(s)` URL fetched on demand.
    Remote(Url),
}

/// Raw icon bytes plus enough metadata to pick a decoder.
#[derive(Debug, Clone)]
pub struct LoadedIcon {
    pub bytes: Vec<u8>,
    pub is_svg: bool,
}

impl IconSource {
    /// Interpret an icon `href`. Unsupported schemes and broken data URLs give `None`.
    pub fn parse(href: &str) -> Option<Self> {
        let href = href.trim();
        if let Some(rest) = href.strip_prefix("data:") {
            return parse_data_url(rest);
        }

        let url = Url::parse(href).ok()?;
        matches!(url.scheme(), "http" | "https").then_some(IconSource::Remote(url))
    }

    /// Fetch (if needed) the icon bytes.
    pub async fn load(&self, client: &reqwest::Client) -> ShellResult<LoadedIcon> {
        match self {
            IconSource::Inline { mime, bytes } => Ok(LoadedIcon {
                bytes: bytes.clone(),
                is_svg: mime.contains("svg") || looks_like_svg(bytes),
            }),
            IconSource::Remote(url) => {
                let mut response = client
                    .get(url.clone())
                    .send()
                    .await
                    .and_then(|r| r.error_for_status())
                    .map_err(|e| ShellError::IconLoadError(format!("{}: {}", url, e)))?;

                let content_type_svg = response
                    .headers()
                    .get(reqwest::header::CONTENT_TYPE)
                    .and_then(|v| v.to_str().ok())
                    .is_some_and(|v| v.contains("svg"));

                if let Some(declared) = response.content_length() {
                    if declared > MAX_ICON_BYTES as u64 {
                        return Err(oversized(url));
                    }
                }

                let mut bytes = Vec::new();
                while let Some(chunk) = response
                    .chunk()
                    .await
                    .map_err(|e| ShellError::IconLoadError(format!("{}: {}", url, e)))?
                {
                    append_capped(&mut bytes, &chunk, url)?;
                }

                Ok(LoadedIcon {
                    is_svg: content_type_svg
                        || url.path().ends_with(".svg")
                        || looks_like_svg(&bytes),
                    bytes,
                })
            },
        }
    }
}

fn oversized(url: &Url) -> ShellError {
    ShellError::IconLoadError(format!("{}: icon exceeds {} bytes", url, MAX_ICON_BYTES))
}

fn append_capped(body: &mut Vec<u8>, chunk: &[u8], url: &Url) -> ShellResult<()> {
    if body.len() + chunk.len() > MAX_ICON_BYTES {
        return Err(oversized(url));
    }
    body.extend_from_slice(chunk);
    Ok(())
}

fn parse_data_url(rest: &str) -> Option<IconSource> {
    let (meta, data) = rest.split_once(',')?;
    let (mime, is_base64) = match meta.strip_suffix(";base64") {
        Some(mime) => (mime, true),
        None => (meta, false),
    };
    let mime = mime
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    let bytes = if is_base64 {
        let cleaned: String = data.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        base64::engine::general_purpose::STANDARD
            .decode(cleaned)
            .ok()?
    } else {
        urlencoding::decode_binary(data.as_bytes()).into_owned()
    };

    if bytes.is_empty() {
        return None;
    }
    Some(IconSource::Inline { mime, bytes })
}

fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(256)];
    String::from_utf8_lossy(head).contains("<svg")
}

/// HTTP client used for remote favicons.
pub fn build_client(user_agent: &str) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .user_agent(user_agent)
        .build()
        .unwrap_or_default()
}

/// Latest favicon href reported by the page.
#[derive(Debug, Default)]
pub struct FaviconTracker {
    current: RwLock<Option<String>>,
}

impl FaviconTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new href. Returns `true` when the stored value changed.
    pub fn update(&self, href: Option<String>) -> bool {
        let href = href
            .map(|h| h.trim().to_string())
            .filter(|h| !h.is_empty());
        if href.as_ref().is_some_and(|h| h.len() > MAX_HREF_LEN) {
            log::warn!("[FAVICON] ignoring oversized icon reference");
            return false;
        }

        let mut current = self.current.write();
        if *current == href {
            return false;
        }
        *current = href;
        true
    }

    pub fn current(&self) -> Option<String> {
        self.current.read().clone()
    }
}
