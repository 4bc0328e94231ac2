//! Title-driven unread badge pipeline.
//!
//! - `unread`: parses the unread count out of the page title
//! - `favicon`: tracks and loads the page's current favicon
//! - `renderer`: composes the badge image
//! - `sync`: fans a title change out to every indicator surface
//! - `surfaces`: the window/tray implementation of those surfaces

pub mod favicon;
pub mod renderer;
pub mod surfaces;
pub mod sync;
pub mod unread;

pub use favicon::FaviconTracker;
pub use renderer::{BadgeImage, BadgeRenderer, IconRenderer};
pub use surfaces::TauriSurfaces;
pub use sync::{IndicatorSurfaces, SurfaceSynchronizer};
pub use unread::UnreadCount;

/// The synchronizer as wired into the running app.
pub type BadgeSync = SurfaceSynchronizer<TauriSurfaces, BadgeRenderer>;
