//! Everything the shell does to or on behalf of the loaded web page.
//!
//! - `bridge`: script injected on every load (favicon reporting, permission answers)
//! - `policy`: link-opening and permission rules
//! - `privacy`: the blur toggle

pub mod bridge;
pub mod policy;
pub mod privacy;

pub use policy::LinkAction;
pub use privacy::BlurSpec;
