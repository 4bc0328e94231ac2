pub mod logging;
pub mod page;
