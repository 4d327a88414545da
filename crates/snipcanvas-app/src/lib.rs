//! SnipCanvas Application
//!
//! Headless host that measures a viewport, replays a script of host events
//! against a canvas session and writes the resulting export.

mod app;
mod error;
pub mod script;

pub use app::{App, AppConfig};
pub use error::{AppError, AppResult};
pub use script::HostEvent;
