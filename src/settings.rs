//! Typed application settings.
//!
//! The nested shape mirrors the settings surface of the UI (audio, playback,
//! display, privacy, notifications, storage). Defaults live on the structs;
//! a TOML config file and `GROOVEZILLA__` environment variables can override
//! them, and user changes are persisted through the store under `settings`.

mod load;
mod schema;

pub use load::{default_config_path, resolve_config_path};
pub use schema::*;
