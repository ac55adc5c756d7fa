pub mod config;
pub mod error;
pub mod playback;
pub mod script;

pub use config::{AppConfig, KeymapConfig, PrompterConfig, ThemeName};
pub use error::{Error, Result};
pub use playback::{PlaybackCoordinator, ScrollEngine, ScrollState, Speed};
pub use script::Script;
