pub mod app;
pub mod event;
pub mod frames;
pub mod input;
pub mod keymap;
pub mod surface;
pub mod theme;
pub mod widgets;

pub use app::{App, PrompterSettings};
pub use theme::Theme;
