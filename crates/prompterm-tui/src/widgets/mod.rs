mod controls_bar;
mod editor;
mod popup;
mod prompter;

pub use controls_bar::ControlsBarWidget;
pub use editor::EditorWidget;
pub use popup::{centered_rect, ShortcutsPopup};
pub use prompter::{mirror_row, NoticeWidget, PrompterWidget};
