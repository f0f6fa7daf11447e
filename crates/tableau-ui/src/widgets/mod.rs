//! Stock elements.

mod button;
mod context_menu;
mod entry;
mod label;
mod panel;

pub use button::{Button, ClickFn};
pub use context_menu::ContextMenu;
pub use entry::EntryBox;
pub use label::Label;
pub use panel::Panel;
