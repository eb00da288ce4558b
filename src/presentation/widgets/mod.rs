//! Reusable widgets.

mod checklist;
mod field_row;
mod input;
mod status_bar;

pub use checklist::{Checklist, ChecklistState};
pub use field_row::{EditHint, FieldRow};
pub use input::TextInput;
pub use status_bar::{Notice, StatusBar, StatusLevel};
