//! Widgets built on the signal layer.

pub mod hover;
pub mod text_edit;
pub mod text_field;

pub use hover::{hover_cursor, HoverCursor};
pub use text_edit::TextBuffer;
pub use text_field::{text_field, FieldEnd, TextField, TextFieldConfig};
