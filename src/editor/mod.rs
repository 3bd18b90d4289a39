//! Source pane text buffer.
//!
//! A rope-backed buffer with one cursor, plus loading and saving of the
//! file being edited.

mod buffer;

pub use buffer::{Cursor, Direction, EditorBuffer, EditorError};
