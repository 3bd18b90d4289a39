// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. export::ExportError)
    clippy::module_name_repetitions
)]

//! # mdsync
//!
//! A terminal markdown editor with a live preview that keeps both panes
//! scrolled to the same place.
//!
//! - LaTeX-style math delimiters (`\[ \]`, `\( \)`) are normalized to
//!   `$$`/`$` before rendering
//! - Scrolling either pane moves the other to the matching text, found by
//!   fuzzy paragraph matching rather than line arithmetic
//! - The converted markdown can be copied, and the rendered document
//!   exported as a printable page
//!
//! ## Architecture
//!
//! mdsync uses The Elm Architecture (TEA) pattern:
//! - **Model**: Application state
//! - **Message**: Events and actions
//! - **Update**: Pure state transitions
//! - **View**: Render to terminal
//!
//! ## Modules
//!
//! - [`app`]: Main application loop and state
//! - [`sync`]: Debounced scroll synchronization and text matching
//! - [`normalize`]: Math delimiter normalization
//! - [`render`]: Markdown rendering and visible-text extraction
//! - [`editor`]: Source buffer
//! - [`ui`]: Terminal UI components
//! - [`clipboard`], [`export`]: Copy and print output
//! - [`config`]: Persistent default flags

pub mod app;
pub mod clipboard;
pub mod config;
pub mod editor;
pub mod export;
pub mod normalize;
pub mod render;
pub mod sync;
pub mod ui;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Message, Model, Pane};
    pub use crate::render::{ComrakRenderer, Renderer};
    pub use crate::sync::{PaneContent, ScrollSync, find_matching_position};
    pub use crate::ui::viewport::Viewport;
}
