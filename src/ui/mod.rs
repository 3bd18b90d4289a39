//! Terminal UI components.
//!
//! This module contains all UI-related code including:
//! - [`viewport`]: Scroll position and visible range of each pane
//! - [`wrap`]: Word wrapping of the preview text
//! - split-pane rendering, the status/toast line and the help overlay

pub mod viewport;
pub mod wrap;

mod overlays;
mod render;
mod status;

pub use render::{pane_at, pane_inner_rect, pane_rect, render, split_panes};

#[cfg(test)]
mod tests;
