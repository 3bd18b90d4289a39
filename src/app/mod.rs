//! Application state and main event loop.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete application state
//! - [`Message`]: All possible events and actions
//! - [`update`]: Pure function for state transitions
//! - [`App::run`]: Main event loop with rendering

mod effects;
mod event_loop;
mod input;
mod model;
mod update;

pub use model::{Model, Pane, ToastLevel};
pub use update::{Message, update};

use std::path::PathBuf;
use std::time::Duration;

use crate::sync::DEFAULT_DELAY;

/// Main application struct that owns the terminal and runs the event loop.
pub struct App {
    file_path: PathBuf,
    sync_enabled: bool,
    sync_delay: Duration,
    export_path: Option<PathBuf>,
    open_export: bool,
    config_global_path: Option<PathBuf>,
    config_local_path: Option<PathBuf>,
}

impl App {
    /// Create a new application for the given file.
    pub fn new(file_path: PathBuf) -> Self {
        Self {
            file_path,
            sync_enabled: true,
            sync_delay: DEFAULT_DELAY,
            export_path: None,
            open_export: true,
            config_global_path: None,
            config_local_path: None,
        }
    }

    /// Enable or disable scroll sync at startup.
    #[must_use]
    pub const fn with_sync(mut self, enabled: bool) -> Self {
        self.sync_enabled = enabled;
        self
    }

    /// Quiet period between the last scroll and the sync.
    #[must_use]
    pub const fn with_sync_delay(mut self, delay: Duration) -> Self {
        self.sync_delay = delay;
        self
    }

    /// Write exports here instead of next to the file.
    #[must_use]
    pub fn with_export_path(mut self, path: Option<PathBuf>) -> Self {
        self.export_path = path;
        self
    }

    /// Open exports in the browser after writing them.
    #[must_use]
    pub const fn with_open_export(mut self, open: bool) -> Self {
        self.open_export = open;
        self
    }

    /// Set config paths to show in help.
    #[must_use]
    pub fn with_config_paths(
        mut self,
        global_path: Option<PathBuf>,
        local_path: Option<PathBuf>,
    ) -> Self {
        self.config_global_path = global_path;
        self.config_local_path = local_path;
        self
    }
}

#[cfg(test)]
mod tests;
