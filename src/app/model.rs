use std::path::{Path, PathBuf};

use tracing::debug;

use crate::clipboard::clipboard_text;
use crate::editor::EditorBuffer;
use crate::render::{ComrakRenderer, Rendered, render_document};
use crate::sync::{PaneContent, ScrollSync, SyncTarget};
use crate::ui::viewport::Viewport;
use crate::ui::wrap::wrap_text;

/// How long an informational toast stays up.
const INFO_TOAST_MS: u64 = 1_500;
/// How long warnings, errors and the export hint stay up.
pub(super) const ALERT_TOAST_MS: u64 = 5_000;

pub use crate::sync::Pane;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
struct Toast {
    level: ToastLevel,
    message: String,
    expires_at_ms: u64,
}

/// The complete application state.
///
/// All state lives here - no global or scattered state. Time is the event
/// loop's millisecond clock, advanced by `Message::Tick`.
pub struct Model {
    /// File being edited
    pub file_path: PathBuf,
    /// Source pane text
    pub buffer: EditorBuffer,
    /// Normalized text, HTML and visible text of the current buffer
    pub rendered: Rendered,
    /// Visible text wrapped to the preview pane width
    pub preview_lines: Vec<String>,
    /// Scroll state of the source pane
    pub source_view: Viewport,
    /// Scroll state of the preview pane
    pub preview_view: Viewport,
    /// Scroll synchronizer for the pane pair
    pub sync: ScrollSync,
    /// Pane receiving keyboard input
    pub focus: Pane,
    /// Event loop clock in milliseconds
    pub now_ms: u64,
    /// Where exports are written
    pub export_path: PathBuf,
    /// Open exports in the browser after writing them
    pub open_export: bool,
    /// Global config path shown in help
    pub config_global_path: Option<PathBuf>,
    /// Local override path shown in help
    pub config_local_path: Option<PathBuf>,
    /// Whether help overlay is visible
    pub help_visible: bool,
    /// Whether the app should quit
    pub should_quit: bool,
    /// Set after first quit attempt with unsaved changes; allows second quit to proceed
    pub quit_confirmed: bool,
    terminal_size: (u16, u16),
    renderer: ComrakRenderer,
    toast: Option<Toast>,
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("file_path", &self.file_path)
            .field("focus", &self.focus)
            .field("sync", &self.sync.state())
            .field("now_ms", &self.now_ms)
            .finish_non_exhaustive()
    }
}

impl Default for Model {
    fn default() -> Self {
        Self {
            file_path: PathBuf::new(),
            buffer: EditorBuffer::default(),
            rendered: Rendered::default(),
            preview_lines: Vec::new(),
            source_view: Viewport::default(),
            preview_view: Viewport::default(),
            sync: ScrollSync::default(),
            focus: Pane::Source,
            now_ms: 0,
            export_path: PathBuf::new(),
            open_export: true,
            config_global_path: None,
            config_local_path: None,
            help_visible: false,
            should_quit: false,
            quit_confirmed: false,
            terminal_size: (80, 24),
            renderer: ComrakRenderer::default(),
            toast: None,
        }
    }
}

impl Model {
    /// Create a model for `buffer` laid out in a terminal of `terminal_size`.
    pub fn new(file_path: PathBuf, buffer: EditorBuffer, terminal_size: (u16, u16)) -> Self {
        let export_path = crate::export::default_export_path(&file_path);
        let mut model = Self {
            file_path,
            buffer,
            export_path,
            terminal_size,
            ..Self::default()
        };
        model.relayout(terminal_size.0, terminal_size.1);
        model.refresh_preview();
        model
    }

    #[must_use]
    pub const fn with_sync(mut self, sync: ScrollSync) -> Self {
        self.sync = sync;
        self
    }

    pub const fn terminal_size(&self) -> (u16, u16) {
        self.terminal_size
    }

    /// Re-render the preview from the buffer.
    pub fn refresh_preview(&mut self) {
        self.rendered = render_document(&self.renderer, &self.buffer.text());
        self.rewrap_preview();
        self.source_view.set_total_lines(self.buffer.line_count());
    }

    /// Apply a new terminal size to both panes.
    pub fn relayout(&mut self, width: u16, height: u16) {
        self.terminal_size = (width, height);
        let source = crate::ui::pane_inner_rect(self.terminal_size, Pane::Source);
        let preview = crate::ui::pane_inner_rect(self.terminal_size, Pane::Preview);
        self.source_view.resize(source.height);
        self.preview_view.resize(preview.height);
        self.rewrap_preview();
    }

    fn rewrap_preview(&mut self) {
        let width = crate::ui::pane_inner_rect(self.terminal_size, Pane::Preview).width;
        self.preview_lines = if self.rendered.is_empty() {
            Vec::new()
        } else {
            wrap_text(&self.rendered.text, width)
        };
        self.preview_view.set_total_lines(self.preview_lines.len());
    }

    pub const fn viewport(&self, pane: Pane) -> &Viewport {
        match pane {
            Pane::Source => &self.source_view,
            Pane::Preview => &self.preview_view,
        }
    }

    pub const fn viewport_mut(&mut self, pane: Pane) -> &mut Viewport {
        match pane {
            Pane::Source => &mut self.source_view,
            Pane::Preview => &mut self.preview_view,
        }
    }

    /// Scroll `pane` as a user action. Moves that change the offset are
    /// reported to the synchronizer.
    pub(super) fn user_scroll(&mut self, pane: Pane, delta: isize) {
        if self.viewport_mut(pane).scroll_by(delta) {
            self.report_scroll(pane);
        }
    }

    pub(super) fn user_scroll_pages(&mut self, pane: Pane, pages: isize) {
        if self.viewport_mut(pane).scroll_pages(pages) {
            self.report_scroll(pane);
        }
    }

    /// Keep the editor cursor on screen; counts as a user scroll of the source.
    pub(super) fn follow_cursor(&mut self) {
        let line = self.buffer.cursor().line;
        if self.source_view.ensure_visible(line) {
            self.report_scroll(Pane::Source);
        }
    }

    fn report_scroll(&mut self, pane: Pane) {
        #[allow(clippy::cast_precision_loss)]
        let offset = self.viewport(pane).offset() as f64;
        self.sync.on_scroll(pane, offset, self.now_ms);
    }

    /// Run the pending sync if its delay has passed. Returns true if the
    /// receiving pane was moved.
    pub(super) fn fire_ready_sync(&mut self) -> bool {
        let Some(pending) = self.sync.take_ready(self.now_ms) else {
            return false;
        };
        let source_text = self.buffer.text();
        let source = self.pane_content(Pane::Source, &source_text);
        let preview = self.pane_content(Pane::Preview, &self.rendered.text);
        let (origin, target) = match pending.origin {
            Pane::Source => (source, preview),
            Pane::Preview => (preview, source),
        };
        let target = pending.resolve(&origin, &target);
        self.apply_sync(target)
    }

    fn pane_content<'a>(&self, pane: Pane, text: &'a str) -> PaneContent<'a> {
        #[allow(clippy::cast_precision_loss)]
        let height = self.viewport(pane).total_lines() as f64;
        PaneContent::new(text, height)
    }

    /// Set the receiving pane's offset directly. This never goes through the
    /// scroll path, so it cannot schedule another sync.
    fn apply_sync(&mut self, target: SyncTarget) -> bool {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let offset = target.offset.round().max(0.0) as usize;
        let view = self.viewport_mut(target.pane);
        let before = view.offset();
        view.set_offset(offset);
        let after = view.offset();
        debug!(
            pane = target.pane.label(),
            requested = target.offset,
            before,
            after,
            alignment = ?target.alignment,
            "sync applied"
        );
        before != after
    }

    /// Text placed on the clipboard by the copy command.
    pub fn copy_text(&self) -> String {
        clipboard_text(&self.rendered.normalized)
    }

    /// Title used for exported documents.
    pub fn document_title(&self) -> String {
        self.file_path
            .file_stem()
            .map_or_else(|| "Markdown Export".to_string(), |s| s.to_string_lossy().to_string())
    }

    pub fn file_name(&self) -> String {
        self.file_path
            .file_name()
            .map_or_else(|| "untitled".to_string(), |s| s.to_string_lossy().to_string())
    }

    pub(super) fn set_export_path(&mut self, path: Option<&Path>) {
        self.export_path = path.map_or_else(
            || crate::export::default_export_path(&self.file_path),
            Path::to_path_buf,
        );
    }

    pub fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        let ttl = match level {
            ToastLevel::Info => INFO_TOAST_MS,
            ToastLevel::Warning | ToastLevel::Error => ALERT_TOAST_MS,
        };
        self.show_toast_for(level, message, ttl);
    }

    pub(super) fn show_toast_for(
        &mut self,
        level: ToastLevel,
        message: impl Into<String>,
        ttl_ms: u64,
    ) {
        self.toast = Some(Toast {
            level,
            message: message.into(),
            expires_at_ms: self.now_ms.saturating_add(ttl_ms),
        });
    }

    pub(super) fn expire_toast(&mut self) -> bool {
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| toast.expires_at_ms <= self.now_ms)
        {
            self.toast = None;
            return true;
        }
        false
    }

    pub fn active_toast(&self) -> Option<(&str, ToastLevel)> {
        self.toast
            .as_ref()
            .map(|toast| (toast.message.as_str(), toast.level))
    }

    /// Earliest time something time-driven changes (sync or toast expiry).
    pub fn next_wakeup_ms(&self) -> Option<u64> {
        let toast = self.toast.as_ref().map(|toast| toast.expires_at_ms);
        match (self.sync.next_deadline_ms(), toast) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }
}
