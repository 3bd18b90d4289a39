use std::io::{Write, stdout};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event;
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;
use ratatui::DefaultTerminal;
use tracing::{debug, info};

use crate::app::{App, Message, Model, ToastLevel, update};
use crate::clipboard::{Clipboard, SystemClipboard};
use crate::editor::EditorBuffer;
use crate::sync::{Deferred, ScrollSync};

/// Longest the loop sleeps when nothing is scheduled.
const IDLE_POLL_MS: u64 = 250;

impl App {
    /// Run the main event loop.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the terminal cannot be
    /// initialized, or the event loop hits an I/O failure.
    pub fn run(&mut self) -> Result<()> {
        let buffer = EditorBuffer::load(&self.file_path)
            .with_context(|| format!("Failed to open {}", self.file_path.display()))?;

        let mut terminal = ratatui::try_init()
            .context("Failed to initialize terminal - mdsync requires an interactive terminal")?;
        let result = match terminal.size() {
            Ok(size) => {
                let mut model = self.initial_model(buffer, (size.width, size.height));
                info!(
                    path = %model.file_path.display(),
                    lines = model.buffer.line_count(),
                    sync = model.sync.is_enabled(),
                    delay_ms = model.sync.delay_ms(),
                    "session started"
                );
                let mut clipboard = SystemClipboard;
                self.event_loop(&mut terminal, &mut model, &mut clipboard)
            }
            Err(err) => Err(err).context("Failed to read terminal size"),
        };

        // Restore terminal
        let _ = set_mouse_motion_tracking(false);
        let _ = execute!(stdout(), DisableBracketedPaste, DisableMouseCapture);
        ratatui::restore();

        result
    }

    pub(super) fn initial_model(&self, buffer: EditorBuffer, size: (u16, u16)) -> Model {
        let mut sync = ScrollSync::new(self.sync_delay);
        sync.set_enabled(self.sync_enabled);
        let mut model = Model::new(self.file_path.clone(), buffer, size).with_sync(sync);
        model.set_export_path(self.export_path.as_deref());
        model.open_export = self.open_export;
        model
            .config_global_path
            .clone_from(&self.config_global_path);
        model.config_local_path.clone_from(&self.config_local_path);
        if !model.file_path.exists() {
            model.show_toast(ToastLevel::Info, "New file - Ctrl+S to create it");
        }
        model
    }

    fn event_loop(
        &self,
        terminal: &mut DefaultTerminal,
        model: &mut Model,
        clipboard: &mut impl Clipboard,
    ) -> Result<()> {
        let start = Instant::now();
        let now_ms = || u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        let mut resize: Deferred<(u16, u16)> = Deferred::new();
        let mut needs_render = true;

        execute!(stdout(), EnableMouseCapture, EnableBracketedPaste)?;
        set_mouse_motion_tracking(true)?;

        loop {
            let tick_ms = now_ms();
            let before = (model.source_view.offset(), model.preview_view.offset());
            let had_toast = model.active_toast().is_some();
            *model = update(std::mem::take(model), Message::Tick(tick_ms));
            if before != (model.source_view.offset(), model.preview_view.offset())
                || had_toast != model.active_toast().is_some()
            {
                needs_render = true;
            }

            if let Some((width, height)) = resize.take_ready(tick_ms) {
                debug!(width, height, "resize applied");
                *model = update(std::mem::take(model), Message::Resize(width, height));
                needs_render = true;
            }

            if needs_render {
                terminal.draw(|frame| self.view(model, frame))?;
                needs_render = false;
            }

            if model.should_quit {
                break;
            }

            // Sleep until the next input or the next scheduled deadline.
            let deadline = [model.next_wakeup_ms(), resize.due_ms()]
                .into_iter()
                .flatten()
                .min();
            let poll_ms = deadline.map_or(IDLE_POLL_MS, |due| {
                due.saturating_sub(now_ms()).min(IDLE_POLL_MS)
            });
            if event::poll(Duration::from_millis(poll_ms))? {
                // Drain everything queued so key repeat bursts cost one render.
                loop {
                    let event_ms = now_ms();
                    let msg = self.handle_event(event::read()?, model, event_ms, &mut resize);
                    if let Some(msg) = msg {
                        let side_msg = msg.clone();
                        model.now_ms = model.now_ms.max(event_ms);
                        *model = update(std::mem::take(model), msg);
                        self.handle_message_side_effects(model, clipboard, &side_msg);
                        needs_render = true;
                    }
                    if model.should_quit || !event::poll(Duration::from_millis(0))? {
                        break;
                    }
                }
            }
        }
        Ok(())
    }
}

fn set_mouse_motion_tracking(enable: bool) -> std::io::Result<()> {
    // Any-event motion reporting (1003) with SGR encoding (1006), so pointer
    // crossings between panes arrive without a button held.
    let mut out = stdout();
    if enable {
        out.write_all(b"\x1b[?1003h\x1b[?1006h")?;
    } else {
        out.write_all(b"\x1b[?1003l\x1b[?1006l")?;
    }
    out.flush()
}
