use crossterm::event::{self, Event, KeyCode, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::Frame;
use unicode_width::UnicodeWidthChar;

use crate::app::model::Pane;
use crate::app::{App, Message, Model};
use crate::editor::Direction;
use crate::sync::Deferred;

/// Lines moved per mouse wheel notch.
const WHEEL_LINES: isize = 3;

/// Quiet period before a terminal resize is applied.
pub(super) const RESIZE_DELAY_MS: u64 = 100;

impl App {
    pub(super) fn handle_event(
        &self,
        event: Event,
        model: &Model,
        now_ms: u64,
        resize: &mut Deferred<(u16, u16)>,
    ) -> Option<Message> {
        match event {
            Event::Key(key) if key.kind != event::KeyEventKind::Release => {
                self.handle_key(key, model)
            }
            Event::Mouse(mouse) => self.handle_mouse(mouse, model),
            Event::Paste(text) if model.focus == Pane::Source && !model.help_visible => {
                Some(Message::EditorInsertStr(text))
            }
            Event::Resize(w, h) => {
                tracing::trace!(width = w, height = h, "resize queued");
                resize.schedule(now_ms, RESIZE_DELAY_MS, (w, h));
                None
            }
            _ => None,
        }
    }

    pub(super) fn handle_key(&self, key: event::KeyEvent, model: &Model) -> Option<Message> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        // Commands work from either pane.
        if ctrl {
            match key.code {
                KeyCode::Char('q' | 'c') => return Some(Message::Quit),
                KeyCode::Char('s') => return Some(Message::Save),
                KeyCode::Char('y') => return Some(Message::CopyConverted),
                KeyCode::Char('p') => return Some(Message::Export),
                KeyCode::Char('l') => return Some(Message::ToggleSync),
                KeyCode::Home => return Some(Message::GoToTop),
                KeyCode::End => return Some(Message::GoToBottom),
                _ => {}
            }
        }

        if model.help_visible {
            return match key.code {
                KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('q' | '?') => Some(Message::HideHelp),
                _ => None,
            };
        }

        match key.code {
            KeyCode::F(1) => return Some(Message::ToggleHelp),
            KeyCode::Tab | KeyCode::BackTab => return Some(Message::SwitchFocus),
            KeyCode::PageUp => return Some(Message::ScrollFocusedPages(-1)),
            KeyCode::PageDown => return Some(Message::ScrollFocusedPages(1)),
            _ => {}
        }

        match model.focus {
            Pane::Source => Self::handle_source_key(key),
            Pane::Preview => Self::handle_preview_key(key),
        }
    }

    fn handle_source_key(key: event::KeyEvent) -> Option<Message> {
        if key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
        {
            return None;
        }
        match key.code {
            KeyCode::Char(ch) => Some(Message::EditorInsertChar(ch)),
            KeyCode::Enter => Some(Message::EditorSplitLine),
            KeyCode::Backspace => Some(Message::EditorDeleteBack),
            KeyCode::Delete => Some(Message::EditorDeleteForward),
            KeyCode::Left => Some(Message::EditorMoveCursor(Direction::Left)),
            KeyCode::Right => Some(Message::EditorMoveCursor(Direction::Right)),
            KeyCode::Up => Some(Message::EditorMoveCursor(Direction::Up)),
            KeyCode::Down => Some(Message::EditorMoveCursor(Direction::Down)),
            KeyCode::Home => Some(Message::EditorMoveHome),
            KeyCode::End => Some(Message::EditorMoveEnd),
            KeyCode::Esc => Some(Message::FocusPane(Pane::Preview)),
            _ => None,
        }
    }

    fn handle_preview_key(key: event::KeyEvent) -> Option<Message> {
        match key.code {
            KeyCode::Char('q') => Some(Message::Quit),
            KeyCode::Char('?') => Some(Message::ToggleHelp),
            KeyCode::Char('j') | KeyCode::Down => Some(Message::ScrollFocused(1)),
            KeyCode::Char('k') | KeyCode::Up => Some(Message::ScrollFocused(-1)),
            KeyCode::Char(' ') => Some(Message::ScrollFocusedPages(1)),
            KeyCode::Char('b') => Some(Message::ScrollFocusedPages(-1)),
            KeyCode::Char('g') | KeyCode::Home => Some(Message::GoToTop),
            KeyCode::Char('G') | KeyCode::End => Some(Message::GoToBottom),
            KeyCode::Char('e') | KeyCode::Enter => Some(Message::FocusPane(Pane::Source)),
            _ => None,
        }
    }

    pub(super) fn handle_mouse(&self, mouse: MouseEvent, model: &Model) -> Option<Message> {
        if model.help_visible {
            return None;
        }
        let size = model.terminal_size();
        let pane = crate::ui::pane_at(size, mouse.column, mouse.row)?;

        match mouse.kind {
            MouseEventKind::ScrollDown => Some(Message::Scroll(pane, WHEEL_LINES)),
            MouseEventKind::ScrollUp => Some(Message::Scroll(pane, -WHEEL_LINES)),
            MouseEventKind::Down(MouseButton::Left) => match pane {
                Pane::Source => source_position(model, mouse.column, mouse.row)
                    .map(|(line, col)| Message::EditorMoveTo(line, col)),
                Pane::Preview => Some(Message::FocusPane(Pane::Preview)),
            },
            // Only report crossings; the pointer stays in a pane for many events.
            MouseEventKind::Moved | MouseEventKind::Drag(_)
                if model.sync.active() != Some(pane) =>
            {
                Some(Message::PointerEnter(pane))
            }
            _ => None,
        }
    }

    pub(super) fn view(&self, model: &Model, frame: &mut Frame) {
        crate::ui::render(model, frame);
    }
}

/// Map a click in the source pane to a buffer (line, char column).
fn source_position(model: &Model, column: u16, row: u16) -> Option<(usize, usize)> {
    let inner = crate::ui::pane_inner_rect(model.terminal_size(), Pane::Source);
    if row < inner.y || row >= inner.y + inner.height {
        return None;
    }
    let line = model.source_view.offset() + usize::from(row - inner.y);
    let line = line.min(model.buffer.line_count().saturating_sub(1));
    let display_col = usize::from(column.saturating_sub(inner.x));
    let text = model.buffer.line_at(line).unwrap_or_default();
    Some((line, char_index_at_column(&text, display_col)))
}

/// Char index under display column `target`, counting wide chars as two cells.
fn char_index_at_column(text: &str, target: usize) -> usize {
    let mut width = 0;
    for (idx, ch) in text.trim_end_matches('\n').chars().enumerate() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > target {
            return idx;
        }
        width += ch_width;
    }
    text.trim_end_matches('\n').chars().count()
}
