use crate::app::Model;
use crate::app::model::Pane;
use crate::editor::Direction;

/// All possible events and actions in the application.
///
/// These represent user input, system events, and internal actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Time
    /// Advance the clock to the given millisecond timestamp
    Tick(u64),

    // Panes
    /// Pointer moved over a pane
    PointerEnter(Pane),
    /// Mouse wheel over a pane (negative is up)
    Scroll(Pane, isize),
    /// Scroll the focused pane by n lines (negative is up)
    ScrollFocused(isize),
    /// Scroll the focused pane by whole pages
    ScrollFocusedPages(isize),
    /// Go to beginning of the focused pane
    GoToTop,
    /// Go to end of the focused pane
    GoToBottom,
    /// Move keyboard focus to the other pane
    SwitchFocus,
    /// Move keyboard focus to a pane
    FocusPane(Pane),

    // Editor
    /// Insert a character at the cursor
    EditorInsertChar(char),
    /// Insert pasted text at the cursor
    EditorInsertStr(String),
    /// Split line at cursor (Enter)
    EditorSplitLine,
    /// Delete character before cursor (Backspace)
    EditorDeleteBack,
    /// Delete character at cursor (Delete)
    EditorDeleteForward,
    /// Move cursor in a direction
    EditorMoveCursor(Direction),
    /// Move cursor to beginning of line (Home)
    EditorMoveHome,
    /// Move cursor to end of line (End)
    EditorMoveEnd,
    /// Move cursor to absolute position (line, col), e.g. from a mouse click
    EditorMoveTo(usize, usize),

    // Commands
    /// Save the buffer to its file
    Save,
    /// Copy the converted markdown to the clipboard
    CopyConverted,
    /// Write the printable export
    Export,
    /// Turn scroll sync on or off
    ToggleSync,

    // Overlays
    /// Toggle help overlay
    ToggleHelp,
    /// Hide help overlay
    HideHelp,

    // Window
    /// Terminal resized
    Resize(u16, u16),
    /// Force redraw
    Redraw,

    // Application
    /// Quit the application
    Quit,
}

/// Pure function that updates the model based on a message.
///
/// This is the core of TEA - all state transitions happen here. File and
/// clipboard I/O for commands runs afterwards in the side-effect handler.
pub fn update(mut model: Model, msg: Message) -> Model {
    // Save preserves the flag so Ctrl+S can complete a pending quit.
    if !matches!(msg, Message::Quit | Message::Save | Message::Tick(_)) {
        model.quit_confirmed = false;
    }

    match msg {
        Message::Tick(now_ms) => {
            model.now_ms = model.now_ms.max(now_ms);
            model.expire_toast();
            model.fire_ready_sync();
        }

        // Panes
        Message::PointerEnter(pane) => model.sync.pointer_enter(pane),
        Message::Scroll(pane, delta) => {
            model.sync.pointer_enter(pane);
            model.user_scroll(pane, delta);
        }
        Message::ScrollFocused(delta) => {
            let pane = model.focus;
            model.sync.pointer_enter(pane);
            model.user_scroll(pane, delta);
        }
        Message::ScrollFocusedPages(pages) => {
            let pane = model.focus;
            model.sync.pointer_enter(pane);
            model.user_scroll_pages(pane, pages);
        }
        Message::GoToTop => {
            let pane = model.focus;
            model.sync.pointer_enter(pane);
            if pane == Pane::Source {
                model.buffer.move_to(0, 0);
            }
            model.user_scroll(pane, isize::MIN);
        }
        Message::GoToBottom => {
            let pane = model.focus;
            model.sync.pointer_enter(pane);
            if pane == Pane::Source {
                let last = model.buffer.line_count().saturating_sub(1);
                model.buffer.move_to(last, 0);
            }
            model.user_scroll(pane, isize::MAX);
        }
        Message::SwitchFocus => {
            model.focus = model.focus.other();
            model.sync.pointer_enter(model.focus);
        }
        Message::FocusPane(pane) => {
            model.focus = pane;
            model.sync.pointer_enter(pane);
        }

        // Editor
        Message::EditorInsertChar(ch) => edit(&mut model, |buf| buf.insert_char(ch)),
        Message::EditorInsertStr(text) => edit(&mut model, |buf| buf.insert_str(&text)),
        Message::EditorSplitLine => edit(&mut model, |buf| buf.split_line()),
        Message::EditorDeleteBack => edit(&mut model, |buf| {
            buf.delete_back();
        }),
        Message::EditorDeleteForward => edit(&mut model, |buf| {
            buf.delete_forward();
        }),
        Message::EditorMoveCursor(dir) => move_cursor(&mut model, |buf| buf.move_cursor(dir)),
        Message::EditorMoveHome => move_cursor(&mut model, |buf| buf.move_home()),
        Message::EditorMoveEnd => move_cursor(&mut model, |buf| buf.move_end()),
        Message::EditorMoveTo(line, col) => {
            model.focus = Pane::Source;
            move_cursor(&mut model, |buf| buf.move_to(line, col));
        }

        // Commands run their I/O in the side-effect handler.
        Message::Save | Message::CopyConverted | Message::Export | Message::Redraw => {}
        Message::ToggleSync => {
            let enabled = !model.sync.is_enabled();
            model.sync.set_enabled(enabled);
            model.show_toast(
                crate::app::ToastLevel::Info,
                if enabled {
                    "Scroll sync on"
                } else {
                    "Scroll sync off"
                },
            );
        }

        // Overlays
        Message::ToggleHelp => model.help_visible = !model.help_visible,
        Message::HideHelp => model.help_visible = false,

        // Window
        Message::Resize(width, height) => model.relayout(width, height),

        // Application
        Message::Quit => {
            if model.buffer.is_dirty() && !model.quit_confirmed {
                model.show_toast(
                    crate::app::ToastLevel::Warning,
                    "Unsaved changes! Press Ctrl+Q again to quit, or Ctrl+S to save",
                );
                model.quit_confirmed = true;
            } else {
                model.sync.dispose();
                model.should_quit = true;
            }
        }
    }
    model
}

/// Apply a text edit in the source pane and re-render the preview.
fn edit(model: &mut Model, apply: impl FnOnce(&mut crate::editor::EditorBuffer)) {
    if model.focus != Pane::Source {
        return;
    }
    model.sync.pointer_enter(Pane::Source);
    apply(&mut model.buffer);
    model.refresh_preview();
    model.follow_cursor();
}

fn move_cursor(model: &mut Model, apply: impl FnOnce(&mut crate::editor::EditorBuffer)) {
    if model.focus != Pane::Source {
        return;
    }
    model.sync.pointer_enter(Pane::Source);
    apply(&mut model.buffer);
    model.follow_cursor();
}
