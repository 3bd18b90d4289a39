use std::path::PathBuf;

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use tempfile::tempdir;

use crate::clipboard::Clipboard;
use crate::editor::{Direction, EditorBuffer};
use crate::sync::{Deferred, PaneContent, SyncState, find_matching_position};

use super::{App, Message, Model, Pane, ToastLevel, update};

/// Clipboard double that remembers what it was given.
#[derive(Default)]
struct RecordingClipboard {
    copied: Vec<String>,
    fail: bool,
}

impl Clipboard for RecordingClipboard {
    fn copy(&mut self, text: &str) -> std::io::Result<()> {
        if self.fail {
            return Err(std::io::Error::other("clipboard unavailable"));
        }
        self.copied.push(text.to_string());
        Ok(())
    }
}

fn paragraphs(count: usize) -> String {
    (1..=count)
        .map(|i| format!("Paragraph {i}"))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn create_test_model(md: &str) -> Model {
    Model::new(
        PathBuf::from("test.md"),
        EditorBuffer::from_text(md),
        (80, 24),
    )
}

fn create_long_test_model() -> Model {
    create_test_model(&paragraphs(60))
}

fn tick(model: Model, now_ms: u64) -> Model {
    update(model, Message::Tick(now_ms))
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn ctrl(ch: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL)
}

fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
    MouseEvent {
        kind,
        column,
        row,
        modifiers: KeyModifiers::NONE,
    }
}

#[test]
fn test_default_model_skips_render_and_layout() {
    let model = Model::default();
    assert!(model.rendered.html.is_empty());
    assert!(model.preview_lines.is_empty());
    assert_eq!(model.terminal_size(), (80, 24));
    assert_eq!(model.source_view.height(), 0);

    let built = Model::new(PathBuf::from("n.md"), EditorBuffer::from_text("# Hi"), (80, 24));
    assert_eq!(built.preview_lines, vec!["Hi".to_string()]);
    assert_eq!(built.export_path, PathBuf::from("n.print.html"));
}

#[test]
fn test_long_model_has_matching_pane_heights() {
    let model = create_long_test_model();
    assert_eq!(model.source_view.total_lines(), 119);
    assert_eq!(model.preview_view.total_lines(), 119);
    assert_eq!(model.source_view.height(), 21);
}

#[test]
fn test_scroll_burst_syncs_once_after_quiet_period() {
    let mut model = create_long_test_model();
    for now in [0, 50, 100] {
        model = tick(model, now);
        model = update(model, Message::Scroll(Pane::Source, 5));
    }
    assert_eq!(model.source_view.offset(), 15);
    assert!(model.sync.is_pending());

    model = tick(model, 249);
    assert_eq!(model.preview_view.offset(), 0);

    model = tick(model, 250);
    let source_text = model.buffer.text();
    let expected = find_matching_position(
        &PaneContent::new(&source_text, 119.0),
        &PaneContent::new(&model.rendered.text, 119.0),
        15.0,
    );
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let expected = expected.round() as usize;
    assert!(expected > 0);
    assert_eq!(model.preview_view.offset(), expected);
    assert!(!model.sync.is_pending());
    assert_eq!(model.source_view.offset(), 15);
}

#[test]
fn test_applied_sync_does_not_echo_back() {
    let mut model = create_long_test_model();
    model = update(model, Message::Scroll(Pane::Preview, 30));
    model = tick(model, 150);
    let source_offset = model.source_view.offset();
    assert!(source_offset > 0);
    assert_eq!(model.sync.state(), SyncState::Tracking(Pane::Preview));

    // Nothing else fires and the preview is left where the user put it.
    model = tick(model, 5_000);
    assert_eq!(model.preview_view.offset(), 30);
    assert_eq!(model.source_view.offset(), source_offset);
}

#[test]
fn test_scroll_that_does_not_move_schedules_nothing() {
    let model = create_long_test_model();
    let model = update(model, Message::Scroll(Pane::Source, -3));
    assert!(!model.sync.is_pending());
    assert_eq!(model.sync.active(), Some(Pane::Source));
}

#[test]
fn test_pointer_enter_switches_driving_pane() {
    let mut model = create_long_test_model();
    model = update(model, Message::PointerEnter(Pane::Preview));
    assert_eq!(model.sync.state(), SyncState::Tracking(Pane::Preview));
    model = update(model, Message::PointerEnter(Pane::Source));
    assert_eq!(model.sync.active(), Some(Pane::Source));
}

#[test]
fn test_keyboard_scroll_drives_focused_pane() {
    let mut model = create_long_test_model();
    model = update(model, Message::FocusPane(Pane::Preview));
    model = update(model, Message::ScrollFocusedPages(1));
    assert_eq!(model.preview_view.offset(), 21);
    assert_eq!(model.sync.active(), Some(Pane::Preview));
    assert!(model.sync.is_pending());
}

#[test]
fn test_toggle_sync_off_drops_pending_and_ignores_scrolls() {
    let mut model = create_long_test_model();
    model = update(model, Message::Scroll(Pane::Source, 10));
    model = update(model, Message::ToggleSync);
    assert!(!model.sync.is_enabled());
    assert_eq!(model.active_toast(), Some(("Scroll sync off", ToastLevel::Info)));

    model = update(model, Message::Scroll(Pane::Source, 10));
    model = tick(model, 1_000);
    assert_eq!(model.source_view.offset(), 20);
    assert_eq!(model.preview_view.offset(), 0);

    model = update(model, Message::ToggleSync);
    assert!(model.sync.is_enabled());
}

#[test]
fn test_cursor_leaving_viewport_scrolls_source_and_schedules_sync() {
    let mut model = create_long_test_model();
    for _ in 0..30 {
        model = update(model, Message::EditorMoveCursor(Direction::Down));
    }
    assert_eq!(model.buffer.cursor().line, 30);
    assert_eq!(model.source_view.offset(), 10);
    assert!(model.sync.is_pending());
}

#[test]
fn test_typing_updates_preview() {
    let mut model = create_test_model("");
    for ch in "# Hi".chars() {
        model = update(model, Message::EditorInsertChar(ch));
    }
    assert_eq!(model.buffer.text(), "# Hi");
    assert_eq!(model.rendered.text, "Hi");
    assert_eq!(model.preview_lines, vec!["Hi".to_string()]);
    assert!(model.buffer.is_dirty());
}

#[test]
fn test_paste_and_math_normalization_reach_preview() {
    let model = create_test_model("");
    let model = update(
        model,
        Message::EditorInsertStr("Inline \\(a+b\\) math".to_string()),
    );
    assert_eq!(model.rendered.normalized, "Inline $a+b$ math");
    assert_eq!(model.rendered.text, "Inline a+b math");
}

#[test]
fn test_edits_are_ignored_while_preview_focused() {
    let model = create_test_model("abc");
    let model = update(model, Message::FocusPane(Pane::Preview));
    let model = update(model, Message::EditorInsertChar('x'));
    assert_eq!(model.buffer.text(), "abc");
    assert!(!model.buffer.is_dirty());
}

#[test]
fn test_click_moves_cursor_and_focuses_source() {
    let model = create_test_model("hello\nworld");
    let model = update(model, Message::FocusPane(Pane::Preview));
    let model = update(model, Message::EditorMoveTo(1, 2));
    assert_eq!(model.focus, Pane::Source);
    assert_eq!(model.buffer.cursor().line, 1);
    assert_eq!(model.buffer.cursor().col, 2);
}

#[test]
fn test_switch_focus_counts_as_pointer_enter() {
    let model = create_test_model("text");
    let model = update(model, Message::SwitchFocus);
    assert_eq!(model.focus, Pane::Preview);
    assert_eq!(model.sync.active(), Some(Pane::Preview));
}

#[test]
fn test_go_to_bottom_and_top_of_preview() {
    let mut model = create_long_test_model();
    model = update(model, Message::FocusPane(Pane::Preview));
    model = update(model, Message::GoToBottom);
    assert_eq!(model.preview_view.offset(), 98);
    model = update(model, Message::GoToTop);
    assert_eq!(model.preview_view.offset(), 0);
}

#[test]
fn test_resize_relayouts_both_panes() {
    let model = create_long_test_model();
    let model = update(model, Message::Resize(60, 12));
    assert_eq!(model.terminal_size(), (60, 12));
    assert_eq!(model.source_view.height(), 9);
    assert_eq!(model.preview_view.height(), 9);
}

#[test]
fn test_toast_expires_on_tick() {
    let mut model = create_test_model("text");
    model = tick(model, 1_000);
    model.show_toast(ToastLevel::Info, "Copied!");
    model = tick(model, 2_499);
    assert!(model.active_toast().is_some());
    model = tick(model, 2_500);
    assert!(model.active_toast().is_none());

    model.show_toast(ToastLevel::Warning, "careful");
    assert_eq!(model.next_wakeup_ms(), Some(7_500));
}

#[test]
fn test_quit_requires_confirmation_when_dirty() {
    let mut model = create_test_model("text");
    model = update(model, Message::EditorInsertChar('!'));
    model = update(model, Message::Quit);
    assert!(!model.should_quit);
    assert!(model.quit_confirmed);
    assert_eq!(model.active_toast().map(|(_, level)| level), Some(ToastLevel::Warning));

    model = update(model, Message::Quit);
    assert!(model.should_quit);
    assert!(!model.sync.is_enabled());
}

#[test]
fn test_other_action_cancels_quit_confirmation() {
    let mut model = create_test_model("text");
    model = update(model, Message::EditorInsertChar('!'));
    model = update(model, Message::Quit);
    model = update(model, Message::ScrollFocused(1));
    assert!(!model.quit_confirmed);
    model = update(model, Message::Quit);
    assert!(!model.should_quit);
}

#[test]
fn test_quit_when_clean_disposes_sync() {
    let mut model = create_long_test_model();
    model = update(model, Message::Scroll(Pane::Source, 10));
    model = update(model, Message::Quit);
    assert!(model.should_quit);
    assert_eq!(model.sync.next_deadline_ms(), None);
}

#[test]
fn test_save_writes_file_and_clears_dirty() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("doc.md");
    let app = App::new(path.clone());
    let mut model = app.initial_model(EditorBuffer::from_text("draft"), (80, 24));
    model = update(model, Message::EditorInsertChar('>'));
    model = update(model, Message::Save);
    app.handle_message_side_effects(&mut model, &mut RecordingClipboard::default(), &Message::Save);

    assert_eq!(std::fs::read_to_string(&path).unwrap(), ">draft");
    assert!(!model.buffer.is_dirty());
    assert_eq!(model.active_toast(), Some(("Saved doc.md", ToastLevel::Info)));
}

#[test]
fn test_save_failure_shows_error_and_stays_dirty() {
    let dir = tempdir().unwrap();
    let blocker = dir.path().join("file");
    std::fs::write(&blocker, "x").unwrap();
    let app = App::new(blocker.join("doc.md"));
    let mut model = app.initial_model(EditorBuffer::from_text("draft"), (80, 24));
    model = update(model, Message::EditorInsertChar('>'));
    app.handle_message_side_effects(&mut model, &mut RecordingClipboard::default(), &Message::Save);

    assert!(model.buffer.is_dirty());
    let (message, level) = model.active_toast().unwrap();
    assert_eq!(level, ToastLevel::Error);
    assert!(message.starts_with("Save failed"));
}

#[test]
fn test_copy_puts_normalized_text_on_clipboard() {
    let app = App::new(PathBuf::from("test.md"));
    let mut model = create_test_model("\\[x\\]\n\n\n\nend\r\n");
    let mut clipboard = RecordingClipboard::default();
    app.handle_message_side_effects(&mut model, &mut clipboard, &Message::CopyConverted);

    assert_eq!(clipboard.copied, vec!["$$x$$\n\nend\n".to_string()]);
    assert_eq!(model.active_toast(), Some(("Copied!", ToastLevel::Info)));
}

#[test]
fn test_copy_failure_shows_error_toast() {
    let app = App::new(PathBuf::from("test.md"));
    let mut model = create_test_model("text");
    let mut clipboard = RecordingClipboard {
        fail: true,
        ..RecordingClipboard::default()
    };
    app.handle_message_side_effects(&mut model, &mut clipboard, &Message::CopyConverted);

    let (message, level) = model.active_toast().unwrap();
    assert_eq!(level, ToastLevel::Error);
    assert!(message.contains("clipboard unavailable"));
}

#[test]
fn test_export_writes_printable_document() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("print").join("doc.print.html");
    let app = App::new(dir.path().join("doc.md"))
        .with_export_path(Some(out.clone()))
        .with_open_export(false);
    let mut model = app.initial_model(EditorBuffer::from_text("# Title\n\n$$x^2$$"), (80, 24));
    app.handle_message_side_effects(&mut model, &mut RecordingClipboard::default(), &Message::Export);

    let html = std::fs::read_to_string(&out).unwrap();
    assert!(html.contains(&model.rendered.html));
    assert!(html.contains("<title>doc</title>"));
    let (message, level) = model.active_toast().unwrap();
    assert_eq!(level, ToastLevel::Info);
    assert!(message.starts_with("Exported"));
    assert_eq!(model.next_wakeup_ms(), Some(5_000));
}

#[test]
fn test_initial_model_applies_app_settings() {
    let app = App::new(PathBuf::from("missing-file.md"))
        .with_sync(false)
        .with_sync_delay(std::time::Duration::from_millis(40));
    let model = app.initial_model(EditorBuffer::default(), (80, 24));
    assert!(!model.sync.is_enabled());
    assert_eq!(model.sync.delay_ms(), 40);
    assert_eq!(model.export_path, PathBuf::from("missing-file.print.html"));
    assert!(model.active_toast().is_some());
}

#[test]
fn test_command_keys_map_from_any_pane() {
    let app = App::new(PathBuf::from("test.md"));
    let mut model = create_test_model("text");
    for focus in [Pane::Source, Pane::Preview] {
        model.focus = focus;
        assert_eq!(app.handle_key(ctrl('s'), &model), Some(Message::Save));
        assert_eq!(app.handle_key(ctrl('y'), &model), Some(Message::CopyConverted));
        assert_eq!(app.handle_key(ctrl('p'), &model), Some(Message::Export));
        assert_eq!(app.handle_key(ctrl('l'), &model), Some(Message::ToggleSync));
        assert_eq!(app.handle_key(ctrl('q'), &model), Some(Message::Quit));
        assert_eq!(app.handle_key(key(KeyCode::Tab), &model), Some(Message::SwitchFocus));
        assert_eq!(app.handle_key(key(KeyCode::F(1)), &model), Some(Message::ToggleHelp));
    }
}

#[test]
fn test_source_keys_edit_and_preview_keys_scroll() {
    let app = App::new(PathBuf::from("test.md"));
    let mut model = create_test_model("text");
    assert_eq!(
        app.handle_key(key(KeyCode::Char('j')), &model),
        Some(Message::EditorInsertChar('j'))
    );
    assert_eq!(
        app.handle_key(key(KeyCode::Down), &model),
        Some(Message::EditorMoveCursor(Direction::Down))
    );

    model.focus = Pane::Preview;
    assert_eq!(
        app.handle_key(key(KeyCode::Char('j')), &model),
        Some(Message::ScrollFocused(1))
    );
    assert_eq!(app.handle_key(key(KeyCode::Char('G')), &model), Some(Message::GoToBottom));
    assert_eq!(
        app.handle_key(key(KeyCode::PageDown), &model),
        Some(Message::ScrollFocusedPages(1))
    );
}

#[test]
fn test_help_overlay_swallows_keys() {
    let app = App::new(PathBuf::from("test.md"));
    let mut model = create_test_model("text");
    model.help_visible = true;
    assert_eq!(app.handle_key(key(KeyCode::Char('a')), &model), None);
    assert_eq!(app.handle_key(key(KeyCode::Esc), &model), Some(Message::HideHelp));
}

#[test]
fn test_mouse_wheel_scrolls_pane_under_pointer() {
    let app = App::new(PathBuf::from("test.md"));
    let model = create_test_model("text");
    assert_eq!(
        app.handle_mouse(mouse(MouseEventKind::ScrollDown, 50, 5), &model),
        Some(Message::Scroll(Pane::Preview, 3))
    );
    assert_eq!(
        app.handle_mouse(mouse(MouseEventKind::ScrollUp, 5, 5), &model),
        Some(Message::Scroll(Pane::Source, -3))
    );
    assert_eq!(
        app.handle_mouse(mouse(MouseEventKind::ScrollUp, 5, 23), &model),
        None
    );
}

#[test]
fn test_mouse_motion_reports_pane_crossings_only() {
    let app = App::new(PathBuf::from("test.md"));
    let model = create_test_model("text");
    let moved = mouse(MouseEventKind::Moved, 50, 5);
    assert_eq!(
        app.handle_mouse(moved, &model),
        Some(Message::PointerEnter(Pane::Preview))
    );
    let model = update(model, Message::PointerEnter(Pane::Preview));
    assert_eq!(app.handle_mouse(moved, &model), None);
}

#[test]
fn test_click_in_source_maps_to_buffer_position() {
    let app = App::new(PathBuf::from("test.md"));
    let model = create_test_model("hello\nworld");
    let click = mouse(MouseEventKind::Down(MouseButton::Left), 4, 2);
    assert_eq!(
        app.handle_mouse(click, &model),
        Some(Message::EditorMoveTo(1, 3))
    );
}

#[test]
fn test_resize_events_are_debounced() {
    let app = App::new(PathBuf::from("test.md"));
    let model = create_test_model("text");
    let mut resize: Deferred<(u16, u16)> = Deferred::new();
    assert_eq!(app.handle_event(Event::Resize(100, 30), &model, 0, &mut resize), None);
    assert_eq!(app.handle_event(Event::Resize(120, 40), &model, 40, &mut resize), None);
    assert_eq!(resize.take_ready(139), None);
    assert_eq!(resize.take_ready(140), Some((120, 40)));
}

#[test]
fn test_paste_event_inserts_into_source() {
    let app = App::new(PathBuf::from("test.md"));
    let model = create_test_model("");
    let mut resize: Deferred<(u16, u16)> = Deferred::new();
    assert_eq!(
        app.handle_event(Event::Paste("$x$".to_string()), &model, 0, &mut resize),
        Some(Message::EditorInsertStr("$x$".to_string()))
    );
}
