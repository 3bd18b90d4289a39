use super::*;
use crate::app::{Model, Pane, ToastLevel};
use crate::editor::EditorBuffer;
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;
use std::path::PathBuf;

fn create_test_terminal() -> Terminal<TestBackend> {
    let backend = TestBackend::new(80, 24);
    Terminal::new(backend).unwrap()
}

fn create_test_model(md: &str) -> Model {
    Model::new(
        PathBuf::from("notes.md"),
        EditorBuffer::from_text(md),
        (80, 24),
    )
}

fn rendered_text(model: &Model) -> String {
    let mut terminal = create_test_terminal();
    terminal.draw(|frame| render(model, frame)).unwrap();
    terminal
        .backend()
        .buffer()
        .content()
        .iter()
        .map(|c| c.symbol())
        .collect()
}

fn row_text(model: &Model, row: u16) -> String {
    let mut terminal = create_test_terminal();
    terminal.draw(|frame| render(model, frame)).unwrap();
    let buffer = terminal.backend().buffer();
    (0..buffer.area.width)
        .map(|x| buffer[(x, row)].symbol())
        .collect()
}

fn right_half(row: &str) -> String {
    row.chars().skip(40).collect()
}

#[test]
fn test_pane_geometry_splits_terminal_in_half() {
    let size = (80, 24);
    assert_eq!(pane_rect(size, Pane::Source), Rect::new(0, 0, 40, 23));
    assert_eq!(pane_rect(size, Pane::Preview), Rect::new(40, 0, 40, 23));
    assert_eq!(pane_inner_rect(size, Pane::Source), Rect::new(1, 1, 38, 21));
    assert_eq!(pane_inner_rect(size, Pane::Preview), Rect::new(41, 1, 38, 21));
}

#[test]
fn test_pane_at_maps_cells_to_panes() {
    let size = (80, 24);
    assert_eq!(pane_at(size, 5, 5), Some(Pane::Source));
    assert_eq!(pane_at(size, 39, 0), Some(Pane::Source));
    assert_eq!(pane_at(size, 40, 10), Some(Pane::Preview));
    assert_eq!(pane_at(size, 5, 23), None);
}

#[test]
fn test_render_shows_both_panes() {
    let model = create_test_model("# Title\n\nHello **world**");
    let text = rendered_text(&model);
    assert!(text.contains("Markdown"));
    assert!(text.contains("Preview"));
    assert!(text.contains("Hello **world**"));
    assert!(text.contains("Hello world"));
}

#[test]
fn test_preview_shows_math_source_without_delimiters() {
    let model = create_test_model("Energy \\(E = mc^2\\) here");
    let preview = right_half(&row_text(&model, 1));
    assert!(preview.contains("Energy E = mc^2 here"), "got {preview:?}");
}

#[test]
fn test_status_bar_shows_file_and_sync_state() {
    let mut model = create_test_model("text");
    let status = row_text(&model, 23);
    assert!(status.contains("notes.md"));
    assert!(status.contains("[sync on]"));
    assert!(status.contains("F1:help"));

    model.sync.set_enabled(false);
    assert!(row_text(&model, 23).contains("[sync off]"));
}

#[test]
fn test_status_bar_marks_dirty_buffer() {
    let mut model = create_test_model("text");
    model.buffer.insert_char('x');
    let text = rendered_text(&model);
    assert!(text.contains("Markdown *"));
    assert!(text.contains("[modified]"));
}

#[test]
fn test_toast_replaces_status_line() {
    let mut model = create_test_model("text");
    model.show_toast(ToastLevel::Error, "Copy failed: denied");
    let status = row_text(&model, 23);
    assert!(status.contains("[error] Copy failed: denied"));
    assert!(!status.contains("F1:help"));
}

#[test]
fn test_help_overlay_lists_commands() {
    let mut model = create_test_model("text");
    model.help_visible = true;
    let text = rendered_text(&model);
    assert!(text.contains("Help"));
    assert!(text.contains("Copy converted markdown"));
    assert!(text.contains("Scroll sync (on)"));
}

#[test]
fn test_preview_follows_its_viewport() {
    let md = (1..=60)
        .map(|i| format!("Paragraph {i}"))
        .collect::<Vec<_>>()
        .join("\n\n");
    let mut model = create_test_model(&md);
    model.preview_view.set_offset(20);
    // 20 rows down the preview: paragraphs and blank lines alternate.
    assert!(right_half(&row_text(&model, 1)).contains("Paragraph 11"));
}

#[test]
fn test_empty_document_shows_preview_hint() {
    let model = create_test_model("");
    assert!(rendered_text(&model).contains("Nothing to preview"));
}

#[test]
fn test_empty_unfocused_source_shows_typing_hint() {
    let mut model = create_test_model("");
    assert!(!rendered_text(&model).contains("Type markdown here..."));
    model.focus = Pane::Preview;
    assert!(rendered_text(&model).contains("Type markdown here..."));
}
