use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::app::{Model, Pane};

use super::{overlays, status};

/// Rows below the panes (status or toast).
const FOOTER_ROWS: u16 = 1;

/// Area shared by the two panes.
fn panes_area(area: Rect) -> Rect {
    Rect {
        height: area.height.saturating_sub(FOOTER_ROWS),
        ..area
    }
}

pub fn split_panes(area: Rect) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(panes_area(area))
}

/// Outer rectangle (border included) of `pane` in a terminal of `size`.
pub fn pane_rect(size: (u16, u16), pane: Pane) -> Rect {
    let chunks = split_panes(Rect::new(0, 0, size.0, size.1));
    match pane {
        Pane::Source => chunks[0],
        Pane::Preview => chunks[1],
    }
}

/// Text area of `pane` inside its border.
pub fn pane_inner_rect(size: (u16, u16), pane: Pane) -> Rect {
    Block::default()
        .borders(Borders::ALL)
        .inner(pane_rect(size, pane))
}

/// The pane under a terminal cell, if any.
pub fn pane_at(size: (u16, u16), column: u16, row: u16) -> Option<Pane> {
    [Pane::Source, Pane::Preview]
        .into_iter()
        .find(|&pane| pane_rect(size, pane).contains(Position::new(column, row)))
}

/// Render the complete UI.
pub fn render(model: &Model, frame: &mut Frame) {
    let area = frame.area();
    let size = (area.width, area.height);

    render_source(model, frame, pane_rect(size, Pane::Source));
    render_preview(model, frame, pane_rect(size, Pane::Preview));

    let footer = Rect {
        y: area.y + area.height.saturating_sub(FOOTER_ROWS),
        height: FOOTER_ROWS.min(area.height),
        ..area
    };
    if model.active_toast().is_some() {
        status::render_toast_bar(model, frame, footer);
    } else {
        status::render_status_bar(model, frame, footer);
    }

    if model.help_visible {
        overlays::render_help_overlay(model, frame, area);
    }
}

fn pane_block(model: &Model, pane: Pane, title: String) -> Block<'static> {
    let border = if model.focus == pane {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border)
}

fn render_source(model: &Model, frame: &mut Frame, area: Rect) {
    let dirty = if model.buffer.is_dirty() { " *" } else { "" };
    let block = pane_block(model, Pane::Source, format!(" Markdown{dirty} "));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let buf = &model.buffer;
    if buf.is_empty() && model.focus != Pane::Source {
        let hint = Paragraph::new("Type markdown here...")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(hint, inner);
        return;
    }

    let cursor = buf.cursor();
    let range = model.source_view.visible_range();
    let mut lines: Vec<Line> = Vec::with_capacity(range.len());
    for line_idx in range.clone() {
        let text = buf.line_at(line_idx).unwrap_or_default();
        let text = text.trim_end_matches(['\n', '\r']);
        lines.push(Line::raw(text.to_string()));
    }
    frame.render_widget(Paragraph::new(lines), inner);

    if model.focus == Pane::Source && range.contains(&cursor.line) && !model.help_visible {
        let text = buf.line_at(cursor.line).unwrap_or_default();
        let before: String = text.chars().take(cursor.col).collect();
        let row = u16::try_from(cursor.line - range.start).unwrap_or(u16::MAX);
        let col = u16::try_from(before.width()).unwrap_or(u16::MAX);
        if col < inner.width {
            frame.set_cursor_position(Position::new(inner.x + col, inner.y + row));
        }
    }
}

fn render_preview(model: &Model, frame: &mut Frame, area: Rect) {
    let block = pane_block(model, Pane::Preview, " Preview ".to_string());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if model.preview_lines.is_empty() {
        let hint =
            Paragraph::new("Nothing to preview").style(Style::default().fg(Color::DarkGray));
        frame.render_widget(hint, inner);
        return;
    }

    let lines: Vec<Line> = model.preview_lines[model.preview_view.visible_range()]
        .iter()
        .map(|line| Line::raw(line.as_str()))
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}
