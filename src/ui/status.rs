use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::Model;
use crate::sync::SyncState;

fn sync_indicator(model: &Model) -> &'static str {
    if !model.sync.is_enabled() {
        return "sync off";
    }
    match model.sync.state() {
        SyncState::Pending { .. } => "sync ...",
        SyncState::Idle | SyncState::Tracking(_) => "sync on",
    }
}

pub fn render_status_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let dirty_indicator = if model.buffer.is_dirty() {
        " [modified]"
    } else {
        ""
    };
    let cursor = model.buffer.cursor();
    let status = format!(
        " {}{}  Ln {}, Col {}  md {}%  preview {}%  [{}]  F1:help",
        model.file_name(),
        dirty_indicator,
        cursor.line + 1,
        cursor.col + 1,
        model.source_view.scroll_percent(),
        model.preview_view.scroll_percent(),
        sync_indicator(model),
    );

    let status_bar =
        Paragraph::new(status).style(Style::default().bg(Color::DarkGray).fg(Color::White));

    frame.render_widget(status_bar, area);
}

pub fn render_toast_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let Some((message, level)) = model.active_toast() else {
        return;
    };
    let (prefix, style) = match level {
        crate::app::ToastLevel::Info => (
            "[info]",
            Style::default().bg(Color::DarkGray).fg(Color::White),
        ),
        crate::app::ToastLevel::Warning => (
            "[warn]",
            Style::default().bg(Color::Yellow).fg(Color::Black),
        ),
        crate::app::ToastLevel::Error => {
            ("[error]", Style::default().bg(Color::Red).fg(Color::White))
        }
    };
    let toast = Paragraph::new(format!("{prefix} {message}")).style(style);
    frame.render_widget(toast, area);
}
