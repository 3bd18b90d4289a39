use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph};

use crate::app::Model;

pub fn render_help_overlay(model: &Model, frame: &mut Frame, area: Rect) {
    let global_cfg = model
        .config_global_path
        .as_ref()
        .map_or_else(|| "<unknown>".to_string(), |p| p.display().to_string());
    let local_cfg = model
        .config_local_path
        .as_ref()
        .map_or_else(|| "<none>".to_string(), |p| p.display().to_string());

    let section_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let dim_style = Style::default().fg(Color::Indexed(245));

    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::styled("Panes", section_style));
    lines.push(Line::raw("  Tab                 Switch pane"));
    lines.push(Line::raw("  Mouse wheel         Scroll pane under pointer"));
    lines.push(Line::raw("  PageUp/PageDown     Scroll focused pane"));
    lines.push(Line::raw("  Ctrl+Home/End       Top / bottom"));
    lines.push(Line::raw("  j/k g/G (preview)   Scroll / top / bottom"));
    lines.push(Line::raw(""));

    lines.push(Line::styled("Editor", section_style));
    lines.push(Line::raw("  Arrows, Home/End    Move cursor"));
    lines.push(Line::raw("  Click               Place cursor"));
    lines.push(Line::raw("  Esc                 Focus preview"));
    lines.push(Line::raw(""));

    lines.push(Line::styled("Commands", section_style));
    lines.push(Line::raw("  Ctrl-s              Save file"));
    lines.push(Line::raw("  Ctrl-y              Copy converted markdown"));
    lines.push(Line::raw("  Ctrl-p              Export for print / PDF"));
    lines.push(Line::raw(format!(
        "  Ctrl-l              Scroll sync ({})",
        if model.sync.is_enabled() { "on" } else { "off" }
    )));
    lines.push(Line::raw("  Ctrl-q / Ctrl-c     Quit"));
    lines.push(Line::raw("  F1                  Toggle help"));
    lines.push(Line::raw(""));

    lines.push(Line::styled("Config", section_style));
    lines.push(Line::raw(format!("  Global: {global_cfg}")));
    lines.push(Line::raw(format!("  Local override: {local_cfg}")));
    lines.push(Line::raw(format!(
        "  Export: {}",
        model.export_path.display()
    )));
    lines.push(Line::raw(""));
    lines.push(Line::styled("Esc closes", dim_style));

    // border(1) + padding(1) on each side
    let popup_width = area.width.saturating_sub(12).max(52);
    #[allow(clippy::cast_possible_truncation)]
    let popup_height = (lines.len() as u16).saturating_add(4);
    let popup = centered_popup_rect(popup_width, popup_height, area);

    let block = Block::default()
        .title("Help")
        .borders(Borders::ALL)
        .padding(Padding::uniform(1))
        .style(Style::default().bg(Color::Black).fg(Color::White));

    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

fn centered_popup_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w) / 2);
    let y = area.y + (area.height.saturating_sub(h) / 2);
    Rect::new(x, y, w, h)
}
