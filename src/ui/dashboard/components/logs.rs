//! Dashboard logs panel component
//!
//! Renders the activity log, newest entry at the bottom

use super::super::state::DashboardState;
use super::super::utils::{get_level_color, get_origin_color, wrap_styled};
use ratatui::Frame;
use ratatui::prelude::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Borders, Padding, Paragraph};

/// Render the activity log panel.
pub fn render_logs_panel(f: &mut Frame, area: ratatui::layout::Rect, state: &DashboardState) {
    // Borders plus padding take 4 rows and 4 columns
    let max_rows = (area.height.saturating_sub(4) as usize).max(1);
    let width = area.width.saturating_sub(4) as usize;

    // Entries are wrapped here rather than by the widget, so the bottom row
    // is always the last row of the newest visible entry.
    let mut rows: Vec<Line> = state
        .logs
        .visible(max_rows)
        .iter()
        .flat_map(|entry| {
            let color = get_level_color(entry.level)
                .unwrap_or_else(|| get_origin_color(entry.origin));
            wrap_styled(
                &format!("[{}] ", entry.timestamp),
                Style::default().fg(Color::DarkGray),
                &entry.message,
                Style::default().fg(color),
                width,
            )
        })
        .collect();
    let overflow = rows.len().saturating_sub(max_rows);
    rows.drain(..overflow);

    let log_paragraph = if rows.is_empty() {
        Paragraph::new(vec![Line::from("Waiting for server messages...")])
    } else {
        Paragraph::new(rows)
    };

    let title = if state.logs.is_pinned() {
        "ACTIVITY LOG".to_string()
    } else {
        "ACTIVITY LOG (scrolled back, PgDn to follow)".to_string()
    };

    let logs_block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Cyan))
        .padding(Padding::uniform(1));

    f.render_widget(log_paragraph.block(logs_block), area);
}
