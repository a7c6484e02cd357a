//! Dashboard position panel component

use super::super::state::DashboardState;
use super::super::utils::get_tone_color;
use crate::position::{NO_POSITION_TEXT, PositionView};

use ratatui::Frame;
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Padding, Paragraph, Wrap};

pub fn render_position_panel(f: &mut Frame, area: ratatui::layout::Rect, state: &DashboardState) {
    let lines: Vec<Line> = match state.position.view() {
        PositionView::Empty => vec![Line::from(Span::styled(
            NO_POSITION_TEXT,
            Style::default().fg(Color::DarkGray),
        ))],
        PositionView::Open(fields) => fields
            .into_iter()
            .map(|field| {
                let value_style = match field.tone {
                    Some(tone) => Style::default()
                        .fg(get_tone_color(tone))
                        .add_modifier(Modifier::BOLD),
                    None => Style::default().fg(Color::White),
                };
                Line::from(vec![
                    Span::styled(
                        format!("{}: ", field.label),
                        Style::default().fg(Color::Gray),
                    ),
                    Span::styled(field.value, value_style),
                ])
            })
            .collect(),
    };

    let block = Block::default()
        .title("OPEN POSITION")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Cyan))
        .padding(Padding::uniform(1));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}
