//! Yes/no modal drawn over the dashboard

use super::super::utils::centered_rect;
use crate::events::ConfirmRequest;

use ratatui::Frame;
use ratatui::layout::Alignment;
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Padding, Paragraph, Wrap};

pub fn render_confirm_modal(f: &mut Frame, request: &ConfirmRequest) {
    let area = centered_rect(60, 8, f.area());

    let lines = vec![
        Line::from(request.prompt.as_str()),
        Line::from(""),
        Line::from(vec![
            Span::styled(
                "[Y] Yes",
                Style::default()
                    .fg(Color::LightRed)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("[N] No", Style::default().fg(Color::Gray)),
        ]),
    ];

    let block = Block::default()
        .title("CONFIRM")
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(Color::LightRed))
        .padding(Padding::horizontal(1));

    let modal = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(block);

    f.render_widget(Clear, area);
    f.render_widget(modal, area);
}
