//! Dashboard statistics panel component

use super::super::state::DashboardState;
use super::super::utils::get_tone_color;
use crate::position::{Figure, Tone};

use ratatui::Frame;
use ratatui::prelude::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Padding, Paragraph};

pub fn render_stats_panel(f: &mut Frame, area: ratatui::layout::Rect, state: &DashboardState) {
    let lines = match &state.stats {
        None => vec![Line::from(Span::styled(
            "No statistics yet. Press [R] to refresh.",
            Style::default().fg(Color::DarkGray),
        ))],
        Some(stats) => {
            let pnl = format!("{:.2}", stats.total_pnl);
            let pnl_tone = Tone::classify(&Figure::new(pnl.as_str()));
            vec![
                Line::from(vec![
                    Span::styled("Total PNL: ", Style::default().fg(Color::Gray)),
                    Span::styled(
                        format!("{} USDT", pnl),
                        Style::default().fg(get_tone_color(pnl_tone)),
                    ),
                ]),
                Line::from(vec![
                    Span::styled("Win Rate: ", Style::default().fg(Color::Gray)),
                    Span::styled(
                        format!("{:.2}%", stats.win_rate),
                        Style::default().fg(Color::LightYellow),
                    ),
                ]),
                Line::from(vec![
                    Span::styled("Trades: ", Style::default().fg(Color::Gray)),
                    Span::styled(
                        format!("{} ", stats.total_trades),
                        Style::default().fg(Color::White),
                    ),
                    Span::styled(
                        format!("({}W", stats.wins),
                        Style::default().fg(Color::Green),
                    ),
                    Span::styled(" / ", Style::default().fg(Color::DarkGray)),
                    Span::styled(
                        format!("{}L)", stats.losses),
                        Style::default().fg(Color::Red),
                    ),
                ]),
            ]
        }
    };

    let block = Block::default()
        .title("STATISTICS")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Cyan))
        .padding(Padding::horizontal(1));

    f.render_widget(Paragraph::new(lines).block(block), area);
}
