//! Dashboard trade history component

use super::super::state::DashboardState;
use super::super::utils::get_tone_color;
use crate::position::{Figure, Tone};

use ratatui::Frame;
use ratatui::layout::Constraint;
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Padding, Paragraph, Row, Table};

/// Render closed trades, newest first, as many as fit.
pub fn render_history_panel(f: &mut Frame, area: ratatui::layout::Rect, state: &DashboardState) {
    let block = Block::default()
        .title("TRADE HISTORY")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Cyan))
        .padding(Padding::horizontal(1));

    let trades = match &state.history {
        Some(trades) if !trades.is_empty() => trades,
        Some(_) => {
            let empty = Line::from(Span::styled(
                "No closed trades yet.",
                Style::default().fg(Color::DarkGray),
            ));
            f.render_widget(Paragraph::new(empty).block(block), area);
            return;
        }
        None => {
            let empty = Line::from(Span::styled(
                "No history yet. Press [R] to refresh.",
                Style::default().fg(Color::DarkGray),
            ));
            f.render_widget(Paragraph::new(empty).block(block), area);
            return;
        }
    };

    // Borders plus the header row
    let max_rows = area.height.saturating_sub(3) as usize;
    let dim = Style::default().fg(Color::DarkGray);
    let muted = Style::default().fg(Color::Gray);
    let plain = Style::default().fg(Color::White);

    let rows: Vec<Row> = trades
        .iter()
        .take(max_rows)
        .map(|trade| {
            let pnl = format!("{:.2}", trade.pnl);
            let tone = Tone::classify(&Figure::new(pnl.as_str()));
            let pnl_style = Style::default().fg(get_tone_color(tone));
            Row::new(vec![
                Cell::from(trade.compact_time_label()).style(dim),
                Cell::from(trade.symbol.clone()).style(plain),
                Cell::from(trade.side.clone()).style(muted),
                Cell::from(pnl).style(pnl_style),
            ])
        })
        .collect();

    let header = Row::new(vec!["Time", "Symbol", "Side", "PNL"]).style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    );

    let table = Table::new(
        rows,
        [
            Constraint::Length(11),
            Constraint::Fill(1),
            Constraint::Length(5),
            Constraint::Length(9),
        ],
    )
    .header(header)
    .block(block);

    f.render_widget(table, area);
}
