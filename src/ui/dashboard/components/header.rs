//! Dashboard header component
//!
//! Renders the title and the connection status line

use super::super::state::{ConnectionStatus, DashboardState};
use super::super::utils::format_uptime;

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout};
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

/// Render header with title and connection indicator.
pub fn render_header(f: &mut Frame, area: ratatui::layout::Rect, state: &DashboardState) {
    let header_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Length(2)])
        .split(area);

    let title_text = format!("BOT TERMINAL v{}", env!("CARGO_PKG_VERSION"));
    let title = Paragraph::new(title_text)
        .alignment(Alignment::Center)
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_type(BorderType::Thick),
        );
    f.render_widget(title, header_chunks[0]);

    let status = state.connection();
    let status_color = match status {
        ConnectionStatus::Online => Color::LightGreen,
        ConnectionStatus::Offline => Color::LightRed,
    };

    let status_line = Line::from(vec![
        Span::styled(
            format!("● {}", status),
            Style::default()
                .fg(status_color)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("  |  ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!("Server: {}", state.server.host()),
            Style::default().fg(Color::LightBlue),
        ),
        Span::styled("  |  ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!("Uptime: {}", format_uptime(state.start_time.elapsed())),
            Style::default().fg(Color::Gray),
        ),
    ]);

    let status_bar = Paragraph::new(status_line)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
    f.render_widget(status_bar, header_chunks[1]);
}
