//! Dashboard footer component
//!
//! Renders key bindings, or the input line while a value is being typed

use super::super::state::{DashboardState, InputMode};
use ratatui::Frame;
use ratatui::layout::Alignment;
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

const KEY_HINTS: &str = concat!(
    "[S] Start  [T] Stop  [L] Long  [H] Short  [X] Close  ",
    "[V] Leverage  [A] Amount  [:] Command  [R] Refresh  [Q] Quit"
);

/// Render footer.
pub fn render_footer(f: &mut Frame, area: ratatui::layout::Rect, state: &DashboardState) {
    let (line, alignment) = match &state.input_mode {
        InputMode::Normal => (
            Line::from(Span::styled(
                KEY_HINTS,
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )),
            Alignment::Center,
        ),
        InputMode::Editing { kind, buffer } => {
            // Blinking block cursor, driven by the frame tick
            let cursor = if (state.tick / 5) % 2 == 0 { "█" } else { " " };
            (
                Line::from(vec![
                    Span::styled(
                        format!("{}: ", kind.label()),
                        Style::default()
                            .fg(Color::LightYellow)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(buffer.clone()),
                    Span::raw(cursor),
                    Span::styled(
                        "   [Enter] Send  [Esc] Cancel",
                        Style::default().fg(Color::DarkGray),
                    ),
                ]),
                Alignment::Left,
            )
        }
    };

    let footer = Paragraph::new(line).alignment(alignment).block(
        Block::default()
            .borders(Borders::TOP)
            .border_type(BorderType::Thick),
    );
    f.render_widget(footer, area);
}
