//! Dashboard utility functions
//!
//! Contains helper functions used across dashboard components

use crate::events::Origin;
use crate::logging::LogLevel;
use crate::position::Tone;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::prelude::{Color, Style};
use ratatui::text::{Line, Span};
use std::time::Duration;

/// Get a ratatui color for a log line based on who wrote it
pub fn get_origin_color(origin: Origin) -> Color {
    match origin {
        Origin::Server => Color::White,
        Origin::Command => Color::Cyan,
        Origin::Connection => Color::LightBlue,
        Origin::Client => Color::DarkGray,
    }
}

/// Warnings and errors override the origin color
pub fn get_level_color(level: LogLevel) -> Option<Color> {
    match level {
        LogLevel::Error => Some(Color::Red),
        LogLevel::Warn => Some(Color::Yellow),
        _ => None,
    }
}

pub fn get_tone_color(tone: Tone) -> Color {
    match tone {
        Tone::Success => Color::Green,
        Tone::Danger => Color::Red,
        Tone::Neutral => Color::Gray,
    }
}

pub fn format_uptime(uptime: Duration) -> String {
    let secs = uptime.as_secs();
    if secs >= 86400 {
        format!(
            "{}d {}h {}m",
            secs / 86400,
            (secs % 86400) / 3600,
            (secs % 3600) / 60
        )
    } else if secs >= 3600 {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    } else {
        format!("{}m {}s", secs / 60, secs % 60)
    }
}

/// Rectangle of the given size centered in `area`, clipped to it.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [rect] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(row);
    rect
}

/// Hard-wrap `prefix` followed by `text` into rows of at most `width`
/// characters, so the caller knows exactly how many rows an entry takes.
/// Control characters are drawn as spaces.
pub fn wrap_styled(
    prefix: &str,
    prefix_style: Style,
    text: &str,
    text_style: Style,
    width: usize,
) -> Vec<Line<'static>> {
    let width = width.max(1);
    let prefix_len = prefix.chars().count();
    let chars: Vec<char> = prefix
        .chars()
        .chain(text.chars())
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();

    chars
        .chunks(width)
        .enumerate()
        .map(|(row, chunk)| {
            let split = prefix_len.saturating_sub(row * width).min(chunk.len());
            let (head, tail) = chunk.split_at(split);
            let mut spans = Vec::with_capacity(2);
            if !head.is_empty() {
                spans.push(Span::styled(head.iter().collect::<String>(), prefix_style));
            }
            if !tail.is_empty() {
                spans.push(Span::styled(tail.iter().collect::<String>(), text_style));
            }
            Line::from(spans)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_text(line: &Line) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    #[test]
    fn test_wrap_styled_splits_rows_and_keeps_styles() {
        let dim = Style::default().fg(Color::DarkGray);
        let bright = Style::default().fg(Color::White);
        let rows = wrap_styled("[12:00:00] ", dim, "abcdefghij", bright, 8);

        let texts: Vec<String> = rows.iter().map(row_text).collect();
        assert_eq!(texts, ["[12:00:0", "0] abcde", "fghij"]);

        // The row where the prefix ends carries both styles
        assert_eq!(rows[1].spans.len(), 2);
        assert_eq!(rows[1].spans[0].content, "0] ");
        assert_eq!(rows[1].spans[0].style, dim);
        assert_eq!(rows[1].spans[1].style, bright);
        assert_eq!(rows[2].spans[0].style, bright);
    }

    #[test]
    fn test_wrap_styled_short_and_multiline_text() {
        let style = Style::default();
        let rows = wrap_styled("> ", style, "ok", style, 80);
        assert_eq!(rows.len(), 1);
        assert_eq!(row_text(&rows[0]), "> ok");

        let rows = wrap_styled("", style, "a\nb", style, 0);
        let texts: Vec<String> = rows.iter().map(row_text).collect();
        assert_eq!(texts, ["a", " ", "b"]);
    }

    #[test]
    fn test_format_uptime() {
        assert_eq!(format_uptime(Duration::from_secs(75)), "1m 15s");
        assert_eq!(format_uptime(Duration::from_secs(3725)), "1h 2m 5s");
        assert_eq!(format_uptime(Duration::from_secs(90061)), "1d 1h 1m");
    }

    #[test]
    fn test_centered_rect_fits_inside() {
        let area = Rect::new(0, 0, 100, 40);
        let rect = centered_rect(60, 7, area);
        assert_eq!((rect.width, rect.height), (60, 7));
        assert_eq!(rect.x, 20);

        let small = centered_rect(60, 7, Rect::new(0, 0, 30, 5));
        assert_eq!((small.width, small.height), (30, 5));
    }
}
