//! Activity log storage and scrolling

use crate::events::LogEntry;

/// Append-only list of log entries with a scroll position.
///
/// The view is pinned to the newest entry unless the user scrolls back;
/// any append pins it again.
#[derive(Debug, Default)]
pub struct LogPanel {
    entries: Vec<LogEntry>,
    /// Number of entries hidden below the view.
    scroll_back: usize,
}

impl LogPanel {
    pub fn append(&mut self, entry: LogEntry) {
        self.entries.push(entry);
        self.scroll_back = 0;
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_pinned(&self) -> bool {
        self.scroll_back == 0
    }

    pub fn scroll_up(&mut self, lines: usize) {
        let max = self.entries.len().saturating_sub(1);
        self.scroll_back = (self.scroll_back + lines).min(max);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll_back = self.scroll_back.saturating_sub(lines);
    }

    /// The last `height` entries above the scroll position, oldest first.
    pub fn visible(&self, height: usize) -> &[LogEntry] {
        let end = self.entries.len() - self.scroll_back;
        let start = end.saturating_sub(height);
        &self.entries[start..end]
    }
}
