//! Event System
//!
//! Everything that changes the dashboard travels as an [`Event`] through a
//! single channel drained by the UI loop, which keeps the panels single-owner.

use crate::control::types::{TradeRecord, TradeStats};
use crate::logging::LogLevel;
use chrono::Local;
use std::fmt::Display;
use tokio::sync::{mpsc, oneshot};

/// Who produced a log line. Only affects colouring.
#[derive(Debug, Copy, Clone, Eq, PartialEq, strum::Display)]
pub enum Origin {
    /// Pushed by the bot over the socket.
    Server,
    /// Written by the command dispatcher.
    Command,
    /// Socket lifecycle.
    Connection,
    /// Local diagnostics and router notices.
    Client,
}

/// One line of the activity log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub origin: Origin,
    pub level: LogLevel,
    /// Local wall-clock time, `HH:MM:SS`.
    pub timestamp: String,
    pub message: String,
}

impl LogEntry {
    pub fn new(origin: Origin, message: impl Into<String>) -> Self {
        Self::with_level(origin, LogLevel::Info, message)
    }

    pub fn with_level(origin: Origin, level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            origin,
            level,
            timestamp: Local::now().format("%H:%M:%S").to_string(),
            message: message.into(),
        }
    }
}

impl Display for LogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.timestamp, self.message)
    }
}

/// Socket lifecycle notifications, in the order a browser would fire them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    Opened,
    /// Always followed by `Closed` when the connection is gone.
    Error(String),
    Closed,
}

/// A pending yes/no question for the user.
#[derive(Debug)]
pub struct ConfirmRequest {
    pub prompt: String,
    pub reply: oneshot::Sender<bool>,
}

#[derive(Debug)]
pub enum Event {
    Log(LogEntry),
    /// Raw text frame from the push channel, routed by the dashboard.
    Frame(String),
    Connection(ConnectionEvent),
    /// Fresh statistics from `GET /get-stats`.
    Stats(TradeStats),
    /// Closed trades from `GET /get-history`, newest first.
    History(Vec<TradeRecord>),
    Confirm(ConfirmRequest),
}

/// Cloneable handle used by every producer of dashboard events.
#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Send a generic event. A closed dashboard is not an error for producers.
    pub async fn send_event(&self, event: Event) {
        let _ = self.sender.send(event).await;
    }

    pub async fn send_log(&self, origin: Origin, message: impl Into<String>) {
        self.send_event(Event::Log(LogEntry::new(origin, message))).await;
    }

    pub async fn send_log_with_level(
        &self,
        origin: Origin,
        level: LogLevel,
        message: impl Into<String>,
    ) {
        self.send_event(Event::Log(LogEntry::with_level(origin, level, message))).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_display_prefixes_timestamp() {
        let entry = LogEntry::new(Origin::Server, "Strategy started.");
        let rendered = entry.to_string();
        assert!(rendered.starts_with('['));
        assert!(rendered.ends_with("] Strategy started."));
        // HH:MM:SS
        assert_eq!(entry.timestamp.len(), 8);
        assert_eq!(entry.timestamp.matches(':').count(), 2);
    }

    #[tokio::test]
    async fn test_sender_preserves_order() {
        let (tx, mut rx) = mpsc::channel(8);
        let sender = EventSender::new(tx);
        sender.send_log(Origin::Command, "first").await;
        sender.send_log(Origin::Command, "second").await;

        for expected in ["first", "second"] {
            match rx.recv().await {
                Some(Event::Log(entry)) => assert_eq!(entry.message, expected),
                other => panic!("unexpected event: {:?}", other),
            }
        }
    }
}
