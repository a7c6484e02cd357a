//! Diagnostic logging
//!
//! The crate logs through the `log` facade. [`PanelLogger`] is the backend: it
//! routes records into the dashboard's activity log while the TUI owns the
//! terminal, or to stderr in headless and one-shot modes.

use crate::events::{Event, LogEntry, Origin};
use log::{LevelFilter, Metadata, Record};
use std::env;
use tokio::sync::mpsc;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => LevelFilter::Trace,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Error => LevelFilter::Error,
        }
    }
}

impl From<log::Level> for LogLevel {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Trace => LogLevel::Trace,
            log::Level::Debug => LogLevel::Debug,
            log::Level::Info => LogLevel::Info,
            log::Level::Warn => LogLevel::Warn,
            log::Level::Error => LogLevel::Error,
        }
    }
}

pub fn get_rust_log_level() -> LogLevel {
    let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    parse_rust_log_level(&rust_log)
}

pub fn parse_rust_log_level(rust_log: &str) -> LogLevel {
    // Handle common RUST_LOG formats
    let level_str = rust_log
        .split(',')
        .next()
        .unwrap_or(rust_log)
        .split('=')
        .next_back()
        .unwrap_or(rust_log)
        .to_lowercase();

    match level_str.as_str() {
        "trace" => LogLevel::Trace,
        "debug" => LogLevel::Debug,
        "info" => LogLevel::Info,
        "warn" | "warning" => LogLevel::Warn,
        "error" => LogLevel::Error,
        _ => LogLevel::Info, // Default to info if parsing fails
    }
}

pub fn should_log(event_level: LogLevel, threshold: LogLevel) -> bool {
    event_level >= threshold
}

/// Where accepted records end up.
#[derive(Debug, Clone)]
pub enum LogSink {
    /// Activity log of the running dashboard.
    Dashboard(mpsc::Sender<Event>),
    /// Plain stderr lines.
    Console,
}

/// `log` backend feeding the dashboard or the console.
#[derive(Debug)]
pub struct PanelLogger {
    threshold: LogLevel,
    sink: LogSink,
}

impl PanelLogger {
    pub fn new(threshold: LogLevel, sink: LogSink) -> Self {
        Self { threshold, sink }
    }

    /// Logger honouring `RUST_LOG`.
    pub fn from_env(sink: LogSink) -> Self {
        Self::new(get_rust_log_level(), sink)
    }

    /// Install as the global logger. Only the first call in a process succeeds.
    pub fn install(self) -> Result<(), log::SetLoggerError> {
        let max_level: LevelFilter = self.threshold.into();
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(max_level);
        Ok(())
    }

    /// Dependencies are only heard from when something goes wrong.
    fn accepts(&self, metadata: &Metadata) -> bool {
        let level = LogLevel::from(metadata.level());
        if !should_log(level, self.threshold) {
            return false;
        }
        metadata.target().starts_with(env!("CARGO_CRATE_NAME")) || level >= LogLevel::Warn
    }
}

impl log::Log for PanelLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.accepts(metadata)
    }

    fn log(&self, record: &Record) {
        if !self.accepts(record.metadata()) {
            return;
        }
        let entry = LogEntry::with_level(
            Origin::Client,
            LogLevel::from(record.level()),
            record.args().to_string(),
        );
        match &self.sink {
            // Never block inside a log call; a full queue drops the diagnostic.
            LogSink::Dashboard(sender) => {
                let _ = sender.try_send(Event::Log(entry));
            }
            LogSink::Console => eprintln!("{}", entry),
        }
    }

    fn flush(&self) {}
}
