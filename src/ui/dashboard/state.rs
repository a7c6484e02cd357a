//! Dashboard state management
//!
//! [`DashboardState`] is the single owner of everything on screen. Workers
//! never touch it directly; they send events that the UI loop applies.

use super::log_panel::LogPanel;
use crate::control::types::{TradeRecord, TradeStats};
use crate::events::{ConfirmRequest, LogEntry, Origin};
use crate::logging::LogLevel;
use crate::position::PositionPanel;
use crate::server::ServerAddress;
use crate::ui::app::UIConfig;

use std::collections::VecDeque;
use std::time::Instant;

/// Push channel status shown in the header.
#[derive(Debug, Copy, Clone, PartialEq, Eq, strum::Display)]
pub enum ConnectionStatus {
    #[strum(serialize = "ONLINE")]
    Online,
    #[strum(serialize = "OFFLINE")]
    Offline,
}

/// Which value a prompt line is collecting.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum InputKind {
    Leverage,
    Quantity,
    /// Free-form command, e.g. `symbol manual BTCUSDT`.
    Command,
}

impl InputKind {
    pub fn label(&self) -> &'static str {
        match self {
            InputKind::Leverage => "Leverage (x)",
            InputKind::Quantity => "Trade amount (USDT)",
            InputKind::Command => "Command",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing { kind: InputKind, buffer: String },
}

#[derive(Debug)]
pub struct DashboardState {
    /// Control server this session talks to.
    pub server: ServerAddress,
    /// The start time of the application, used for computing uptime.
    pub start_time: Instant,
    /// Whether to enable background colors
    pub with_background_color: bool,

    pub logs: LogPanel,
    pub position: PositionPanel,
    pub stats: Option<TradeStats>,
    /// Closed trades, newest first. `None` until the first refresh.
    pub history: Option<Vec<TradeRecord>>,
    pub input_mode: InputMode,
    /// Animation tick counter
    pub tick: usize,

    connection: ConnectionStatus,
    /// Questions waiting for a y/n answer; the front one is on screen.
    confirmations: VecDeque<ConfirmRequest>,
}

impl DashboardState {
    pub fn new(server: ServerAddress, start_time: Instant, ui_config: UIConfig) -> Self {
        Self {
            server,
            start_time,
            with_background_color: ui_config.with_background_color,
            logs: LogPanel::default(),
            position: PositionPanel::default(),
            stats: None,
            history: None,
            input_mode: InputMode::Normal,
            tick: 0,
            connection: ConnectionStatus::Offline,
            confirmations: VecDeque::new(),
        }
    }

    pub fn connection(&self) -> ConnectionStatus {
        self.connection
    }

    pub(super) fn set_connection(&mut self, status: ConnectionStatus) {
        self.connection = status;
    }

    pub fn pending_confirmation(&self) -> Option<&ConfirmRequest> {
        self.confirmations.front()
    }

    pub(super) fn queue_confirmation(&mut self, request: ConfirmRequest) {
        self.confirmations.push_back(request);
    }

    /// Answer the question on screen. Returns false when none was pending.
    pub(super) fn answer_confirmation(&mut self, yes: bool) -> bool {
        match self.confirmations.pop_front() {
            Some(request) => {
                // The asking task may have been dropped already
                let _ = request.reply.send(yes);
                true
            }
            None => false,
        }
    }

    /// Local line for the activity log.
    pub fn append_log(&mut self, origin: Origin, level: LogLevel, message: impl Into<String>) {
        self.logs.append(LogEntry::with_level(origin, level, message));
    }
}
