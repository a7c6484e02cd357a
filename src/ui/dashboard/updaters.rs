//! Dashboard state update logic
//!
//! Contains all methods for updating dashboard state from events

use super::state::{ConnectionStatus, DashboardState};

use crate::events::{ConnectionEvent, Event, Origin};
use crate::logging::LogLevel;
use crate::router::{PushMessage, route};

impl DashboardState {
    /// Advance the animation tick. Called once per frame.
    pub fn update(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    /// Apply one event from a worker.
    pub fn apply(&mut self, event: Event) {
        match event {
            Event::Log(entry) => self.logs.append(entry),
            Event::Frame(text) => self.apply_frame(&text),
            Event::Connection(change) => self.apply_connection(change),
            Event::Stats(stats) => self.stats = Some(stats),
            Event::History(trades) => self.history = Some(trades),
            Event::Confirm(request) => self.queue_confirmation(request),
        }
    }

    fn apply_connection(&mut self, change: ConnectionEvent) {
        match change {
            ConnectionEvent::Opened => {
                self.set_connection(ConnectionStatus::Online);
                self.append_log(Origin::Connection, LogLevel::Info, "Connected to server.");
            }
            // The close that follows does the state change
            ConnectionEvent::Error(reason) => self.append_log(
                Origin::Connection,
                LogLevel::Error,
                format!("WebSocket error occurred: {}", reason),
            ),
            ConnectionEvent::Closed => {
                self.set_connection(ConnectionStatus::Offline);
                self.append_log(
                    Origin::Connection,
                    LogLevel::Warn,
                    "Connection to server lost. Restart the client to reconnect.",
                );
            }
        }
    }

    fn apply_frame(&mut self, text: &str) {
        match route(text) {
            PushMessage::Log(line) => self.append_log(Origin::Server, LogLevel::Info, line),
            PushMessage::PositionUpdate(snapshot) => self.position.render_position(snapshot),
            PushMessage::Reserved(kind) => log::trace!("Push message '{}' acknowledged", kind),
            PushMessage::Unknown(kind) => {
                log::debug!("Ignoring push message of unknown type '{}'", kind)
            }
            PushMessage::Malformed(reason) => self.append_log(
                Origin::Client,
                LogLevel::Warn,
                format!("Ignoring malformed push message: {}", reason),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::events::{ConfirmRequest, ConnectionEvent, Event, LogEntry, Origin};
    use crate::logging::LogLevel;
    use crate::position::{NO_POSITION_TEXT, PositionView, Tone};
    use crate::server::ServerAddress;
    use crate::ui::UIConfig;
    use crate::ui::dashboard::state::{ConnectionStatus, DashboardState};
    use std::time::Instant;
    use tokio::sync::oneshot;

    fn state() -> DashboardState {
        DashboardState::new(ServerAddress::default(), Instant::now(), UIConfig::new(false))
    }

    fn messages(state: &DashboardState) -> Vec<String> {
        state
            .logs
            .entries()
            .iter()
            .map(|e| e.message.clone())
            .collect()
    }

    #[test]
    fn test_connection_lifecycle_logs_once_per_transition() {
        let mut state = state();
        assert_eq!(state.connection(), ConnectionStatus::Offline);

        state.apply(Event::Connection(ConnectionEvent::Opened));
        assert_eq!(state.connection(), ConnectionStatus::Online);
        assert_eq!(messages(&state), ["Connected to server."]);

        state.apply(Event::Connection(ConnectionEvent::Closed));
        assert_eq!(state.connection(), ConnectionStatus::Offline);
        assert_eq!(state.logs.len(), 2);
        assert!(messages(&state)[1].contains("Restart the client"));
    }

    #[test]
    fn test_one_connect_and_one_disconnect_line_around_any_traffic() {
        let frames = [
            r#"{"type":"log","data":"Strategy started."}"#,
            r#"{"type":"log","data":{"nested":true}}"#,
            r#"{"type":"position_update","data":{"symbol":"BTCUSDT","quantity":"0.01"}}"#,
            r#"{"type":"position_update","data":null}"#,
            r#"{"type":"history_update","data":[]}"#,
            r#"{"type":"stats_update","data":{}}"#,
            r#"{"type":"unheard_of","data":1}"#,
            r#"{"data":"no type"}"#,
            "{broken",
            "",
        ];

        let mut state = state();
        state.apply(Event::Connection(ConnectionEvent::Opened));
        for _ in 0..3 {
            for frame in frames {
                state.apply(Event::Frame(frame.to_string()));
            }
        }
        assert_eq!(state.connection(), ConnectionStatus::Online);
        state.apply(Event::Connection(ConnectionEvent::Closed));

        let messages = messages(&state);
        let connected = messages
            .iter()
            .filter(|m| m.as_str() == "Connected to server.")
            .count();
        let lost = messages
            .iter()
            .filter(|m| m.contains("Connection to server lost"))
            .count();
        assert_eq!(connected, 1);
        assert_eq!(lost, 1);
        assert_eq!(
            messages.last().map(String::as_str),
            Some("Connection to server lost. Restart the client to reconnect.")
        );
        assert_eq!(state.connection(), ConnectionStatus::Offline);
    }

    #[test]
    fn test_socket_error_does_not_change_status() {
        let mut state = state();
        state.apply(Event::Connection(ConnectionEvent::Opened));
        state.apply(Event::Connection(ConnectionEvent::Error("reset by peer".into())));

        assert_eq!(state.connection(), ConnectionStatus::Online);
        assert_eq!(
            messages(&state)[1],
            "WebSocket error occurred: reset by peer"
        );
        assert_eq!(state.logs.entries()[1].level, LogLevel::Error);

        state.apply(Event::Connection(ConnectionEvent::Closed));
        assert_eq!(state.connection(), ConnectionStatus::Offline);
    }

    #[test]
    fn test_failed_connect_goes_error_then_offline() {
        let mut state = state();
        state.apply(Event::Connection(ConnectionEvent::Error("refused".into())));
        state.apply(Event::Connection(ConnectionEvent::Closed));
        assert_eq!(state.connection(), ConnectionStatus::Offline);
        assert_eq!(state.logs.len(), 2);
    }

    #[test]
    fn test_position_scenario_and_revert_to_empty() {
        let mut state = state();
        state.apply(Event::Frame(
            r#"{"type":"position_update","data":{"symbol":"BTCUSDT","quantity":"0.01","entry_price":"50000","pnl_usdt":"12.5","roi_percent":"2.1"}}"#
                .to_string(),
        ));
        match state.position.view() {
            PositionView::Open(fields) => {
                assert_eq!(fields[0].value, "BTCUSDT");
                let pnl = fields.iter().find(|f| f.label == "PNL (USDT)").unwrap();
                assert_eq!(pnl.tone, Some(Tone::Success));
            }
            PositionView::Empty => panic!("expected an open position"),
        }

        state.apply(Event::Frame(r#"{"type":"position_update","data":null}"#.to_string()));
        assert_eq!(state.position.view(), PositionView::Empty);
        assert_eq!(NO_POSITION_TEXT, "No open position.");
    }

    #[test]
    fn test_frames_feed_the_log_panel() {
        let mut state = state();
        state.apply(Event::Frame(r#"{"type":"log","data":"Strategy started."}"#.to_string()));
        state.apply(Event::Frame(r#"{"type":"stats_update","data":{}}"#.to_string()));
        state.apply(Event::Frame(r#"{"type":"unheard_of","data":1}"#.to_string()));
        assert_eq!(messages(&state), ["Strategy started."]);
        assert_eq!(state.logs.entries()[0].origin, Origin::Server);

        state.apply(Event::Frame("{broken".to_string()));
        assert_eq!(state.logs.len(), 2);
        assert!(messages(&state)[1].starts_with("Ignoring malformed push message"));
    }

    #[test]
    fn test_log_events_keep_arrival_order() {
        let mut state = state();
        for i in 0..5 {
            state.apply(Event::Log(LogEntry::new(Origin::Command, format!("{}", i))));
        }
        assert_eq!(messages(&state), ["0", "1", "2", "3", "4"]);
    }

    #[test]
    fn test_confirmations_queue_up() {
        let mut state = state();
        let (first_tx, mut first_rx) = oneshot::channel();
        let (second_tx, _second_rx) = oneshot::channel();
        state.apply(Event::Confirm(ConfirmRequest {
            prompt: "first?".into(),
            reply: first_tx,
        }));
        state.apply(Event::Confirm(ConfirmRequest {
            prompt: "second?".into(),
            reply: second_tx,
        }));

        assert_eq!(state.pending_confirmation().unwrap().prompt, "first?");
        assert!(state.answer_confirmation(false));
        assert_eq!(first_rx.try_recv(), Ok(false));
        assert_eq!(state.pending_confirmation().unwrap().prompt, "second?");
    }
}
