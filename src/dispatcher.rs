//! Command Dispatcher
//!
//! Validates user actions, asks for confirmation where required, and sends
//! the resulting command to the control server. Every outcome ends up as a
//! line in the activity log; nothing here returns an error to the caller.

use crate::commands::{Action, EMERGENCY_CLOSE_PROMPT, ValidationError};
use crate::control::ControlApi;
use crate::events::{ConfirmRequest, Event, EventSender, Origin};
use crate::logging::LogLevel;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::oneshot;

#[cfg(test)]
use mockall::automock;

/// Asynchronous yes/no question.
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait Confirm: Send + Sync {
    async fn confirm(&self, prompt: &str) -> bool;
}

/// Asks through the dashboard: the question is shown as a modal and the
/// answer comes back over a oneshot channel.
#[derive(Debug, Clone)]
pub struct ChannelConfirmer {
    events: EventSender,
}

impl ChannelConfirmer {
    pub fn new(events: EventSender) -> Self {
        Self { events }
    }
}

#[async_trait::async_trait]
impl Confirm for ChannelConfirmer {
    async fn confirm(&self, prompt: &str) -> bool {
        let (reply, answer) = oneshot::channel();
        self.events
            .send_event(Event::Confirm(ConfirmRequest {
                prompt: prompt.to_string(),
                reply,
            }))
            .await;
        // A dashboard that went away without answering counts as "no".
        answer.await.unwrap_or(false)
    }
}

/// Asks on the terminal, for the non-interactive subcommands.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinConfirmer;

#[async_trait::async_trait]
impl Confirm for StdinConfirmer {
    async fn confirm(&self, prompt: &str) -> bool {
        let prompt = prompt.to_string();
        tokio::task::spawn_blocking(move || {
            use std::io::Write;
            print!("{} [y/N] ", prompt);
            let _ = std::io::stdout().flush();
            let mut line = String::new();
            match std::io::stdin().read_line(&mut line) {
                Ok(_) => matches!(line.trim().to_lowercase().as_str(), "y" | "yes"),
                Err(_) => false,
            }
        })
        .await
        .unwrap_or(false)
    }
}

/// Answers "yes" without asking (`--yes`).
#[derive(Debug, Default, Clone, Copy)]
pub struct AssumeYes;

#[async_trait::async_trait]
impl Confirm for AssumeYes {
    async fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

/// What happened to a submitted action.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    /// The request went out; its result is in the log.
    Dispatched,
    /// Validation failed; nothing was sent.
    Rejected(ValidationError),
    /// The user answered "no"; nothing was sent or logged.
    Declined,
}

#[derive(Clone)]
pub struct CommandDispatcher {
    api: Arc<dyn ControlApi>,
    confirmer: Arc<dyn Confirm>,
    events: EventSender,
}

impl CommandDispatcher {
    pub fn new(
        api: Arc<dyn ControlApi>,
        confirmer: Arc<dyn Confirm>,
        events: EventSender,
    ) -> Self {
        Self {
            api,
            confirmer,
            events,
        }
    }

    /// Validate, confirm, log the intent, then send.
    pub async fn submit(&self, action: Action) -> ActionOutcome {
        let command = match action.validate() {
            Ok(command) => command,
            Err(e) => {
                self.events
                    .send_log_with_level(Origin::Command, LogLevel::Warn, e.to_string())
                    .await;
                return ActionOutcome::Rejected(e);
            }
        };

        if command.needs_confirmation() && !self.confirmer.confirm(EMERGENCY_CLOSE_PROMPT).await {
            return ActionOutcome::Declined;
        }

        self.events.send_log(Origin::Command, command.intent()).await;
        self.send_command(command.endpoint(), command.payload()).await;
        ActionOutcome::Dispatched
    }

    /// One request, one optional log line. Failures are logged, never returned.
    pub async fn send_command(&self, endpoint: &str, payload: Value) {
        match self.api.post_command(endpoint, payload).await {
            Ok(reply) => {
                if let Some(message) = reply.message {
                    self.events
                        .send_log(Origin::Command, format!("Server response: {}", message))
                        .await;
                }
            }
            Err(e) => {
                log::debug!("POST {} failed: {:?}", endpoint, e);
                self.events
                    .send_log_with_level(
                        Origin::Command,
                        e.log_level(),
                        format!("API error: {}", e),
                    )
                    .await;
            }
        }
    }

    /// Reload everything the read-only panels show.
    pub async fn refresh(&self) {
        self.refresh_stats().await;
        self.refresh_history().await;
    }

    /// Fetch statistics and hand them to the dashboard.
    pub async fn refresh_stats(&self) {
        match self.api.get_stats().await {
            Ok(stats) => self.events.send_event(Event::Stats(stats)).await,
            Err(e) => {
                self.events
                    .send_log_with_level(
                        Origin::Command,
                        e.log_level(),
                        format!("Could not load statistics: {}", e),
                    )
                    .await
            }
        }
    }

    pub async fn refresh_history(&self) {
        match self.api.get_history().await {
            Ok(trades) => self.events.send_event(Event::History(trades)).await,
            Err(e) => {
                self.events
                    .send_log_with_level(
                        Origin::Command,
                        e.log_level(),
                        format!("Could not load trade history: {}", e),
                    )
                    .await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::ControlCommand;
    use crate::control::MockControlApi;
    use crate::control::error::ControlError;
    use crate::control::types::{CommandReply, TradeRecord, TradeStats};
    use crate::events::LogEntry;
    use serde_json::json;
    use tokio::sync::mpsc;

    fn dispatcher(
        api: MockControlApi,
        confirmer: impl Confirm + 'static,
    ) -> (CommandDispatcher, mpsc::Receiver<Event>) {
        let (tx, rx) = mpsc::channel(32);
        let dispatcher =
            CommandDispatcher::new(Arc::new(api), Arc::new(confirmer), EventSender::new(tx));
        (dispatcher, rx)
    }

    fn drain_logs(rx: &mut mpsc::Receiver<Event>) -> Vec<LogEntry> {
        let mut logs = Vec::new();
        while let Ok(event) = rx.try_recv() {
            if let Event::Log(entry) = event {
                logs.push(entry);
            }
        }
        logs
    }

    fn reply(message: Option<&str>) -> Result<CommandReply, ControlError> {
        Ok(CommandReply {
            message: message.map(str::to_string),
        })
    }

    #[tokio::test]
    async fn test_invalid_leverage_never_reaches_the_network() {
        for input in ["0", "-5", "abc"] {
            let mut api = MockControlApi::new();
            api.expect_post_command().never();
            let (dispatcher, mut rx) = dispatcher(api, AssumeYes);

            let outcome = dispatcher.submit(Action::SetLeverage(input.to_string())).await;

            assert_eq!(outcome, ActionOutcome::Rejected(ValidationError::Leverage));
            let logs = drain_logs(&mut rx);
            assert_eq!(logs.len(), 1);
            assert_eq!(logs[0].message, "Invalid leverage value.");
        }
    }

    #[tokio::test]
    async fn test_valid_leverage_posts_integer_payload() {
        let mut api = MockControlApi::new();
        api.expect_post_command()
            .withf(|endpoint, payload| {
                endpoint == "/set-leverage" && *payload == json!({"leverage": 3})
            })
            .times(1)
            .returning(|_, _| reply(Some("Leverage set to 3x.")));
        let (dispatcher, mut rx) = dispatcher(api, AssumeYes);

        let outcome = dispatcher.submit(Action::SetLeverage("3".to_string())).await;

        assert_eq!(outcome, ActionOutcome::Dispatched);
        let messages: Vec<String> = drain_logs(&mut rx).into_iter().map(|e| e.message).collect();
        assert_eq!(
            messages,
            ["Setting leverage to 3x...", "Server response: Leverage set to 3x."]
        );
    }

    #[tokio::test]
    async fn test_quantity_boundary() {
        let mut api = MockControlApi::new();
        api.expect_post_command().never();
        let (rejecting, _rx) = dispatcher(api, AssumeYes);
        assert_eq!(
            rejecting.submit(Action::SetQuantity("4.99".to_string())).await,
            ActionOutcome::Rejected(ValidationError::Quantity)
        );

        for (input, expected) in [("5", 5.0), ("5.01", 5.01)] {
            let mut api = MockControlApi::new();
            api.expect_post_command()
                .withf(move |endpoint, payload| {
                    endpoint == "/set-quantity" && *payload == json!({"quantity_usd": expected})
                })
                .times(1)
                .returning(|_, _| reply(None));
            let (accepting, _rx) = dispatcher(api, AssumeYes);
            assert_eq!(
                accepting.submit(Action::SetQuantity(input.to_string())).await,
                ActionOutcome::Dispatched
            );
        }
    }

    #[tokio::test]
    async fn test_declined_emergency_close_is_silent() {
        let mut api = MockControlApi::new();
        api.expect_post_command().never();
        let mut confirmer = MockConfirm::new();
        confirmer.expect_confirm().times(1).returning(|_| false);
        let (dispatcher, mut rx) = dispatcher(api, confirmer);

        let outcome = dispatcher.submit(Action::EmergencyClose).await;

        assert_eq!(outcome, ActionOutcome::Declined);
        assert!(drain_logs(&mut rx).is_empty());
    }

    #[tokio::test]
    async fn test_confirmed_emergency_close_is_sent() {
        let mut api = MockControlApi::new();
        api.expect_post_command()
            .withf(|endpoint, payload| endpoint == "/emergency-close" && *payload == json!({}))
            .times(1)
            .returning(|_, _| reply(Some("Position closed.")));
        let mut confirmer = MockConfirm::new();
        confirmer.expect_confirm().times(1).returning(|_| true);
        let (dispatcher, _rx) = dispatcher(api, confirmer);

        assert_eq!(
            dispatcher.submit(Action::EmergencyClose).await,
            ActionOutcome::Dispatched
        );
    }

    #[tokio::test]
    async fn test_parameterless_commands_log_intent_first() {
        let mut api = MockControlApi::new();
        api.expect_post_command()
            .withf(|endpoint, _| endpoint == "/start")
            .times(1)
            .returning(|_, _| reply(None));
        let (dispatcher, mut rx) = dispatcher(api, AssumeYes);

        dispatcher.submit(Action::Start).await;

        // No message field in the reply means no second line
        let logs = drain_logs(&mut rx);
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].message, ControlCommand::Start.intent());
    }

    #[tokio::test]
    async fn test_failures_are_logged_not_returned() {
        let mut api = MockControlApi::new();
        api.expect_post_command().times(1).returning(|_, _| {
            Err(ControlError::Http {
                status: 401,
                message: "Incorrect username or password".to_string(),
            })
        });
        let (dispatcher, mut rx) = dispatcher(api, AssumeYes);

        dispatcher.send_command("/stop", json!({})).await;

        let logs = drain_logs(&mut rx);
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].level, LogLevel::Error);
        assert_eq!(
            logs[0].message,
            "API error: HTTP error with status 401: Incorrect username or password"
        );
    }

    #[tokio::test]
    async fn test_refresh_stats_emits_stats_event() {
        let mut api = MockControlApi::new();
        api.expect_get_stats().times(1).returning(|| {
            Ok(TradeStats {
                total_pnl: 12.5,
                win_rate: 50.0,
                total_trades: 4,
                wins: 2,
                losses: 2,
            })
        });
        let (dispatcher, mut rx) = dispatcher(api, AssumeYes);

        dispatcher.refresh_stats().await;

        match rx.try_recv() {
            Ok(Event::Stats(stats)) => assert_eq!(stats.total_trades, 4),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_refresh_loads_stats_and_history() {
        let mut api = MockControlApi::new();
        api.expect_get_stats()
            .times(1)
            .returning(|| Ok(TradeStats::default()));
        api.expect_get_history().times(1).returning(|| {
            Ok(vec![TradeRecord {
                id: 7,
                symbol: "ETHUSDT".to_string(),
                trade_id: 1001,
                side: "SHORT".to_string(),
                pnl: -1.5,
                timestamp: 1_700_000_000_000,
            }])
        });
        let (dispatcher, mut rx) = dispatcher(api, AssumeYes);

        dispatcher.refresh().await;

        assert!(matches!(rx.try_recv(), Ok(Event::Stats(_))));
        match rx.try_recv() {
            Ok(Event::History(trades)) => assert_eq!(trades[0].symbol, "ETHUSDT"),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_history_failure_is_logged() {
        let mut api = MockControlApi::new();
        api.expect_get_history().times(1).returning(|| {
            Err(ControlError::Http {
                status: 500,
                message: "database is locked".to_string(),
            })
        });
        let (dispatcher, mut rx) = dispatcher(api, AssumeYes);

        dispatcher.refresh_history().await;

        let logs = drain_logs(&mut rx);
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].level, LogLevel::Warn);
        assert_eq!(
            logs[0].message,
            "Could not load trade history: HTTP error with status 500: database is locked"
        );
    }
}
