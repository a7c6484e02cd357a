//! Headless mode execution
//!
//! Same event handling as the dashboard, printed to the console instead of
//! drawn. Commands are sent with `bot-terminal send` from another shell.

use super::{
    SessionData,
    messages::{print_session_exit_success, print_session_shutdown, print_session_starting},
};
use crate::events::Event;
use crate::ui::UIConfig;
use crate::ui::dashboard::DashboardState;
use std::error::Error;
use std::time::Instant;

/// Most recent trades printed after a history refresh.
const HISTORY_PREVIEW: usize = 5;

/// Runs the application in headless mode
///
/// This function handles:
/// 1. Console event logging
/// 2. Ctrl+C shutdown handling
/// 3. Event loop management
///
/// # Arguments
/// * `session` - Session data from setup
///
/// # Returns
/// * `Ok(())` - Headless mode completed successfully
/// * `Err` - Headless mode failed
pub async fn run_headless_mode(mut session: SessionData) -> Result<(), Box<dyn Error>> {
    print_session_starting("headless", &session.server);

    // Trigger shutdown on Ctrl+C
    let shutdown_sender_clone = session.shutdown_sender.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = shutdown_sender_clone.send(());
        }
    });

    let mut shutdown_receiver = session.shutdown_sender.subscribe();
    let mut console = ConsoleView::new(DashboardState::new(
        session.server.clone(),
        Instant::now(),
        UIConfig::new(false),
    ));

    // Event loop: log events to console until shutdown
    loop {
        tokio::select! {
            Some(event) = session.event_receiver.recv() => {
                for line in console.apply(event) {
                    println!("{}", line);
                }
            }
            _ = shutdown_receiver.recv() => {
                break;
            }
        }
    }

    // Wait for workers to finish
    print_session_shutdown();
    for handle in session.join_handles {
        let _ = handle.await;
    }
    print_session_exit_success();

    Ok(())
}

/// Dashboard state plus what has already been printed.
struct ConsoleView {
    state: DashboardState,
    printed_logs: usize,
    last_position: String,
}

impl ConsoleView {
    fn new(state: DashboardState) -> Self {
        let last_position = state.position.view().summary();
        Self {
            state,
            printed_logs: 0,
            last_position,
        }
    }

    /// Apply an event and return the lines it produced.
    fn apply(&mut self, event: Event) -> Vec<String> {
        let mut lines = Vec::new();
        match event {
            // No one here to answer
            Event::Confirm(request) => {
                let _ = request.reply.send(false);
            }
            Event::Stats(stats) => {
                lines.push(format!(
                    "[stats] PNL {:.2} USDT | Win rate {:.2}% | {} trades ({}W / {}L)",
                    stats.total_pnl, stats.win_rate, stats.total_trades, stats.wins, stats.losses
                ));
                self.state.apply(Event::Stats(stats));
            }
            Event::History(trades) => {
                lines.push(format!("[history] {} closed trades", trades.len()));
                lines.extend(trades.iter().take(HISTORY_PREVIEW).map(|trade| {
                    format!(
                        "[history] {} {} {} {:.2} USDT",
                        trade.time_label(),
                        trade.symbol,
                        trade.side,
                        trade.pnl
                    )
                }));
                self.state.apply(Event::History(trades));
            }
            other => self.state.apply(other),
        }

        let entries = self.state.logs.entries();
        lines.extend(entries[self.printed_logs..].iter().map(|e| e.to_string()));
        self.printed_logs = entries.len();

        let position = self.state.position.view().summary();
        if position != self.last_position {
            lines.push(format!("[position] {}", position));
            self.last_position = position;
        }
        lines
    }

    #[cfg(test)]
    fn connection(&self) -> crate::ui::dashboard::state::ConnectionStatus {
        self.state.connection()
    }
}
