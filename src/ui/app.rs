//! Main application state and UI loop
//!
//! Contains the App struct and main UI event handling logic

use crate::consts::cli_consts::UI_POLL_INTERVAL_MS;
use crate::dispatcher::CommandDispatcher;
use crate::events::Event as WorkerEvent;
use crate::server::ServerAddress;
use crate::ui::dashboard::{DashboardState, KeyOutcome, render_dashboard};
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::{Terminal, backend::Backend};
use std::time::{Duration, Instant};
use tokio::sync::{broadcast, mpsc};

/// UI configuration data grouped by concern
#[derive(Debug, Clone)]
pub struct UIConfig {
    pub with_background_color: bool,
}

impl UIConfig {
    pub fn new(with_background_color: bool) -> Self {
        Self {
            with_background_color,
        }
    }
}

/// Application state
pub struct App {
    /// Everything on screen.
    state: DashboardState,

    /// Receives events from the socket, command tasks and the logger.
    event_receiver: mpsc::Receiver<WorkerEvent>,

    /// Broadcasts shutdown signal to worker tasks.
    shutdown_sender: broadcast::Sender<()>,

    /// Sends commands; each submission runs as its own task.
    dispatcher: CommandDispatcher,
}

impl App {
    /// Creates a new instance of the application.
    pub fn new(
        server: ServerAddress,
        event_receiver: mpsc::Receiver<WorkerEvent>,
        shutdown_sender: broadcast::Sender<()>,
        dispatcher: CommandDispatcher,
        ui_config: UIConfig,
    ) -> Self {
        Self {
            state: DashboardState::new(server, Instant::now(), ui_config),
            event_receiver,
            shutdown_sender,
            dispatcher,
        }
    }

    /// Fire and forget: results come back as log events.
    fn spawn_outcome(&self, outcome: KeyOutcome) {
        match outcome {
            KeyOutcome::Submit(action) => {
                let dispatcher = self.dispatcher.clone();
                tokio::spawn(async move {
                    dispatcher.submit(action).await;
                });
            }
            KeyOutcome::Refresh => {
                let dispatcher = self.dispatcher.clone();
                tokio::spawn(async move {
                    dispatcher.refresh().await;
                });
            }
            KeyOutcome::Continue | KeyOutcome::Quit => {}
        }
    }
}

/// Runs the dashboard until the user quits.
pub async fn run<B: Backend>(terminal: &mut Terminal<B>, mut app: App) -> std::io::Result<()> {
    loop {
        // Apply everything that arrived since the last frame, in order
        while let Ok(event) = app.event_receiver.try_recv() {
            app.state.apply(event);
        }

        app.state.update();
        terminal.draw(|f| render_dashboard(f, &app.state))?;

        // Poll for key events
        if event::poll(Duration::from_millis(UI_POLL_INTERVAL_MS))? {
            if let Event::Key(key) = event::read()? {
                // Skip events that are not KeyEventKind::Press
                if key.kind == KeyEventKind::Release {
                    continue;
                }

                match app.state.handle_key(key) {
                    KeyOutcome::Quit => {
                        // Send shutdown signal to workers
                        let _ = app.shutdown_sender.send(());
                        return Ok(());
                    }
                    outcome => app.spawn_outcome(outcome),
                }
            }
        }
    }
}
