//! Session setup and initialization

use crate::consts::cli_consts::EVENT_QUEUE_SIZE;
use crate::control::{ControlClient, Credentials};
use crate::dispatcher::{ChannelConfirmer, CommandDispatcher};
use crate::events::{Event, EventSender};
use crate::logging::{LogSink, PanelLogger};
use crate::server::ServerAddress;
use crate::socket::PushChannel;
use std::error::Error;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

/// Session data for both TUI and headless modes
pub struct SessionData {
    /// Event receiver for socket, command and logger events
    pub event_receiver: mpsc::Receiver<Event>,
    /// Join handles for worker tasks
    pub join_handles: Vec<JoinHandle<()>>,
    /// Shutdown sender to stop all workers
    pub shutdown_sender: broadcast::Sender<()>,
    /// Control server for this session
    pub server: ServerAddress,
    /// Command dispatcher shared by all command tasks
    pub dispatcher: CommandDispatcher,
}

/// Sets up a dashboard session
///
/// This function handles all the common setup required for both TUI and headless modes:
/// 1. Creates the event channel and routes diagnostics into it
/// 2. Builds the control client and command dispatcher
/// 3. Opens the push channel
/// 4. Requests the initial statistics
///
/// # Arguments
/// * `server` - Control server to talk to
/// * `credentials` - Optional HTTP Basic credentials
/// * `headless` - Print diagnostics to the console instead of the log panel
///
/// # Returns
/// * `Ok(SessionData)` - Successfully set up session
/// * `Err` - Session setup failed
pub async fn setup_session(
    server: ServerAddress,
    credentials: Option<Credentials>,
    headless: bool,
) -> Result<SessionData, Box<dyn Error>> {
    let (event_sender, event_receiver) = mpsc::channel::<Event>(EVENT_QUEUE_SIZE);

    let sink = if headless {
        LogSink::Console
    } else {
        LogSink::Dashboard(event_sender.clone())
    };
    PanelLogger::from_env(sink).install()?;

    // Create shutdown channel - only one shutdown signal needed
    let (shutdown_sender, _) = broadcast::channel(1);

    let events = EventSender::new(event_sender.clone());
    let api = Arc::new(ControlClient::new(server.clone(), credentials));
    let confirmer = Arc::new(ChannelConfirmer::new(events.clone()));
    let dispatcher = CommandDispatcher::new(api, confirmer, events);

    log::debug!("Opening push channel at {}", server.push_channel_url());
    let push_channel = PushChannel::new(server.push_channel_url(), event_sender);
    let join_handles = vec![push_channel.spawn(shutdown_sender.subscribe())];

    let initial_refresh = dispatcher.clone();
    tokio::spawn(async move {
        initial_refresh.refresh().await;
    });

    Ok(SessionData {
        event_receiver,
        join_handles,
        shutdown_sender,
        server,
        dispatcher,
    })
}
