mod cli_messages;
mod commands;
mod config;
mod consts;
mod control;
mod dispatcher;
mod events;
mod logging;
mod position;
mod router;
mod server;
mod session;
mod socket;
mod ui;

use crate::commands::Action;
use crate::config::{Config, get_config_path};
use crate::consts::cli_consts::{EVENT_QUEUE_SIZE, KNOWN_STRATEGIES};
use crate::control::{ControlApi, ControlClient, Credentials};
use crate::dispatcher::{ActionOutcome, AssumeYes, CommandDispatcher, Confirm, StdinConfirmer};
use crate::events::{Event, EventSender};
use crate::logging::{LogLevel, LogSink, PanelLogger};
use crate::server::ServerAddress;
use crate::session::{run_headless_mode, run_tui_mode, setup_session};
use clap::{Parser, Subcommand};
use std::error::Error;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::mpsc;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
/// Terminal dashboard for a trading bot's control server
struct Args {
    /// Command to execute
    #[command(subcommand)]
    command: Command,
}

/// Where the control server is and how to authenticate against it.
#[derive(clap::Args, Debug, Clone, Default)]
struct ServerArgs {
    /// Base URL of the control server, e.g. http://localhost:8000
    #[arg(long, env = "BOT_TERMINAL_SERVER_URL", value_name = "URL")]
    server_url: Option<String>,

    /// HTTP Basic username
    #[arg(long, env = "BOT_TERMINAL_USERNAME")]
    username: Option<String>,

    /// HTTP Basic password. Never saved to disk.
    #[arg(long, env = "BOT_TERMINAL_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Open the live dashboard
    Start {
        #[command(flatten)]
        server: ServerArgs,

        /// Print events to the console instead of drawing the dashboard
        #[arg(long)]
        headless: bool,

        /// Paint a dark background behind the dashboard
        #[arg(long)]
        with_background: bool,
    },
    /// Send a single command to the bot and print the outcome
    Send {
        #[command(flatten)]
        server: ServerArgs,

        #[command(subcommand)]
        command: SendCommand,
    },
    /// Show aggregated statistics of closed trades
    Stats {
        #[command(flatten)]
        server: ServerArgs,
    },
    /// Show closed trades, newest first
    History {
        #[command(flatten)]
        server: ServerArgs,

        /// Maximum number of trades to show
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// Save the server address (and username) for later runs
    Login {
        #[arg(long, value_name = "URL")]
        server_url: String,

        #[arg(long)]
        username: Option<String>,
    },
    /// Clear the saved configuration
    Logout,
}

#[derive(Subcommand, Debug)]
enum SendCommand {
    /// Start the trading strategy
    Start,
    /// Stop the trading strategy
    Stop,
    /// Open a market LONG position
    Long,
    /// Open a market SHORT position
    Short,
    /// Close the open position with a market order
    EmergencyClose {
        /// Do not ask for confirmation
        #[arg(long)]
        yes: bool,
    },
    /// Set the leverage, a whole number greater than zero
    SetLeverage {
        #[arg(allow_hyphen_values = true)]
        leverage: String,
    },
    /// Set the trade amount in USDT (at least 5)
    SetQuantity {
        #[arg(allow_hyphen_values = true)]
        quantity_usd: String,
    },
    /// Choose between automatic and manual symbol selection
    UpdateSymbol {
        /// auto or manual
        mode: String,
        /// Symbol to trade in manual mode, e.g. BTCUSDT
        symbol: Option<String>,
    },
    /// Set the risk mode and target ROI in percent
    UpdateRisk {
        mode: String,
        #[arg(allow_hyphen_values = true)]
        roi: String,
    },
    /// Switch the trading strategy
    UpdateStrategy {
        #[arg(help = format!("Strategy name, e.g. {}", KNOWN_STRATEGIES.join(" or ")))]
        strategy_name: String,
    },
}

impl SendCommand {
    /// The action to submit, and whether confirmation is pre-answered.
    fn into_action(self) -> (Action, bool) {
        match self {
            SendCommand::Start => (Action::Start, false),
            SendCommand::Stop => (Action::Stop, false),
            SendCommand::Long => (Action::Long, false),
            SendCommand::Short => (Action::Short, false),
            SendCommand::EmergencyClose { yes } => (Action::EmergencyClose, yes),
            SendCommand::SetLeverage { leverage } => (Action::SetLeverage(leverage), false),
            SendCommand::SetQuantity { quantity_usd } => {
                (Action::SetQuantity(quantity_usd), false)
            }
            SendCommand::UpdateSymbol { mode, symbol } => (
                Action::UpdateSymbol {
                    mode,
                    symbol: symbol.unwrap_or_default(),
                },
                false,
            ),
            SendCommand::UpdateRisk { mode, roi } => (Action::UpdateRisk { mode, roi }, false),
            SendCommand::UpdateStrategy { strategy_name } => {
                (Action::UpdateStrategy(strategy_name), false)
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config_path = get_config_path()?;
    let args = Args::parse();

    if !matches!(args.command, Command::Start { .. }) {
        PanelLogger::from_env(LogSink::Console).install()?;
    }

    match args.command {
        Command::Start {
            server,
            headless,
            with_background,
        } => {
            let (server, credentials) = resolve_server(&server, &config_path)?;
            let session = setup_session(server, credentials, headless).await?;
            if headless {
                run_headless_mode(session).await
            } else {
                run_tui_mode(session, with_background).await
            }
        }
        Command::Send { server, command } => {
            let (server, credentials) = resolve_server(&server, &config_path)?;
            let (action, yes) = command.into_action();
            send(ControlClient::new(server, credentials), action, yes).await
        }
        Command::Stats { server } => {
            let (server, credentials) = resolve_server(&server, &config_path)?;
            let client = ControlClient::new(server, credentials);
            let stats = client.get_stats().await?;
            print_cmd_info!("Server", "{}", client.server());
            print_cmd_info!("Total PNL", "{:.2} USDT", stats.total_pnl);
            print_cmd_info!("Win rate", "{:.2}%", stats.win_rate);
            print_cmd_info!(
                "Trades",
                "{} ({} won, {} lost)",
                stats.total_trades,
                stats.wins,
                stats.losses
            );
            Ok(())
        }
        Command::History { server, limit } => {
            let (server, credentials) = resolve_server(&server, &config_path)?;
            let trades = ControlClient::new(server, credentials).get_history().await?;
            if trades.is_empty() {
                print_cmd_info!("History", "No closed trades yet.");
            }
            for trade in trades.iter().take(limit) {
                println!(
                    "{}  {:<12} {:<5} {:>12.4} USDT",
                    trade.time_label(),
                    trade.symbol,
                    trade.side,
                    trade.pnl
                );
            }
            Ok(())
        }
        Command::Login {
            server_url,
            username,
        } => {
            let server: ServerAddress = server_url.parse()?;
            let config = Config::new(server.to_string(), username);
            config
                .save(&config_path)
                .map_err(|e| format!("Failed to save config: {}", e))?;
            print_cmd_success!("Configuration saved", "{}", config_path.display());
            Ok(())
        }
        Command::Logout => {
            println!("Logging out and clearing configuration file...");
            Config::clear(&config_path).map_err(Into::into)
        }
    }
}

/// Resolve the server address and credentials.
///
/// Flags and environment variables (merged by clap) win over the config
/// file, which wins over the built-in default.
fn resolve_server(
    args: &ServerArgs,
    config_path: &Path,
) -> Result<(ServerAddress, Option<Credentials>), Box<dyn Error>> {
    let config = if config_path.exists() {
        match Config::load_from_file(config_path) {
            Ok(config) => Some(config),
            Err(e) => {
                print_cmd_warn!("Ignoring configuration file", "{}", e);
                None
            }
        }
    } else {
        None
    };
    Ok(merge_server_settings(args, config.as_ref())?)
}

fn merge_server_settings(
    args: &ServerArgs,
    config: Option<&Config>,
) -> Result<(ServerAddress, Option<Credentials>), server::ServerUrlError> {
    let server = match args
        .server_url
        .as_deref()
        .or(config.map(|c| c.server_url.as_str()))
    {
        Some(url) => url.parse()?,
        None => ServerAddress::default(),
    };

    let username = args
        .username
        .clone()
        .or_else(|| config.and_then(|c| c.username.clone()));
    let credentials = username.map(|username| Credentials {
        username,
        password: args.password.clone(),
    });

    Ok((server, credentials))
}

/// Submit one action and print every log line it produced.
async fn send(client: ControlClient, action: Action, yes: bool) -> Result<(), Box<dyn Error>> {
    let (sender, mut receiver) = mpsc::channel::<Event>(EVENT_QUEUE_SIZE);
    let confirmer: Arc<dyn Confirm> = if yes {
        Arc::new(AssumeYes)
    } else {
        Arc::new(StdinConfirmer)
    };
    let dispatcher = CommandDispatcher::new(Arc::new(client), confirmer, EventSender::new(sender));

    let outcome = dispatcher.submit(action).await;
    // Closes the channel so the drain below ends
    drop(dispatcher);

    let mut failed = false;
    while let Some(event) = receiver.recv().await {
        if let Event::Log(entry) = event {
            failed |= entry.level >= LogLevel::Warn;
            cli_messages::print_log_entry(&entry);
        }
    }

    match outcome {
        ActionOutcome::Rejected(_) => Err(Box::from("Command was not sent.")),
        ActionOutcome::Declined => {
            print_cmd_info!("Cancelled", "Nothing was sent.");
            Ok(())
        }
        ActionOutcome::Dispatched if failed => Err(Box::from("Command failed.")),
        ActionOutcome::Dispatched => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(
        server_url: Option<&str>,
        username: Option<&str>,
        password: Option<&str>,
    ) -> ServerArgs {
        ServerArgs {
            server_url: server_url.map(str::to_string),
            username: username.map(str::to_string),
            password: password.map(str::to_string),
        }
    }

    #[test]
    fn test_defaults_without_flags_or_config() {
        let (server, credentials) = merge_server_settings(&ServerArgs::default(), None).unwrap();
        assert_eq!(server, ServerAddress::default());
        assert!(credentials.is_none());
    }

    #[test]
    fn test_flags_override_config() {
        let config = Config::new("http://10.0.0.2:8000".to_string(), Some("saved".to_string()));

        let (server, credentials) =
            merge_server_settings(&args(None, None, Some("pw")), Some(&config)).unwrap();
        assert_eq!(server.to_string(), "http://10.0.0.2:8000");
        let credentials = credentials.unwrap();
        assert_eq!(credentials.username, "saved");
        assert_eq!(credentials.password.as_deref(), Some("pw"));

        let (server, credentials) = merge_server_settings(
            &args(Some("https://bot.example.com"), Some("flag"), None),
            Some(&config),
        )
        .unwrap();
        assert_eq!(server.push_channel_url(), "wss://bot.example.com/ws");
        assert_eq!(credentials.unwrap().username, "flag");
    }

    #[test]
    fn test_invalid_server_url_is_an_error() {
        assert!(merge_server_settings(&args(Some("ftp://bot"), None, None), None).is_err());
    }

    #[test]
    fn test_send_subcommands_map_to_actions() {
        assert_eq!(
            SendCommand::EmergencyClose { yes: true }.into_action(),
            (Action::EmergencyClose, true)
        );
        assert_eq!(
            SendCommand::UpdateSymbol {
                mode: "auto".to_string(),
                symbol: None
            }
            .into_action()
            .0,
            Action::UpdateSymbol {
                mode: "auto".to_string(),
                symbol: String::new()
            }
        );
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
