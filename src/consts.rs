pub mod cli_consts {
    //! Terminal Configuration Constants
    //!
    //! Constants shared by the dashboard, the command dispatcher and the push
    //! channel, grouped by functional area.

    // =============================================================================
    // QUEUE CONFIGURATION
    // =============================================================================

    /// Capacity of the event channel feeding the dashboard.
    /// Producers (socket, command tasks, logger) await when it is full.
    pub const EVENT_QUEUE_SIZE: usize = 256;

    // =============================================================================
    // COMMAND VALIDATION
    // =============================================================================

    /// Smallest trade amount, in USDT, the server accepts for `/set-quantity`.
    pub const MIN_QUANTITY_USD: f64 = 5.0;

    /// Strategy names the bot understands. Used only for the prompt hint;
    /// the server remains the authority.
    pub const KNOWN_STRATEGIES: [&str; 2] = ["KadirV2", "Scalper"];

    // =============================================================================
    // NETWORK CONFIGURATION
    // =============================================================================

    /// Control server used when nothing else is configured.
    pub const DEFAULT_SERVER_URL: &str = "http://localhost:8000";

    /// Path of the push channel, relative to the control server.
    pub const PUSH_CHANNEL_PATH: &str = "/ws";

    pub mod http {
        use std::time::Duration;

        /// Maximum time to establish a TCP/TLS connection to the control server.
        /// Requests themselves are not bounded once connected.
        pub const CONNECT_TIMEOUT_SECS: u64 = 10;

        pub const fn connect_timeout() -> Duration {
            Duration::from_secs(CONNECT_TIMEOUT_SECS)
        }
    }

    // =============================================================================
    // UI CONFIGURATION
    // =============================================================================

    /// Poll interval for terminal input, which also bounds the redraw rate.
    pub const UI_POLL_INTERVAL_MS: u64 = 100;

    /// Number of log lines moved by one PageUp/PageDown.
    pub const LOG_PAGE_SIZE: usize = 10;

    // =============================================================================
    // FILESYSTEM
    // =============================================================================

    /// Directory under `$HOME` holding the client configuration.
    pub const CONFIG_DIR: &str = ".bot-terminal";

    /// Configuration file name inside [`CONFIG_DIR`].
    pub const CONFIG_FILE: &str = "config.json";
}
