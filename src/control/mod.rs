use crate::control::error::ControlError;
use crate::control::types::{CommandReply, TradeRecord, TradeStats};
use crate::server::ServerAddress;
use serde_json::Value;

pub(crate) mod client;
pub use client::{ControlClient, Credentials};
pub mod error;
pub mod types;

#[cfg(test)]
use mockall::automock;

#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait ControlApi: Send + Sync {
    fn server(&self) -> &ServerAddress;

    /// POST a command with a JSON body to one of the control endpoints.
    async fn post_command(
        &self,
        endpoint: &str,
        payload: Value,
    ) -> Result<CommandReply, ControlError>;

    /// Aggregated performance of closed trades.
    async fn get_stats(&self) -> Result<TradeStats, ControlError>;

    /// Closed trades, newest first.
    async fn get_history(&self) -> Result<Vec<TradeRecord>, ControlError>;
}
