//! Wire types of the control server.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Reply to a command. Only `message` is ever shown to the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandReply {
    pub message: Option<String>,
}

impl CommandReply {
    /// Any JSON value is a valid reply. A `message` that is not a string is
    /// shown as its JSON text; null and empty messages are dropped.
    pub fn from_value(value: &Value) -> Self {
        let message = match value.get("message") {
            None | Some(Value::Null) => None,
            Some(Value::String(text)) => Some(text.clone()),
            Some(other) => Some(other.to_string()),
        }
        .filter(|m| !m.is_empty());
        Self { message }
    }
}

/// Aggregated results of closed trades.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TradeStats {
    pub total_pnl: f64,
    /// Percentage of winning trades.
    pub win_rate: f64,
    pub total_trades: u64,
    pub wins: u64,
    pub losses: u64,
}

/// Row layout of `/get-history`: `[id, symbol, trade_id, side, pnl, timestamp_ms]`.
type TradeRow = (i64, String, i64, String, f64, i64);

/// One closed trade.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "TradeRow")]
pub struct TradeRecord {
    pub id: i64,
    pub symbol: String,
    pub trade_id: i64,
    pub side: String,
    pub pnl: f64,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl From<TradeRow> for TradeRecord {
    fn from((id, symbol, trade_id, side, pnl, timestamp): TradeRow) -> Self {
        Self {
            id,
            symbol,
            trade_id,
            side,
            pnl,
            timestamp,
        }
    }
}

impl TradeRecord {
    /// Local time of the trade, `YYYY-MM-DD HH:MM:SS`.
    pub fn time_label(&self) -> String {
        DateTime::from_timestamp_millis(self.timestamp)
            .map(|utc| {
                utc.with_timezone(&Local)
                    .format("%Y-%m-%d %H:%M:%S")
                    .to_string()
            })
            .unwrap_or_else(|| self.timestamp.to_string())
    }

    /// `MM-DD HH:MM`, for narrow tables.
    pub fn compact_time_label(&self) -> String {
        DateTime::from_timestamp_millis(self.timestamp)
            .map(|utc| utc.with_timezone(&Local).format("%m-%d %H:%M").to_string())
            .unwrap_or_else(|| self.timestamp.to_string())
    }
}
