//! Push-message routing
//!
//! Frames arrive as `{"type": ..., "data": ...}`. They are decoded into a
//! tagged union; the dashboard decides what each variant does to the panels.

use crate::position::PositionSnapshot;
use serde::Deserialize;
use serde_json::Value;

/// Reserved message types with no rendering of their own.
#[derive(Debug, Copy, Clone, PartialEq, Eq, strum::Display)]
pub enum Reserved {
    #[strum(serialize = "history_update")]
    HistoryUpdate,
    #[strum(serialize = "stats_update")]
    StatsUpdate,
}

/// Outcome of decoding one text frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushMessage {
    /// `log`: a line for the activity log.
    Log(String),
    /// `position_update`: a full snapshot, or `None` when flat.
    PositionUpdate(Option<PositionSnapshot>),
    /// `history_update` / `stats_update`: acknowledged, nothing to render.
    Reserved(Reserved),
    /// Well-formed frame with a type this client does not know.
    Unknown(String),
    /// Frame that could not be decoded at all.
    Malformed(String),
}

#[derive(Deserialize)]
struct RawFrame {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: Value,
}

/// Decode a text frame. Never fails: problems are reported as `Malformed`.
pub fn route(text: &str) -> PushMessage {
    let frame: RawFrame = match serde_json::from_str(text) {
        Ok(frame) => frame,
        Err(e) => return PushMessage::Malformed(e.to_string()),
    };

    match frame.kind.as_str() {
        "log" => PushMessage::Log(match frame.data {
            Value::String(line) => line,
            other => other.to_string(),
        }),
        "position_update" => {
            match serde_json::from_value::<Option<PositionSnapshot>>(frame.data) {
                Ok(snapshot) => PushMessage::PositionUpdate(snapshot),
                Err(e) => PushMessage::Malformed(format!("position_update: {}", e)),
            }
        }
        "history_update" => PushMessage::Reserved(Reserved::HistoryUpdate),
        "stats_update" => PushMessage::Reserved(Reserved::StatsUpdate),
        _ => PushMessage::Unknown(frame.kind),
    }
}
