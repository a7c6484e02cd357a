//! Control commands and their call-site validation.
//!
//! [`Action`] is raw user intent (a key press, a typed prompt, a CLI
//! subcommand). [`Action::validate`] turns it into a [`ControlCommand`], the
//! only thing the dispatcher will put on the wire.

use crate::consts::cli_consts::MIN_QUANTITY_USD;
use serde_json::{Value, json};
use std::str::FromStr;
use thiserror::Error;

/// Rejections produced before anything reaches the network.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Invalid leverage value.")]
    Leverage,

    #[error("Trade amount must be at least {min} USDT.", min = MIN_QUANTITY_USD)]
    Quantity,

    #[error("Unknown symbol mode '{0}', expected 'auto' or 'manual'.")]
    SymbolMode(String),

    #[error("Manual symbol mode needs a symbol, e.g. BTCUSDT.")]
    MissingSymbol,

    #[error("Risk mode must not be empty.")]
    RiskMode,

    #[error("Invalid ROI value.")]
    Roi,

    #[error("Strategy name must not be empty.")]
    Strategy,

    #[error("Unknown command '{0}'.")]
    Unrecognized(String),
}

/// Integer at the start of `input`, ignoring leading whitespace and anything
/// after the digits: `"3.5"` reads as 3, `"10x"` as 10.
fn leading_integer(input: &str) -> Option<i64> {
    let s = input.trim_start();
    let end = s
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || (i == 0 && (c == '+' || c == '-'))))
        .map_or(s.len(), |(i, _)| i);
    s[..end].parse().ok()
}

/// Longest decimal number at the start of `input`: `"5abc"` reads as 5,
/// `"2.5%"` as 2.5.
fn leading_number(input: &str) -> Option<f64> {
    let s = input.trim_start();
    let end = s
        .find(|c: char| !(c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E')))
        .unwrap_or(s.len());
    (1..=end).rev().find_map(|len| s[..len].parse::<f64>().ok())
}

/// Validated leverage: an integer greater than zero.
pub fn parse_leverage(input: &str) -> Result<u32, ValidationError> {
    leading_integer(input)
        .filter(|leverage| *leverage > 0)
        .and_then(|leverage| u32::try_from(leverage).ok())
        .ok_or(ValidationError::Leverage)
}

/// Validated trade amount in USDT: a finite number of at least 5.
pub fn parse_quantity(input: &str) -> Result<f64, ValidationError> {
    leading_number(input)
        .filter(|quantity| quantity.is_finite() && *quantity >= MIN_QUANTITY_USD)
        .ok_or(ValidationError::Quantity)
}

fn parse_roi(input: &str) -> Result<f64, ValidationError> {
    leading_number(input)
        .filter(|roi| roi.is_finite() && *roi > 0.0)
        .ok_or(ValidationError::Roi)
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum SymbolMode {
    /// Let the bot's screener pick the symbol.
    Auto,
    /// Trade a fixed symbol.
    Manual,
}

impl FromStr for SymbolMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(SymbolMode::Auto),
            "manual" => Ok(SymbolMode::Manual),
            other => Err(ValidationError::SymbolMode(other.to_string())),
        }
    }
}

/// A request the control server understands.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlCommand {
    Start,
    Stop,
    ManualLong,
    ManualShort,
    EmergencyClose,
    SetLeverage { leverage: u32 },
    SetQuantity { quantity_usd: f64 },
    UpdateSymbol { mode: SymbolMode, symbol: String },
    UpdateRisk { mode: String, roi: f64 },
    UpdateStrategy { strategy_name: String },
}

impl ControlCommand {
    pub fn endpoint(&self) -> &'static str {
        match self {
            ControlCommand::Start => "/start",
            ControlCommand::Stop => "/stop",
            ControlCommand::ManualLong => "/manual-trade/long",
            ControlCommand::ManualShort => "/manual-trade/short",
            ControlCommand::EmergencyClose => "/emergency-close",
            ControlCommand::SetLeverage { .. } => "/set-leverage",
            ControlCommand::SetQuantity { .. } => "/set-quantity",
            ControlCommand::UpdateSymbol { .. } => "/update-symbol",
            ControlCommand::UpdateRisk { .. } => "/update-risk",
            ControlCommand::UpdateStrategy { .. } => "/update-strategy",
        }
    }

    /// JSON body. Parameterless commands send `{}`.
    pub fn payload(&self) -> Value {
        match self {
            ControlCommand::SetLeverage { leverage } => json!({ "leverage": leverage }),
            ControlCommand::SetQuantity { quantity_usd } => {
                json!({ "quantity_usd": quantity_usd })
            }
            ControlCommand::UpdateSymbol { mode, symbol } => {
                json!({ "mode": mode.to_string(), "symbol": symbol })
            }
            ControlCommand::UpdateRisk { mode, roi } => json!({ "mode": mode, "roi": roi }),
            ControlCommand::UpdateStrategy { strategy_name } => {
                json!({ "strategy_name": strategy_name })
            }
            _ => json!({}),
        }
    }

    /// Log line recording the user's intent, written before the request goes out.
    pub fn intent(&self) -> String {
        match self {
            ControlCommand::Start => pressed("Start"),
            ControlCommand::Stop => pressed("Stop"),
            ControlCommand::ManualLong => pressed("Market LONG"),
            ControlCommand::ManualShort => pressed("Market SHORT"),
            ControlCommand::EmergencyClose => pressed("Close Position"),
            ControlCommand::SetLeverage { leverage } => {
                format!("Setting leverage to {}x...", leverage)
            }
            ControlCommand::SetQuantity { quantity_usd } => {
                format!("Setting trade amount to ~{} USDT...", quantity_usd)
            }
            ControlCommand::UpdateSymbol { mode, symbol } => match mode {
                SymbolMode::Auto => "Switching to automatic symbol selection...".to_string(),
                SymbolMode::Manual => format!("Switching symbol to {}...", symbol),
            },
            ControlCommand::UpdateRisk { mode, roi } => {
                format!("Setting risk mode to {} (ROI {}%)...", mode, roi)
            }
            ControlCommand::UpdateStrategy { strategy_name } => {
                format!("Switching strategy to {}...", strategy_name)
            }
        }
    }

    /// Commands that must be explicitly confirmed by the user.
    pub fn needs_confirmation(&self) -> bool {
        matches!(self, ControlCommand::EmergencyClose)
    }
}

fn pressed(button: &str) -> String {
    format!("'{}' pressed. Sending command to server...", button)
}

/// Question asked before an emergency close.
pub const EMERGENCY_CLOSE_PROMPT: &str =
    "The open position will be closed with a market order. Are you sure?";

/// Raw user intent, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Start,
    Stop,
    Long,
    Short,
    EmergencyClose,
    SetLeverage(String),
    SetQuantity(String),
    UpdateSymbol { mode: String, symbol: String },
    UpdateRisk { mode: String, roi: String },
    UpdateStrategy(String),
}

impl Action {
    pub fn validate(self) -> Result<ControlCommand, ValidationError> {
        Ok(match self {
            Action::Start => ControlCommand::Start,
            Action::Stop => ControlCommand::Stop,
            Action::Long => ControlCommand::ManualLong,
            Action::Short => ControlCommand::ManualShort,
            Action::EmergencyClose => ControlCommand::EmergencyClose,
            Action::SetLeverage(input) => ControlCommand::SetLeverage {
                leverage: parse_leverage(&input)?,
            },
            Action::SetQuantity(input) => ControlCommand::SetQuantity {
                quantity_usd: parse_quantity(&input)?,
            },
            Action::UpdateSymbol { mode, symbol } => {
                let mode: SymbolMode = mode.parse()?;
                let symbol = symbol.trim().to_uppercase();
                match mode {
                    SymbolMode::Manual if symbol.is_empty() => {
                        return Err(ValidationError::MissingSymbol);
                    }
                    SymbolMode::Manual => ControlCommand::UpdateSymbol { mode, symbol },
                    SymbolMode::Auto => ControlCommand::UpdateSymbol {
                        mode,
                        symbol: String::new(),
                    },
                }
            }
            Action::UpdateRisk { mode, roi } => {
                let mode = mode.trim().to_lowercase();
                if mode.is_empty() {
                    return Err(ValidationError::RiskMode);
                }
                ControlCommand::UpdateRisk {
                    mode,
                    roi: parse_roi(&roi)?,
                }
            }
            Action::UpdateStrategy(name) => {
                let strategy_name = name.trim().to_string();
                if strategy_name.is_empty() {
                    return Err(ValidationError::Strategy);
                }
                ControlCommand::UpdateStrategy { strategy_name }
            }
        })
    }
}

/// Prompt grammar, e.g. `leverage 3`, `symbol manual BTCUSDT`, `risk fixed 2.5`.
impl FromStr for Action {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let verb = words.next().unwrap_or_default().to_lowercase();
        let arg = |w: Option<&str>| w.unwrap_or_default().to_string();

        let action = match verb.as_str() {
            "start" => Action::Start,
            "stop" => Action::Stop,
            "long" => Action::Long,
            "short" => Action::Short,
            "close" | "emergency-close" => Action::EmergencyClose,
            "leverage" => Action::SetLeverage(arg(words.next())),
            "quantity" | "amount" => Action::SetQuantity(arg(words.next())),
            "symbol" => Action::UpdateSymbol {
                mode: arg(words.next()),
                symbol: arg(words.next()),
            },
            "risk" => Action::UpdateRisk {
                mode: arg(words.next()),
                roi: arg(words.next()),
            },
            "strategy" => Action::UpdateStrategy(arg(words.next())),
            _ => return Err(ValidationError::Unrecognized(s.trim().to_string())),
        };
        Ok(action)
    }
}
