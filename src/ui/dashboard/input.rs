//! Keyboard handling
//!
//! Keys are translated into state changes and, where a command is involved,
//! into a [`KeyOutcome`] the app loop acts on. Nothing here touches the network.

use super::state::{DashboardState, InputKind, InputMode};
use crate::commands::Action;
use crate::consts::cli_consts::LOG_PAGE_SIZE;
use crate::events::Origin;
use crate::logging::LogLevel;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    Continue,
    Quit,
    Submit(Action),
    /// Reload statistics and trade history.
    Refresh,
}

impl DashboardState {
    pub fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyOutcome::Quit;
        }

        if self.pending_confirmation().is_some() {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => {
                    self.answer_confirmation(true);
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    self.answer_confirmation(false);
                }
                _ => {}
            }
            return KeyOutcome::Continue;
        }

        match &mut self.input_mode {
            InputMode::Editing { kind, buffer } => {
                let kind = *kind;
                match key.code {
                    KeyCode::Enter => {
                        let text = std::mem::take(buffer);
                        self.input_mode = InputMode::Normal;
                        self.submit_input(kind, text)
                    }
                    KeyCode::Esc => {
                        self.input_mode = InputMode::Normal;
                        KeyOutcome::Continue
                    }
                    KeyCode::Backspace => {
                        buffer.pop();
                        KeyOutcome::Continue
                    }
                    KeyCode::Char(c) => {
                        buffer.push(c);
                        KeyOutcome::Continue
                    }
                    _ => KeyOutcome::Continue,
                }
            }
            InputMode::Normal => self.handle_normal_key(key.code),
        }
    }

    fn handle_normal_key(&mut self, code: KeyCode) -> KeyOutcome {
        match code {
            KeyCode::Esc | KeyCode::Char('q') => KeyOutcome::Quit,
            KeyCode::Char('s') => KeyOutcome::Submit(Action::Start),
            KeyCode::Char('t') => KeyOutcome::Submit(Action::Stop),
            KeyCode::Char('l') => KeyOutcome::Submit(Action::Long),
            KeyCode::Char('h') => KeyOutcome::Submit(Action::Short),
            KeyCode::Char('x') => KeyOutcome::Submit(Action::EmergencyClose),
            KeyCode::Char('v') => self.start_editing(InputKind::Leverage),
            KeyCode::Char('a') => self.start_editing(InputKind::Quantity),
            KeyCode::Char(':') => self.start_editing(InputKind::Command),
            KeyCode::Char('r') => KeyOutcome::Refresh,
            KeyCode::PageUp => {
                self.logs.scroll_up(LOG_PAGE_SIZE);
                KeyOutcome::Continue
            }
            KeyCode::PageDown => {
                self.logs.scroll_down(LOG_PAGE_SIZE);
                KeyOutcome::Continue
            }
            _ => KeyOutcome::Continue,
        }
    }

    fn start_editing(&mut self, kind: InputKind) -> KeyOutcome {
        self.input_mode = InputMode::Editing {
            kind,
            buffer: String::new(),
        };
        KeyOutcome::Continue
    }

    fn submit_input(&mut self, kind: InputKind, text: String) -> KeyOutcome {
        match kind {
            InputKind::Leverage => KeyOutcome::Submit(Action::SetLeverage(text)),
            InputKind::Quantity => KeyOutcome::Submit(Action::SetQuantity(text)),
            InputKind::Command if text.trim().is_empty() => KeyOutcome::Continue,
            InputKind::Command => match text.parse::<Action>() {
                Ok(action) => KeyOutcome::Submit(action),
                Err(e) => {
                    self.append_log(Origin::Command, LogLevel::Warn, e.to_string());
                    KeyOutcome::Continue
                }
            },
        }
    }
}
