//! Dashboard component modules
//!
//! Contains all individual rendering components

pub mod confirm;
pub mod footer;
pub mod header;
pub mod history;
pub mod logs;
pub mod position_panel;
pub mod stats;
