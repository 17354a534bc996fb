//! TUI Blockfall (workspace facade crate).
//!
//! The simulation, input mapping and rendering live in dedicated crates under
//! `crates/` and are re-exported here as `tui_blockfall::{core, input, term, types}`.
//! This package adds the front-end pieces that tie them together: environment
//! configuration, the session (pause menu, countdown, split screen) and the
//! optional lock event log.

pub mod config;
pub mod event_log;
pub mod session;

pub use tui_blockfall_core as core;
pub use tui_blockfall_input as input;
pub use tui_blockfall_term as term;
pub use tui_blockfall_types as types;
