//! Terminal input module (engine-facing).
//!
//! This crate is independent of the simulation. It maps `crossterm` key
//! events onto per-player [`map::Control`]s and menu keys, and provides a
//! DAS/ARR input handler that turns held controls into discrete
//! [`crate::types::GameAction`]s (including on terminals without key-release
//! events).

pub mod handler;
pub mod map;

pub use tui_blockfall_types as types;

pub use handler::InputHandler;
pub use map::{is_pause_key, is_restart_key, map_menu_key, should_quit, Control, Layout, MenuKey};
