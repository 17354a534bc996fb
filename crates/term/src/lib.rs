//! Terminal "game renderer" module.
//!
//! This is a small, game-oriented rendering layer for terminal gameplay.
//! It avoids widget/layout libraries and instead renders snapshots into a
//! simple framebuffer that is diffed and flushed to the terminal.
//!
//! - [`fb`]: styled character framebuffer
//! - [`game_view`]: snapshots (one or two boards) plus overlays into a framebuffer
//! - [`renderer`]: crossterm output with frame diffing

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use tui_blockfall_core as core;
pub use tui_blockfall_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{GameView, Overlay, PlayerView, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
