//! Key mapping from terminal events to player controls and menu keys.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// A gameplay control, before DAS/ARR processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    Left,
    Right,
    SoftDrop,
    HardDrop,
    RotateCw,
    RotateCcw,
    Hold,
}

/// Per-player key layout.
///
/// `Solo` is the single-player layout. In split screen the left player uses
/// letter keys and the right player uses the arrow cluster, so the two
/// layouts never share a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layout {
    Solo,
    LeftPlayer,
    RightPlayer,
}

fn lower(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}

impl Layout {
    /// Map a key to a control of this layout.
    pub fn map_control(self, code: KeyCode) -> Option<Control> {
        let code = lower(code);
        match self {
            Layout::Solo => match code {
                KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('h') => Some(Control::Left),
                KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('l') => Some(Control::Right),
                KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('j') => Some(Control::SoftDrop),
                KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('k') => Some(Control::RotateCw),
                KeyCode::Char('z') => Some(Control::RotateCcw),
                KeyCode::Char(' ') => Some(Control::HardDrop),
                KeyCode::Char('c') => Some(Control::Hold),
                _ => None,
            },
            Layout::LeftPlayer => match code {
                KeyCode::Char('a') => Some(Control::Left),
                KeyCode::Char('d') => Some(Control::Right),
                KeyCode::Char('s') => Some(Control::SoftDrop),
                KeyCode::Char('w') => Some(Control::RotateCw),
                KeyCode::Char('q') => Some(Control::RotateCcw),
                KeyCode::Char('e') => Some(Control::Hold),
                KeyCode::Char('f') => Some(Control::HardDrop),
                _ => None,
            },
            Layout::RightPlayer => match code {
                KeyCode::Left => Some(Control::Left),
                KeyCode::Right => Some(Control::Right),
                KeyCode::Down => Some(Control::SoftDrop),
                KeyCode::Up => Some(Control::RotateCw),
                KeyCode::Char('.') => Some(Control::RotateCcw),
                KeyCode::Char('/') => Some(Control::Hold),
                KeyCode::Enter => Some(Control::HardDrop),
                _ => None,
            },
        }
    }

    /// Short label shown in the side panel
    pub fn tag(self) -> &'static str {
        match self {
            Layout::Solo => "PLAYER",
            Layout::LeftPlayer => "P1",
            Layout::RightPlayer => "P2",
        }
    }

    /// Key help for the help screen.
    pub fn help_lines(self) -> &'static [&'static str] {
        match self {
            Layout::Solo => &[
                "Left/Right, A/D, H/L : Move",
                "Up, W, K  : Rotate clockwise",
                "Z         : Rotate counter-clockwise",
                "Down, S, J: Soft drop",
                "Space     : Hard drop",
                "C         : Hold",
            ],
            Layout::LeftPlayer => &[
                "P1  A/D: Move  S: Soft drop",
                "    W: Rotate  Q: Rotate back",
                "    F: Hard drop  E: Hold",
            ],
            Layout::RightPlayer => &[
                "P2  Left/Right: Move  Down: Soft drop",
                "    Up: Rotate  .: Rotate back",
                "    Enter: Hard drop  /: Hold",
            ],
        }
    }
}

/// Pause-menu navigation keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuKey {
    Up,
    Down,
    Confirm,
    Back,
}

pub fn map_menu_key(code: KeyCode) -> Option<MenuKey> {
    match lower(code) {
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('k') => Some(MenuKey::Up),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('j') => Some(MenuKey::Down),
        KeyCode::Enter | KeyCode::Char(' ') => Some(MenuKey::Confirm),
        KeyCode::Esc => Some(MenuKey::Back),
        _ => None,
    }
}

/// Esc or P toggles the pause menu.
pub fn is_pause_key(key: KeyEvent) -> bool {
    matches!(lower(key.code), KeyCode::Esc | KeyCode::Char('p'))
}

pub fn is_restart_key(key: KeyEvent) -> bool {
    lower(key.code) == KeyCode::Char('r') && !key.modifiers.contains(KeyModifiers::CONTROL)
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && lower(key.code) == KeyCode::Char('c')
}
