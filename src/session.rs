//! Session: one or two players plus the pause menu, help screen and
//! resume countdown.
//!
//! The session owns every `GameState` and routes key events to the player
//! whose layout maps them. Non-playing screens map onto core gates, so the
//! simulation freezes without the session touching any timers.

use std::time::Duration;

use arrayvec::ArrayVec;
use crossterm::event::{KeyEvent, KeyEventKind};

use crate::core::{GameSnapshot, GameState};
use crate::input::{
    is_pause_key, is_restart_key, map_menu_key, should_quit, Control, InputHandler, Layout,
    MenuKey,
};
use crate::term::{FrameBuffer, GameView, Overlay, PlayerView, Viewport};
use crate::types::{GameAction, Gate, LockEvent, COUNTDOWN_STEP, COUNTDOWN_STEPS};

pub const MAX_PLAYERS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    Playing,
    Paused,
    Help,
    Countdown,
}

impl Screen {
    fn gate(self) -> Option<Gate> {
        match self {
            Screen::Playing => None,
            Screen::Paused => Some(Gate::Paused),
            Screen::Help => Some(Gate::Help),
            Screen::Countdown => Some(Gate::Countdown),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuAction {
    Resume,
    Help,
    Quit,
}

impl MenuAction {
    pub const ALL: [MenuAction; 3] = [MenuAction::Resume, MenuAction::Help, MenuAction::Quit];

    pub const fn label(self) -> &'static str {
        match self {
            MenuAction::Resume => "Resume",
            MenuAction::Help => "Help",
            MenuAction::Quit => "Quit",
        }
    }
}

const MENU_LABELS: [&str; 3] = [
    MenuAction::Resume.label(),
    MenuAction::Help.label(),
    MenuAction::Quit.label(),
];

const COMMON_HELP: [&str; 3] = [
    "Esc/P     : Pause",
    "R         : Restart after game over",
    "Ctrl+C    : Quit",
];

/// Pause menu cursor. Navigation wraps at both ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PauseMenu {
    selected: usize,
}

impl PauseMenu {
    pub fn next(&mut self) {
        self.selected = (self.selected + 1) % MenuAction::ALL.len();
    }

    pub fn previous(&mut self) {
        self.selected = (self.selected + MenuAction::ALL.len() - 1) % MenuAction::ALL.len();
    }

    pub fn selected(&self) -> MenuAction {
        MenuAction::ALL[self.selected]
    }

    pub fn index(&self) -> usize {
        self.selected
    }
}

/// One board with its own input state.
pub struct Player {
    game: GameState,
    input: InputHandler,
    layout: Layout,
    snapshot: GameSnapshot,
}

impl Player {
    fn new(seed: u32, layout: Layout, das_ms: u32, arr_ms: u32) -> Self {
        Self {
            game: GameState::new(seed),
            input: InputHandler::with_config(das_ms, arr_ms),
            layout,
            snapshot: GameSnapshot::default(),
        }
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    pub fn input(&self) -> &InputHandler {
        &self.input
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Snapshot as of the last `render_into`
    pub fn snapshot(&self) -> &GameSnapshot {
        &self.snapshot
    }
}

/// A lock event tagged with the player index it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerEvent {
    pub player: usize,
    pub event: LockEvent,
}

pub struct Session {
    players: ArrayVec<Player, MAX_PLAYERS>,
    screen: Screen,
    menu: PauseMenu,
    countdown_elapsed: Duration,
    quit: bool,
    help: Vec<&'static str>,
    events: Vec<PlayerEvent>,
}

impl Session {
    /// Create a session with `player_count` boards (clamped to 1..=2).
    ///
    /// Every board uses the same seed, so all players see the same piece
    /// sequence.
    pub fn new(seed: u32, player_count: u8, das_ms: u32, arr_ms: u32) -> Self {
        let layouts: &[Layout] = if player_count >= 2 {
            &[Layout::LeftPlayer, Layout::RightPlayer]
        } else {
            &[Layout::Solo]
        };

        let mut players = ArrayVec::new();
        let mut help = Vec::new();
        for &layout in layouts {
            players.push(Player::new(seed, layout, das_ms, arr_ms));
            help.extend_from_slice(layout.help_lines());
        }
        help.extend_from_slice(&COMMON_HELP);

        Self {
            players,
            screen: Screen::Playing,
            menu: PauseMenu::default(),
            countdown_elapsed: Duration::ZERO,
            quit: false,
            help,
            events: Vec::new(),
        }
    }

    /// Spawn the first piece on every board.
    pub fn start(&mut self) {
        for player in &mut self.players {
            player.game.start();
        }
    }

    /// Tell the input handlers whether the terminal reports key releases.
    ///
    /// With real release events the auto-release timeout is turned off, so a
    /// key held through the OS repeat delay keeps its DAS state.
    pub fn set_key_release_events(&mut self, enabled: bool) {
        for player in &mut self.players {
            let input = InputHandler::with_config(player.input.das_delay(), player.input.arr_rate());
            player.input = if enabled {
                input.with_key_release_timeout_ms(u32::MAX)
            } else {
                input
            };
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn menu(&self) -> &PauseMenu {
        &self.menu
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn help_lines(&self) -> &[&'static str] {
        &self.help
    }

    /// Digit shown by the resume countdown (3, 2, 1).
    pub fn countdown_remaining(&self) -> u32 {
        let step = (self.countdown_elapsed.as_nanos() / COUNTDOWN_STEP.as_nanos()) as u32;
        COUNTDOWN_STEPS.saturating_sub(step).max(1)
    }

    /// Take every lock event collected since the last drain.
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, PlayerEvent> {
        self.events.drain(..)
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if should_quit(key) && key.kind != KeyEventKind::Release {
            self.quit = true;
            return;
        }

        match key.kind {
            KeyEventKind::Release => self.handle_release(key),
            KeyEventKind::Repeat => self.handle_repeat(key),
            KeyEventKind::Press => self.handle_press(key),
        }
        self.sync_gates();
    }

    fn handle_press(&mut self, key: KeyEvent) {
        match self.screen {
            Screen::Help => {
                if map_menu_key(key.code) == Some(MenuKey::Back) {
                    self.screen = Screen::Paused;
                }
            }
            Screen::Paused => {
                if is_pause_key(key) {
                    self.screen = Screen::Playing;
                    return;
                }
                match map_menu_key(key.code) {
                    Some(MenuKey::Up) => self.menu.previous(),
                    Some(MenuKey::Down) => self.menu.next(),
                    Some(MenuKey::Confirm) => self.confirm(self.menu.selected()),
                    Some(MenuKey::Back) | None => {}
                }
            }
            Screen::Countdown => {
                if is_pause_key(key) {
                    self.countdown_elapsed = Duration::ZERO;
                    self.screen = Screen::Paused;
                }
            }
            Screen::Playing => {
                if is_pause_key(key) {
                    self.pause();
                } else if is_restart_key(key) {
                    self.restart_finished();
                } else {
                    for (index, player) in self.players.iter_mut().enumerate() {
                        let Some(control) = player.layout.map_control(key.code) else {
                            continue;
                        };
                        if let Some(action) = player.input.press(control) {
                            apply(&mut self.events, index, &mut player.game, action);
                        }
                    }
                }
            }
        }
    }

    fn handle_release(&mut self, key: KeyEvent) {
        let playing = self.screen == Screen::Playing;
        for (index, player) in self.players.iter_mut().enumerate() {
            let Some(control) = player.layout.map_control(key.code) else {
                continue;
            };
            if let Some(action) = player.input.release(control) {
                if playing {
                    apply(&mut self.events, index, &mut player.game, action);
                }
            }
        }
    }

    // Terminal repeats only refresh held controls; DAS/ARR owns the repeat rate.
    fn handle_repeat(&mut self, key: KeyEvent) {
        if self.screen != Screen::Playing {
            return;
        }
        for (index, player) in self.players.iter_mut().enumerate() {
            let Some(control) = player.layout.map_control(key.code) else {
                continue;
            };
            if !matches!(control, Control::Left | Control::Right | Control::SoftDrop) {
                continue;
            }
            if let Some(action) = player.input.press(control) {
                apply(&mut self.events, index, &mut player.game, action);
            }
        }
    }

    fn confirm(&mut self, action: MenuAction) {
        match action {
            MenuAction::Resume => {
                self.countdown_elapsed = Duration::ZERO;
                self.screen = Screen::Countdown;
            }
            MenuAction::Help => self.screen = Screen::Help,
            MenuAction::Quit => self.quit = true,
        }
    }

    fn pause(&mut self) {
        for (index, player) in self.players.iter_mut().enumerate() {
            apply(
                &mut self.events,
                index,
                &mut player.game,
                GameAction::SoftDropStop,
            );
            player.input.reset();
        }
        self.menu = PauseMenu::default();
        self.screen = Screen::Paused;
    }

    fn restart_finished(&mut self) {
        for (index, player) in self.players.iter_mut().enumerate() {
            if player.game.is_game_over() {
                player.input.reset();
                apply(&mut self.events, index, &mut player.game, GameAction::Restart);
            }
        }
    }

    fn sync_gates(&mut self) {
        let active = self.screen.gate();
        for player in &mut self.players {
            for gate in [Gate::Paused, Gate::Help, Gate::Countdown] {
                player.game.set_gate(gate, Some(gate) == active);
            }
        }
    }

    /// Advance the countdown or the games by `dt`.
    pub fn update(&mut self, dt: Duration) {
        match self.screen {
            Screen::Countdown => {
                self.countdown_elapsed += dt;
                if self.countdown_elapsed >= COUNTDOWN_STEP * COUNTDOWN_STEPS {
                    self.countdown_elapsed = Duration::ZERO;
                    self.screen = Screen::Playing;
                    self.sync_gates();
                }
            }
            Screen::Playing => {
                let elapsed_ms = u32::try_from(dt.as_millis()).unwrap_or(u32::MAX);
                for (index, player) in self.players.iter_mut().enumerate() {
                    for action in player.input.update(elapsed_ms) {
                        apply(&mut self.events, index, &mut player.game, action);
                    }
                    player.game.tick(dt);
                    collect(&mut self.events, index, &mut player.game);
                }
            }
            Screen::Paused | Screen::Help => {}
        }
    }

    /// Refresh snapshots and draw every board with the current overlay.
    pub fn render_into(&mut self, view: &GameView, viewport: Viewport, fb: &mut FrameBuffer) {
        for player in &mut self.players {
            player.game.snapshot_into(&mut player.snapshot);
        }

        let views: ArrayVec<PlayerView<'_>, MAX_PLAYERS> = self
            .players
            .iter()
            .map(|p| PlayerView {
                tag: p.layout.tag(),
                snap: &p.snapshot,
            })
            .collect();

        let overlay = match self.screen {
            Screen::Playing => Overlay::None,
            Screen::Paused => Overlay::PauseMenu {
                options: &MENU_LABELS[..],
                selected: self.menu.index(),
            },
            Screen::Help => Overlay::Help { lines: &self.help },
            Screen::Countdown => Overlay::Countdown(self.countdown_remaining()),
        };

        view.render_into(&views, overlay, viewport, fb);
    }
}

fn apply(events: &mut Vec<PlayerEvent>, player: usize, game: &mut GameState, action: GameAction) {
    game.apply_action(action);
    collect(events, player, game);
}

fn collect(events: &mut Vec<PlayerEvent>, player: usize, game: &mut GameState) {
    if let Some(event) = game.take_last_event() {
        events.push(PlayerEvent { player, event });
    }
}
