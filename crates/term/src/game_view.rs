//! GameView: maps one or two `core::GameSnapshot`s into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.
//!
//! Only the visible playfield is drawn; the hidden buffer rows above it are
//! never shown, so pieces enter the frame from its top edge.

use crate::core::GameSnapshot;
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{GameOverKind, PieceKind, BOARD_WIDTH, BUFFER_HEIGHT, VISIBLE_HEIGHT};

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// One board to draw, with the label shown above its side panel.
#[derive(Debug, Clone, Copy)]
pub struct PlayerView<'a> {
    pub tag: &'a str,
    pub snap: &'a GameSnapshot,
}

/// Session-level overlay drawn across every board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay<'a> {
    None,
    PauseMenu { options: &'a [&'a str], selected: usize },
    Help { lines: &'a [&'a str] },
    Countdown(u32),
}

const PANEL_W: u16 = 12;
const PANEL_GAP: u16 = 2;
const PLAYER_GAP: u16 = 4;

const FIELD_BG: Rgb = Rgb::new(30, 30, 40);
const SCREEN_BG: Rgb = Rgb::new(0, 0, 0);

/// A lightweight terminal renderer for the game.
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 helps compensate for typical terminal glyph aspect ratio.
        Self {
            cell_w: 2,
            cell_h: 1,
        }
    }
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
        }
    }

    fn frame_size(&self) -> (u16, u16) {
        (
            (BOARD_WIDTH as u16) * self.cell_w + 2,
            (VISIBLE_HEIGHT as u16) * self.cell_h + 2,
        )
    }

    /// Columns one board with its side panel occupies
    pub fn player_width(&self) -> u16 {
        self.frame_size().0 + PANEL_GAP + PANEL_W
    }

    /// Render every board plus the overlay into an existing framebuffer.
    ///
    /// This is the allocation-free hot path. Callers can reuse a framebuffer
    /// across frames and only resize when the terminal size changes.
    pub fn render_into(
        &self,
        players: &[PlayerView<'_>],
        overlay: Overlay<'_>,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::new(Rgb::new(220, 220, 220), SCREEN_BG).into_cell(' '));

        let count = players.len() as u16;
        let (frame_w, frame_h) = self.frame_size();
        let total_w = count * self.player_width() + count.saturating_sub(1) * PLAYER_GAP;
        let start_x = viewport.width.saturating_sub(total_w) / 2;
        let start_y = viewport.height.saturating_sub(frame_h) / 2;

        for (i, player) in players.iter().enumerate() {
            let x = start_x + (i as u16) * (self.player_width() + PLAYER_GAP);
            self.draw_board(fb, player.snap, x, start_y);
            self.draw_side_panel(fb, player, viewport, x + frame_w + PANEL_GAP, start_y);
            if let Some(kind) = player.snap.game_over {
                self.draw_game_over(fb, player.snap, kind, x, start_y, frame_w, frame_h);
            }
        }

        let area_w = total_w.max(frame_w);
        self.draw_overlay(fb, overlay, start_x, start_y, area_w, frame_h);
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(
        &self,
        players: &[PlayerView<'_>],
        overlay: Overlay<'_>,
        viewport: Viewport,
    ) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(players, overlay, viewport, &mut fb);
        fb
    }

    fn draw_board(&self, fb: &mut FrameBuffer, snap: &GameSnapshot, start_x: u16, start_y: u16) {
        let (frame_w, frame_h) = self.frame_size();
        let border = CellStyle::new(Rgb::new(200, 200, 200), SCREEN_BG);

        fb.fill_rect(
            start_x + 1,
            start_y + 1,
            frame_w - 2,
            frame_h - 2,
            ' ',
            CellStyle::new(Rgb::new(80, 80, 90), FIELD_BG),
        );
        fb.draw_box(start_x, start_y, frame_w, frame_h, border);

        // Locked board cells.
        for (row, cells) in snap.visible_rows().iter().enumerate() {
            for (col, &id) in cells.iter().enumerate() {
                match PieceKind::from_color_id(id) {
                    Some(kind) => {
                        self.draw_piece_cell(fb, start_x, start_y, col as u16, row as u16, kind)
                    }
                    None => self.draw_empty_cell(fb, start_x, start_y, col as u16, row as u16),
                }
            }
        }

        // Ghost piece.
        if let Some(ghost) = snap.ghost {
            let ghost_style = CellStyle::new(Rgb::new(140, 140, 140), FIELD_BG).dim();
            for (x, y) in ghost {
                if let Some((cx, cy)) = visible_cell(x, y) {
                    self.fill_cell_rect(fb, start_x, start_y, cx, cy, '░', ghost_style);
                }
            }
        }

        // Active piece.
        if let Some(active) = snap.active {
            for (x, y) in active.cells() {
                if let Some((cx, cy)) = visible_cell(x, y) {
                    self.draw_piece_cell(fb, start_x, start_y, cx, cy, active.kind);
                }
            }
        }
    }

    fn draw_empty_cell(&self, fb: &mut FrameBuffer, start_x: u16, start_y: u16, x: u16, y: u16) {
        let style = CellStyle::new(Rgb::new(90, 90, 100), FIELD_BG).dim();
        self.fill_cell_rect(fb, start_x, start_y, x, y, '·', style);
    }

    fn draw_piece_cell(
        &self,
        fb: &mut FrameBuffer,
        start_x: u16,
        start_y: u16,
        x: u16,
        y: u16,
        kind: PieceKind,
    ) {
        let style = CellStyle::new(piece_color(kind), FIELD_BG).bold();
        self.fill_cell_rect(fb, start_x, start_y, x, y, '█', style);
    }

    #[allow(clippy::too_many_arguments)]
    fn fill_cell_rect(
        &self,
        fb: &mut FrameBuffer,
        start_x: u16,
        start_y: u16,
        cell_x: u16,
        cell_y: u16,
        ch: char,
        style: CellStyle,
    ) {
        let px = start_x + 1 + cell_x * self.cell_w;
        let py = start_y + 1 + cell_y * self.cell_h;
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ch, style);
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        player: &PlayerView<'_>,
        viewport: Viewport,
        panel_x: u16,
        start_y: u16,
    ) {
        if panel_x >= viewport.width {
            return;
        }
        let snap = player.snap;
        let label = CellStyle::default().bold();
        let value = CellStyle::new(Rgb::new(200, 200, 200), SCREEN_BG);

        let mut y = start_y;
        fb.put_str(panel_x, y, player.tag, label);
        y = y.saturating_add(2);

        for (name, amount) in [
            ("SCORE", snap.score),
            ("LEVEL", snap.level),
            ("LINES", snap.lines),
        ] {
            fb.put_str(panel_x, y, name, label);
            fb.put_u32(panel_x, y.saturating_add(1), amount, value);
            y = y.saturating_add(3);
        }

        fb.put_str(panel_x, y, "HOLD", label);
        y = y.saturating_add(1);
        match snap.hold {
            Some(kind) => {
                let style = if snap.can_hold { value } else { value.dim() };
                fb.put_str(panel_x, y, kind.as_str(), style);
            }
            None => fb.put_str(panel_x, y, "-", value),
        }
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "NEXT", label);
        y = y.saturating_add(1);
        for kind in snap.next_queue {
            if y >= viewport.height {
                break;
            }
            let style = CellStyle::new(piece_color(kind), SCREEN_BG);
            fb.put_str(panel_x, y, kind.as_str(), style);
            y = y.saturating_add(1);
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_game_over(
        &self,
        fb: &mut FrameBuffer,
        snap: &GameSnapshot,
        kind: GameOverKind,
        start_x: u16,
        start_y: u16,
        frame_w: u16,
        frame_h: u16,
    ) {
        let style = CellStyle::new(Rgb::new(255, 255, 255), SCREEN_BG).bold();
        let plain = CellStyle::new(Rgb::new(220, 220, 220), SCREEN_BG);
        let reason = match kind {
            GameOverKind::BlockOut => "BLOCK OUT",
            GameOverKind::LockOut => "LOCK OUT",
        };

        let mid_y = start_y.saturating_add(frame_h / 2);
        let x = start_x + 1;
        let w = frame_w.saturating_sub(2);
        fb.fill_rect(x, mid_y.saturating_sub(2), w, 5, ' ', plain);
        fb.put_str_centered(x, w, mid_y.saturating_sub(2), "GAME OVER", style);
        fb.put_str_centered(x, w, mid_y.saturating_sub(1), reason, plain);
        fb.put_str(x + 1, mid_y, "SCORE", plain);
        fb.put_u32(x + 8, mid_y, snap.score, plain);
        fb.put_str_centered(x, w, mid_y.saturating_add(2), "R to restart", plain);
    }

    fn draw_overlay(
        &self,
        fb: &mut FrameBuffer,
        overlay: Overlay<'_>,
        area_x: u16,
        area_y: u16,
        area_w: u16,
        area_h: u16,
    ) {
        let text = CellStyle::new(Rgb::new(220, 220, 220), SCREEN_BG);
        let title = text.bold();
        let selected = CellStyle::new(Rgb::new(240, 220, 80), SCREEN_BG).bold();

        let body_rows = match overlay {
            Overlay::None => return,
            Overlay::PauseMenu { options, .. } => options.len() as u16,
            Overlay::Help { lines } => lines.len() as u16 + 2,
            Overlay::Countdown(_) => 1,
        };
        let box_h = body_rows + 4;
        let box_w = match overlay {
            Overlay::Help { lines } => lines
                .iter()
                .map(|l| l.chars().count() as u16)
                .max()
                .unwrap_or(0)
                .max(20)
                + 4,
            _ => 20,
        };
        let x = area_x + area_w.saturating_sub(box_w) / 2;
        let y = area_y + area_h.saturating_sub(box_h) / 2;

        fb.fill_rect(x, y, box_w, box_h, ' ', text);
        fb.draw_box(x, y, box_w, box_h, text);

        let inner_x = x + 1;
        let inner_w = box_w.saturating_sub(2);
        match overlay {
            Overlay::None => {}
            Overlay::PauseMenu {
                options,
                selected: current,
            } => {
                fb.put_str_centered(inner_x, inner_w, y + 1, "PAUSED", title);
                for (i, option) in options.iter().enumerate() {
                    let row = y + 3 + i as u16;
                    if i == current {
                        fb.put_str(inner_x + 2, row, ">", selected);
                        fb.put_str(inner_x + 4, row, option, selected);
                    } else {
                        fb.put_str(inner_x + 4, row, option, text);
                    }
                }
            }
            Overlay::Help { lines } => {
                fb.put_str_centered(inner_x, inner_w, y + 1, "HOW TO PLAY", title);
                for (i, line) in lines.iter().enumerate() {
                    fb.put_str(inner_x + 1, y + 3 + i as u16, line, text);
                }
                fb.put_str_centered(
                    inner_x,
                    inner_w,
                    y + 4 + lines.len() as u16,
                    "Esc: back",
                    text.dim(),
                );
            }
            Overlay::Countdown(remaining) => {
                fb.put_str_centered(inner_x, inner_w, y + 1, "GET READY", title);
                if remaining > 0 {
                    let digit_x = inner_x + inner_w.saturating_sub(1) / 2;
                    fb.put_u32(digit_x, y + 3, remaining, selected);
                } else {
                    fb.put_str_centered(inner_x, inner_w, y + 3, "GO!", selected);
                }
            }
        }
    }
}

/// Map an absolute board cell onto the visible field, if it is visible.
fn visible_cell(x: i8, y: i8) -> Option<(u16, u16)> {
    let row = y.checked_sub(BUFFER_HEIGHT as i8)?;
    if x < 0 || x >= BOARD_WIDTH as i8 || row < 0 || row >= VISIBLE_HEIGHT as i8 {
        return None;
    }
    Some((x as u16, row as u16))
}

fn piece_color(kind: PieceKind) -> Rgb {
    match kind {
        PieceKind::I => Rgb::new(80, 220, 220),
        PieceKind::J => Rgb::new(80, 120, 220),
        PieceKind::L => Rgb::new(255, 165, 0),
        PieceKind::O => Rgb::new(240, 220, 80),
        PieceKind::S => Rgb::new(100, 220, 120),
        PieceKind::T => Rgb::new(200, 120, 220),
        PieceKind::Z => Rgb::new(220, 80, 80),
    }
}
