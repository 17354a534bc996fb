//! TerminalRenderer: flushes a framebuffer to a real terminal.
//!
//! Each frame is compared row by row with the frame flushed before it and
//! only the changed runs are re-encoded. The first frame, and any frame whose
//! size differs from the previous one, is a full redraw.

use std::io::{self, Write};

use anyhow::Result;

use crossterm::{
    cursor,
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, QueueableCommand,
};

use crate::fb::{Cell, CellStyle, FrameBuffer, Rgb};

pub struct TerminalRenderer<W: Write = io::Stdout> {
    out: W,
    /// Frame currently on screen; `None` forces a full redraw
    front: Option<FrameBuffer>,
    scratch: Vec<u8>,
    key_release_events: bool,
}

impl TerminalRenderer<io::Stdout> {
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl Default for TerminalRenderer<io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> TerminalRenderer<W> {
    /// Render into any writer. `enter`/`exit` still drive the real terminal mode.
    pub fn with_writer(out: W) -> Self {
        Self {
            out,
            front: None,
            scratch: Vec::with_capacity(64 * 1024),
            key_release_events: false,
        }
    }

    /// Switch to raw mode and the alternate screen.
    ///
    /// Key release reporting is requested when the terminal supports the
    /// keyboard enhancement protocol; see [`TerminalRenderer::key_release_events`].
    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.key_release_events = terminal::supports_keyboard_enhancement().unwrap_or(false);

        self.scratch.clear();
        self.scratch
            .queue(terminal::EnterAlternateScreen)?
            .queue(cursor::Hide)?
            .queue(terminal::DisableLineWrap)?;
        if self.key_release_events {
            self.scratch.queue(PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
            ))?;
        }
        self.flush_scratch()?;
        self.front = None;
        Ok(())
    }

    /// Restore the terminal. Safe to call after a failed frame.
    pub fn exit(&mut self) -> Result<()> {
        self.scratch.clear();
        if self.key_release_events {
            self.scratch.queue(PopKeyboardEnhancementFlags)?;
        }
        self.scratch
            .queue(ResetColor)?
            .queue(SetAttribute(Attribute::Reset))?
            .queue(terminal::EnableLineWrap)?
            .queue(cursor::Show)?
            .queue(terminal::LeaveAlternateScreen)?;
        self.flush_scratch()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Whether the terminal reports key releases
    pub fn key_release_events(&self) -> bool {
        self.key_release_events
    }

    /// Force the next draw to be a full redraw (terminal resize).
    pub fn invalidate(&mut self) {
        self.front = None;
    }

    /// Draw `fb`, then hand the previously shown frame back through `fb`.
    ///
    /// Callers keep one framebuffer and redraw it completely every frame;
    /// its contents after this call are stale.
    pub fn draw_swap(&mut self, fb: &mut FrameBuffer) -> Result<()> {
        self.scratch.clear();
        let mut back = match self.front.take() {
            Some(prev) if prev.width() == fb.width() && prev.height() == fb.height() => {
                encode_diff_into(&prev, fb, &mut self.scratch)?;
                prev
            }
            _ => {
                encode_full_into(fb, &mut self.scratch)?;
                FrameBuffer::new(fb.width(), fb.height())
            }
        };
        self.flush_scratch()?;

        std::mem::swap(&mut back, fb);
        self.front = Some(back);
        Ok(())
    }

    /// Borrow the underlying writer
    pub fn writer(&self) -> &W {
        &self.out
    }

    fn flush_scratch(&mut self) -> Result<()> {
        self.out.write_all(&self.scratch)?;
        self.out.flush()?;
        Ok(())
    }
}

/// Queues cell runs, emitting style changes only when the style differs
/// from the last cell written.
struct RunEncoder<'a> {
    out: &'a mut Vec<u8>,
    style: Option<CellStyle>,
}

impl<'a> RunEncoder<'a> {
    fn new(out: &'a mut Vec<u8>) -> Self {
        Self { out, style: None }
    }

    fn run(&mut self, x: u16, y: u16, cells: &[Cell]) -> Result<()> {
        self.out.queue(cursor::MoveTo(x, y))?;
        for cell in cells {
            if self.style != Some(cell.style) {
                queue_style(self.out, cell.style)?;
                self.style = Some(cell.style);
            }
            self.out.queue(Print(cell.ch))?;
        }
        Ok(())
    }

    /// Reset attributes if anything was written.
    fn finish(self) -> Result<()> {
        if self.style.is_some() {
            self.out.queue(ResetColor)?.queue(SetAttribute(Attribute::Reset))?;
        }
        Ok(())
    }
}

/// Encode a full-frame redraw into `out`.
pub fn encode_full_into(fb: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let mut enc = RunEncoder::new(out);
    for (y, row) in rows(fb).enumerate() {
        enc.run(0, y as u16, row)?;
    }
    enc.finish()
}

/// Encode only the runs of `next` that differ from `prev`.
///
/// Both frames must have the same size. Identical frames encode nothing.
pub fn encode_diff_into(prev: &FrameBuffer, next: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    let mut enc = RunEncoder::new(out);
    for (y, old, new) in rows(prev)
        .zip(rows(next))
        .enumerate()
        .map(|(y, (old, new))| (y as u16, old, new))
    {
        for (start, end) in changed_runs(old, new) {
            enc.run(start as u16, y, &new[start..end])?;
        }
    }
    enc.finish()
}

fn rows(fb: &FrameBuffer) -> impl Iterator<Item = &[Cell]> {
    fb.cells().chunks(usize::from(fb.width().max(1)))
}

/// Half-open column ranges where two rows differ.
fn changed_runs<'r>(old: &'r [Cell], new: &'r [Cell]) -> impl Iterator<Item = (usize, usize)> + 'r {
    let mut x = 0;
    std::iter::from_fn(move || {
        while x < new.len() && old.get(x) == new.get(x) {
            x += 1;
        }
        if x >= new.len() {
            return None;
        }
        let start = x;
        while x < new.len() && old.get(x) != new.get(x) {
            x += 1;
        }
        Some((start, x))
    })
}

fn queue_style(out: &mut Vec<u8>, style: CellStyle) -> Result<()> {
    out.queue(SetAttribute(Attribute::Reset))?
        .queue(SetForegroundColor(to_color(style.fg)))?
        .queue(SetBackgroundColor(to_color(style.bg)))?;
    if style.bold {
        out.queue(SetAttribute(Attribute::Bold))?;
    }
    if style.dim {
        out.queue(SetAttribute(Attribute::Dim))?;
    }
    Ok(())
}

fn to_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(bytes: &[u8]) -> String {
        String::from_utf8_lossy(bytes).into_owned()
    }

    fn cell(ch: char) -> Cell {
        CellStyle::default().into_cell(ch)
    }

    #[test]
    fn changed_runs_coalesce_adjacent_cells() {
        let old = [cell(' '); 6];
        let mut new = old;
        new[1] = cell('X');
        new[2] = cell('X');
        new[3] = cell('X');
        new[5] = cell('Y');

        let runs: Vec<_> = changed_runs(&old, &new).collect();
        assert_eq!(runs, vec![(1, 4), (5, 6)]);
    }

    #[test]
    fn identical_frames_encode_nothing() {
        let a = FrameBuffer::new(4, 4);
        let mut out = Vec::new();
        encode_diff_into(&a, &a.clone(), &mut out).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn first_draw_is_full_then_diffs() {
        let mut renderer = TerminalRenderer::with_writer(Vec::new());
        let mut fb = FrameBuffer::new(3, 1);
        fb.put_str(0, 0, "abc", CellStyle::default());

        renderer.draw_swap(&mut fb).unwrap();
        let first = text(renderer.writer());
        assert!(first.contains('a') && first.contains('c'));

        // The swapped-in buffer is stale; redraw it completely.
        fb.clear(Cell::default());
        fb.put_str(0, 0, "abZ", CellStyle::default());
        renderer.draw_swap(&mut fb).unwrap();
        let second = &text(renderer.writer())[first.len()..];
        assert!(second.contains('Z'));
        assert!(!second.contains('a'));
    }

    #[test]
    fn resize_forces_full_redraw() {
        let mut renderer = TerminalRenderer::with_writer(Vec::new());
        let mut fb = FrameBuffer::new(2, 1);
        fb.put_str(0, 0, "ab", CellStyle::default());
        renderer.draw_swap(&mut fb).unwrap();
        let first = renderer.writer().len();

        fb.resize(3, 1);
        fb.clear(Cell::default());
        fb.put_str(0, 0, "ab", CellStyle::default());
        renderer.draw_swap(&mut fb).unwrap();
        let second = text(&renderer.writer()[first..]);
        assert!(second.contains('a') && second.contains('b'));
    }
}
