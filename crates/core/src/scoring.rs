//! Scoring module - line clear points, level progression and gravity speed
//!
//! Points for a clear are the base value for the number of lines times the
//! level in effect *before* the clear is counted. The level is derived from
//! total lines: `min(15, 1 + lines / 10)`.

use std::time::Duration;

use crate::types::{
    FALL_INTERVAL_FRAMES, FRAMES_PER_SECOND, LINES_PER_LEVEL, LINE_SCORES, MAX_LEVEL, MIN_LEVEL,
    SOFT_DROP_DIVISOR,
};

/// Base points for clearing `lines` rows at once (0 outside 1..=4)
pub fn line_base_points(lines: u32) -> u32 {
    LINE_SCORES.get(lines as usize).copied().unwrap_or(0)
}

/// Level reached after `total_lines` cleared lines
pub fn level_for_lines(total_lines: u32) -> u32 {
    (MIN_LEVEL + total_lines / LINES_PER_LEVEL).min(MAX_LEVEL)
}

/// Frames per row at 60 fps for `level`.
///
/// Levels outside the table fall back to `max(1, 48 - (level - 1) * 5)`.
pub fn fall_interval_frames(level: u32) -> u32 {
    let table_index = level.checked_sub(MIN_LEVEL).map(|i| i as usize);
    match table_index.and_then(|i| FALL_INTERVAL_FRAMES.get(i)) {
        Some(&frames) => frames,
        None => {
            let frames = 48 - (i64::from(level) - 1) * 5;
            frames.clamp(1, i64::from(u32::MAX)) as u32
        }
    }
}

/// Time between gravity steps at `level`
pub fn fall_interval(level: u32) -> Duration {
    Duration::from_secs(u64::from(fall_interval_frames(level))) / FRAMES_PER_SECOND
}

/// Gravity step while soft drop is held
pub fn soft_drop_interval(level: u32) -> Duration {
    fall_interval(level) / SOFT_DROP_DIVISOR
}

/// Score, level and line totals for one game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreTracker {
    score: u32,
    level: u32,
    lines: u32,
}

impl ScoreTracker {
    pub fn new() -> Self {
        Self {
            score: 0,
            level: MIN_LEVEL,
            lines: 0,
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    /// Credit a clear of `lines` rows scored at `level`.
    ///
    /// Returns the points awarded. A zero-line clear changes nothing.
    pub fn add_lines(&mut self, lines: u32, level: u32) -> u32 {
        if lines == 0 {
            return 0;
        }
        let points = line_base_points(lines).saturating_mul(level);
        self.score = self.score.saturating_add(points);
        self.lines = self.lines.saturating_add(lines);
        self.level = level_for_lines(self.lines);
        points
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for ScoreTracker {
    fn default() -> Self {
        Self::new()
    }
}
