//! Optional lock event log.
//!
//! One JSON object per line, appended to the file named by
//! `TETRIS_LOG_PATH`. The first record of every run is a `session` line
//! carrying the seed, so a run can be replayed from the log alone.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::types::LockEvent;

/// One log line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LogRecord {
    Session {
        seed: u32,
        players: u8,
    },
    Lock {
        player: usize,
        episode: u32,
        piece: u32,
        kind: &'static str,
        lines: u32,
        points: u32,
        score: u32,
        level: u32,
        hard_drop: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        game_over: Option<&'static str>,
    },
}

impl LogRecord {
    pub fn session(seed: u32, players: u8) -> Self {
        LogRecord::Session { seed, players }
    }

    pub fn lock(player: usize, event: &LockEvent) -> Self {
        LogRecord::Lock {
            player,
            episode: event.episode_id,
            piece: event.piece_id,
            kind: event.kind.as_str(),
            lines: event.lines_cleared,
            points: event.points,
            score: event.score,
            level: event.level,
            hard_drop: event.hard_drop,
            game_over: event.game_over.map(|kind| kind.as_str()),
        }
    }
}

pub struct EventLog {
    out: BufWriter<File>,
    buf: Vec<u8>,
}

impl EventLog {
    /// Open `path` for appending, creating it if needed.
    pub fn open(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("open event log {}", path.display()))?;
        Ok(Self {
            out: BufWriter::new(file),
            buf: Vec::with_capacity(256),
        })
    }

    /// Append one record and flush it.
    pub fn write(&mut self, record: &LogRecord) -> Result<()> {
        self.buf.clear();
        serde_json::to_writer(&mut self.buf, record).context("encode log record")?;
        self.buf.push(b'\n');
        self.out.write_all(&self.buf).context("write log record")?;
        self.out.flush().context("flush event log")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{GameOverKind, PieceKind};

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!(
            "tui-blockfall-{}-{}.jsonl",
            name,
            std::process::id()
        ))
    }

    fn event() -> LockEvent {
        LockEvent {
            episode_id: 2,
            piece_id: 17,
            kind: PieceKind::T,
            lines_cleared: 2,
            points: 600,
            score: 1400,
            level: 2,
            hard_drop: true,
            game_over: None,
        }
    }

    #[test]
    fn lock_record_json_shape() {
        let json = serde_json::to_value(LogRecord::lock(1, &event())).unwrap();
        assert_eq!(json["type"], "lock");
        assert_eq!(json["player"], 1);
        assert_eq!(json["piece"], 17);
        assert_eq!(json["kind"], "T");
        assert_eq!(json["points"], 600);
        assert!(json.get("game_over").is_none());
    }

    #[test]
    fn game_over_is_named() {
        let mut ev = event();
        ev.game_over = Some(GameOverKind::LockOut);
        let json = serde_json::to_value(LogRecord::lock(0, &ev)).unwrap();
        assert_eq!(json["game_over"], "lock_out");
    }

    #[test]
    fn appends_one_line_per_record() {
        let path = temp_path("append");
        let _ = std::fs::remove_file(&path);

        {
            let mut log = EventLog::open(&path).unwrap();
            log.write(&LogRecord::session(42, 1)).unwrap();
            log.write(&LogRecord::lock(0, &event())).unwrap();
        }
        {
            let mut log = EventLog::open(&path).unwrap();
            log.write(&LogRecord::session(7, 2)).unwrap();
        }

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], r#"{"type":"session","seed":42,"players":1}"#);
        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["type"], "lock");
        assert_eq!(second["score"], 1400);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn open_fails_for_missing_directory() {
        let path = std::env::temp_dir()
            .join("tui-blockfall-no-such-dir")
            .join("log.jsonl");
        let err = EventLog::open(&path).err().unwrap();
        assert!(err.to_string().contains("open event log"));
    }
}
