//! Start-up configuration read from environment variables.
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `TETRIS_SEED` | random | Piece sequence seed (u32) |
//! | `TETRIS_PLAYERS` | 1 | 1 or 2 (split screen) |
//! | `TETRIS_DAS_MS` | 150 | Auto-shift delay |
//! | `TETRIS_ARR_MS` | 50 | Auto-repeat rate |
//! | `TETRIS_TICK_MS` | 16 | Frame-loop tick |
//! | `TETRIS_LOG_PATH` | unset | Append lock events as JSON lines |
//!
//! Unparsable values fall back to the default and leave a warning behind.

use std::path::PathBuf;
use std::str::FromStr;

use crate::types::{DEFAULT_ARR_MS, DEFAULT_DAS_MS, TICK_MS};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub seed: Option<u32>,
    pub players: u8,
    pub das_ms: u32,
    pub arr_ms: u32,
    pub tick_ms: u32,
    pub log_path: Option<PathBuf>,
    /// Problems found while reading the environment
    pub warnings: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            seed: None,
            players: 1,
            das_ms: DEFAULT_DAS_MS,
            arr_ms: DEFAULT_ARR_MS,
            tick_ms: TICK_MS,
            log_path: None,
            warnings: Vec::new(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any variable source (tests pass a map).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        let mut warnings = Vec::new();

        let read = |key: &str| -> Option<String> {
            lookup(key)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        config.seed = parse_or_warn(&mut warnings, "TETRIS_SEED", read("TETRIS_SEED"), None);

        if let Some(raw) = read("TETRIS_PLAYERS") {
            match raw.parse::<u8>() {
                Ok(n @ 1..=2) => config.players = n,
                _ => warnings.push(format!(
                    "TETRIS_PLAYERS={raw:?} is not 1 or 2, using {}",
                    config.players
                )),
            }
        }

        config.das_ms = parse_or_warn(
            &mut warnings,
            "TETRIS_DAS_MS",
            read("TETRIS_DAS_MS"),
            Some(config.das_ms),
        )
        .unwrap_or(config.das_ms);
        config.arr_ms = parse_or_warn(
            &mut warnings,
            "TETRIS_ARR_MS",
            read("TETRIS_ARR_MS"),
            Some(config.arr_ms),
        )
        .unwrap_or(config.arr_ms);

        let tick_ms = parse_or_warn(
            &mut warnings,
            "TETRIS_TICK_MS",
            read("TETRIS_TICK_MS"),
            Some(config.tick_ms),
        )
        .unwrap_or(config.tick_ms);
        if tick_ms == 0 {
            warnings.push(format!("TETRIS_TICK_MS must be positive, using {}", TICK_MS));
        } else {
            config.tick_ms = tick_ms;
        }

        config.log_path = read("TETRIS_LOG_PATH").map(PathBuf::from);
        config.warnings = warnings;
        config
    }
}

fn parse_or_warn<T: FromStr + std::fmt::Display + Copy>(
    warnings: &mut Vec<String>,
    key: &str,
    raw: Option<String>,
    default: Option<T>,
) -> Option<T> {
    let raw = raw?;
    match raw.parse::<T>() {
        Ok(v) => Some(v),
        Err(_) => {
            match default {
                Some(d) => warnings.push(format!("{key}={raw:?} is not a number, using {d}")),
                None => warnings.push(format!("{key}={raw:?} is not a number, ignoring")),
            }
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = config_from(&[]);
        assert_eq!(config, AppConfig::default());
        assert!(config.warnings.is_empty());
    }

    #[test]
    fn reads_every_variable() {
        let config = config_from(&[
            ("TETRIS_SEED", "42"),
            ("TETRIS_PLAYERS", "2"),
            ("TETRIS_DAS_MS", "120"),
            ("TETRIS_ARR_MS", " 30 "),
            ("TETRIS_TICK_MS", "10"),
            ("TETRIS_LOG_PATH", "/tmp/locks.jsonl"),
        ]);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.players, 2);
        assert_eq!(config.das_ms, 120);
        assert_eq!(config.arr_ms, 30);
        assert_eq!(config.tick_ms, 10);
        assert_eq!(config.log_path, Some(PathBuf::from("/tmp/locks.jsonl")));
        assert!(config.warnings.is_empty());
    }

    #[test]
    fn invalid_values_fall_back_with_warnings() {
        let config = config_from(&[
            ("TETRIS_SEED", "abc"),
            ("TETRIS_PLAYERS", "3"),
            ("TETRIS_DAS_MS", "-5"),
            ("TETRIS_TICK_MS", "0"),
        ]);
        assert_eq!(config.seed, None);
        assert_eq!(config.players, 1);
        assert_eq!(config.das_ms, DEFAULT_DAS_MS);
        assert_eq!(config.tick_ms, TICK_MS);
        assert_eq!(config.warnings.len(), 4);
        assert!(config.warnings[0].contains("TETRIS_SEED"));
    }

    #[test]
    fn blank_log_path_is_unset() {
        let config = config_from(&[("TETRIS_LOG_PATH", "   ")]);
        assert_eq!(config.log_path, None);
    }
}
