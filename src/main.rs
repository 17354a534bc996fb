//! Terminal falling-block game (default binary).
//!
//! Reads configuration from the environment, then runs the session loop:
//! render, poll input until the next tick, advance by the real elapsed time.

use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event};

use tui_blockfall::config::AppConfig;
use tui_blockfall::event_log::{EventLog, LogRecord};
use tui_blockfall::session::Session;
use tui_blockfall::term::{FrameBuffer, GameView, TerminalRenderer, Viewport};

fn main() -> Result<()> {
    let config = AppConfig::from_env();
    for warning in &config.warnings {
        eprintln!("[Config] {}", warning);
    }

    let seed = config.seed.unwrap_or_else(rand::random);
    let mut log = open_log(&config, seed);

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let mut log_error = None;
    let result = run(&mut term, &config, seed, &mut log, &mut log_error);

    // Always try to restore terminal state.
    let _ = term.exit();
    if let Some(e) = log_error {
        eprintln!("[EventLog] {:#}; logging was disabled", e);
    }
    result
}

fn open_log(config: &AppConfig, seed: u32) -> Option<EventLog> {
    let path = config.log_path.as_ref()?;
    let mut log = match EventLog::open(path) {
        Ok(log) => log,
        Err(e) => {
            eprintln!("[EventLog] {:#}; logging disabled", e);
            return None;
        }
    };
    if let Err(e) = log.write(&LogRecord::session(seed, config.players)) {
        eprintln!("[EventLog] {:#}; logging disabled", e);
        return None;
    }
    Some(log)
}

fn run(
    term: &mut TerminalRenderer,
    config: &AppConfig,
    seed: u32,
    log: &mut Option<EventLog>,
    log_error: &mut Option<anyhow::Error>,
) -> Result<()> {
    let mut session = Session::new(seed, config.players, config.das_ms, config.arr_ms);
    session.set_key_release_events(term.key_release_events());
    session.start();

    let view = GameView::default();
    let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
    let mut fb = FrameBuffer::new(w, h);
    let mut viewport = Viewport::new(w, h);

    let tick_duration = Duration::from_millis(u64::from(config.tick_ms));
    let mut last_tick = Instant::now();

    loop {
        session.render_into(&view, viewport, &mut fb);
        term.draw_swap(&mut fb)?;

        let timeout = tick_duration.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => session.handle_key(key),
                Event::Resize(w, h) => {
                    viewport = Viewport::new(w, h);
                    term.invalidate();
                }
                _ => {}
            }
        }

        let elapsed = last_tick.elapsed();
        if elapsed >= tick_duration {
            last_tick = Instant::now();
            session.update(elapsed);
        }

        let mut failed = None;
        for ev in session.drain_events() {
            let Some(writer) = log.as_mut() else {
                continue;
            };
            if let Err(e) = writer.write(&LogRecord::lock(ev.player, &ev.event)) {
                failed = Some(e);
                break;
            }
        }
        if let Some(e) = failed {
            *log = None;
            *log_error = Some(e);
        }

        if session.should_quit() {
            return Ok(());
        }
    }
}
