//! Terminal front end: event polling, frame loop, and logging setup

use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{
    io::{self, Stdout, stdout},
    time::{Duration, Instant},
};
use tetramino::game::Game;
use tetramino::input::{Command, InputHandler};
use tetramino::settings::Settings;
use tetramino::ui;

/// Target frame rate
const TARGET_FPS: u64 = 60;
const FRAME_DURATION: Duration = Duration::from_micros(1_000_000 / TARGET_FPS);

/// Raw-mode terminal that is restored when dropped, on every exit path
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalGuard {
    fn new() -> io::Result<Self> {
        enable_raw_mode()?;
        execute!(stdout(), EnterAlternateScreen)?;
        let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
        terminal.clear()?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Get the tetramino temp directory, creating it if needed
fn log_dir() -> std::path::PathBuf {
    let dir = std::env::temp_dir().join("tetramino");
    let _ = std::fs::create_dir_all(&dir);
    dir
}

fn main() -> io::Result<()> {
    let session_id: u32 = rand::random();
    let log_dir = log_dir();
    let log_file = format!("{:08x}.log", session_id);

    // The terminal owns stdout, so logs go to a file
    let file_appender = tracing_appender::rolling::never(&log_dir, &log_file);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("tetramino=debug"));
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(filter)
        .with_ansi(false)
        .init();

    tracing::info!(
        "tetramino starting up, session={:08x}, log={}",
        session_id,
        log_dir.join(&log_file).display()
    );

    let settings = Settings::load().unwrap_or_else(|e| {
        tracing::warn!("using default settings: {}", e);
        Settings::default()
    });

    let game = match settings.gameplay.seed {
        Some(seed) => Game::with_seed(settings.rules.clone(), seed),
        None => Game::new(settings.rules.clone()),
    };

    let result = {
        let mut guard = TerminalGuard::new()?;
        run(&mut guard.terminal, game, &settings)
    };

    match &result {
        Ok(game) => {
            println!("Final Score: {}", game.score().points);
            println!("Level: {} | Lines: {}", game.score().level, game.score().lines);
        }
        Err(e) => tracing::error!("terminal error: {}", e),
    }

    result.map(|_| ())
}

/// Frame loop: draw, collect keys for one frame, tick the game
fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    mut game: Game,
    settings: &Settings,
) -> io::Result<Game> {
    let mut input = InputHandler::from_settings(settings);
    let mut last_frame = Instant::now();

    loop {
        terminal.draw(|frame| ui::render_game(frame, &game.snapshot(), settings))?;

        let deadline = last_frame + FRAME_DURATION;
        loop {
            let timeout = deadline.saturating_duration_since(Instant::now());
            if !event::poll(timeout)? {
                break;
            }
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if input.key_down(key) == Some(Command::Quit) {
                    tracing::info!("quit requested");
                    return Ok(game);
                }
            }
        }

        let now = Instant::now();
        let delta = now.duration_since(last_frame);
        last_frame = now;

        game.tick(input.take_intent(), delta);
    }
}
