//! Core game state and logic

use crate::board::Board;
use crate::piece::{ActivePiece, Step};
use crate::randomizer::{PieceSource, RandomSource};
use crate::rules::{GameRules, SessionRules};
use crate::score::Score;
use std::time::Duration;
use tracing::{debug, info};

/// Lifecycle of the active piece
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Falling,
    /// Only held while a lock is being resolved inside a tick
    Locking,
    GameOver,
}

/// Decoded input for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputIntent {
    pub movement: Step,
    pub rotation: Step,
    pub soft_drop: bool,
    pub restart: bool,
}

impl InputIntent {
    /// Build an intent from raw `{-1, 0, 1}` directions; other values are ignored
    pub fn from_raw(movement: i32, rotation: i32, soft_drop: bool, restart: bool) -> Self {
        Self {
            movement: Step::from_raw(movement),
            rotation: Step::from_raw(rotation),
            soft_drop,
            restart,
        }
    }
}

/// Read-only view handed to the renderer
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub board: &'a Board,
    pub piece: &'a ActivePiece,
    pub points: u64,
    pub level: u32,
    pub lines: u32,
    pub game_over: bool,
}

/// The main game struct
pub struct Game {
    board: Board,
    piece: ActivePiece,
    score: Score,
    rules: SessionRules,
    state: GameState,
    /// Time accumulated toward the next automatic descent
    elapsed: Duration,
    source: Box<dyn PieceSource>,
}

impl Game {
    /// Create a new game drawing random pieces
    pub fn new(rules: GameRules) -> Self {
        Self::with_source(rules, RandomSource::new())
    }

    /// Create a new game with a reproducible piece sequence
    pub fn with_seed(rules: GameRules, seed: u64) -> Self {
        Self::with_source(rules, RandomSource::with_seed(seed))
    }

    /// Create a new game with any piece source
    pub fn with_source(rules: GameRules, source: impl PieceSource + 'static) -> Self {
        let mut source: Box<dyn PieceSource> = Box::new(source);
        let board = Board::new();
        let (piece, _) = ActivePiece::spawn(source.next_kind(), &board);
        debug!("session started with {:?}", piece.kind);

        Self {
            board,
            piece,
            score: Score::new(),
            rules: SessionRules::new(rules),
            state: GameState::Falling,
            elapsed: Duration::ZERO,
            source,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn piece(&self) -> &ActivePiece {
        &self.piece
    }

    pub fn score(&self) -> &Score {
        &self.score
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_game_over(&self) -> bool {
        self.state == GameState::GameOver
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn fall_interval(&self) -> Duration {
        self.rules.fall_interval()
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            board: &self.board,
            piece: &self.piece,
            points: self.score.points,
            level: self.score.level,
            lines: self.score.lines,
            game_over: self.is_game_over(),
        }
    }

    /// Advance the game by one frame
    ///
    /// Order: restart, move, rotate, gravity test, soft drop, timed gravity,
    /// landing row. Nothing but a restart happens while the game is over.
    pub fn tick(&mut self, intent: InputIntent, delta: Duration) {
        if intent.restart {
            self.restart();
            return;
        }
        if self.is_game_over() {
            return;
        }

        self.elapsed = self.elapsed.saturating_add(delta);

        self.piece.shift(intent.movement, &self.board);
        self.piece.rotate(intent.rotation, &self.board);

        self.settle();

        if intent.soft_drop && !self.is_game_over() {
            self.step_down();
        }

        while !self.is_game_over() && self.elapsed > self.rules.fall_interval() {
            self.settle();
            if self.is_game_over() {
                break;
            }
            self.elapsed -= self.rules.fall_interval();
            self.step_down();
        }

        self.piece.update_landing_row(&self.board);
    }

    /// Wipe the board and session counters and spawn a fresh piece
    pub fn restart(&mut self) {
        self.board.clear();
        self.score.reset();
        self.rules.reset();
        self.elapsed = Duration::ZERO;
        self.state = GameState::Falling;
        debug!("session restarted");
        self.spawn();
    }

    /// One forced descent followed by the gravity test
    fn step_down(&mut self) {
        self.piece.descend(&self.board);
        self.settle();
    }

    /// Lock the piece if the row below it is blocked
    fn settle(&mut self) {
        if !self.piece.can_descend(&self.board) {
            self.lock_piece();
        }
    }

    /// Lock the current piece, clear rows, score, and spawn the next piece
    fn lock_piece(&mut self) {
        self.state = GameState::Locking;
        self.board.lock(self.piece.block_positions());

        let lines = self.board.clear_full_rows();
        let outcome = self.score.add_clear(lines, &mut self.rules);
        debug!(
            "locked {:?} at row {} col {}, cleared {} for {} points",
            self.piece.kind, self.piece.row, self.piece.col, outcome.lines, outcome.points
        );
        if outcome.leveled_up {
            info!(
                "level {} reached, fall interval {:?}",
                self.score.level,
                self.rules.fall_interval()
            );
        }

        self.spawn();
    }

    fn spawn(&mut self) {
        let kind = self.source.next_kind();
        let (piece, blocked) = ActivePiece::spawn(kind, &self.board);
        self.piece = piece;

        if blocked {
            self.state = GameState::GameOver;
            self.elapsed = Duration::ZERO;
            info!(
                "game over: score {}, level {}, lines {}",
                self.score.points, self.score.level, self.score.lines
            );
        } else {
            self.state = GameState::Falling;
        }
    }
}
