//! Active falling piece logic

use crate::board::{Board, VISIBLE_ROWS};
use crate::collision::{Placement, collision, rotation_correction, would_collide};
use crate::tetromino::{PieceKind, PieceShape, Rotation};

/// Spawn column of the mask's left edge
pub const SPAWN_COL: i32 = 3;
/// Spawn row of the mask's top edge, inside the hidden buffer
pub const SPAWN_ROW: i32 = -2;

/// Horizontal or rotational step requested by the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Step {
    Left,
    #[default]
    None,
    Right,
}

impl Step {
    /// Decode a raw `{-1, 0, 1}` direction; anything else is ignored
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            -1 => Step::Left,
            1 => Step::Right,
            0 => Step::None,
            other => {
                tracing::debug!("ignoring out-of-range direction {}", other);
                Step::None
            }
        }
    }

    pub fn delta(self) -> i32 {
        match self {
            Step::Left => -1,
            Step::None => 0,
            Step::Right => 1,
        }
    }
}

/// An active falling piece
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivePiece {
    pub kind: PieceKind,
    pub rotation: Rotation,
    /// Top row of the mask; negative while above the ceiling
    pub row: i32,
    /// Left column of the mask
    pub col: i32,
    /// Row the piece would rest on if dropped now (render only)
    pub landing_row: i32,
}

impl ActivePiece {
    /// Create a piece at the spawn position
    ///
    /// The second value is true when the spawn is blocked. The test is made one
    /// row below the resting spawn row, i.e. where the piece would be after its
    /// first descent.
    pub fn spawn(kind: PieceKind, board: &Board) -> (Self, bool) {
        let mut piece = Self {
            kind,
            rotation: Rotation::Up,
            row: SPAWN_ROW,
            col: SPAWN_COL,
            landing_row: SPAWN_ROW,
        };
        let blocked = would_collide(board, piece.shape(), SPAWN_ROW + 1, SPAWN_COL, Rotation::Up);
        piece.update_landing_row(board);
        (piece, blocked)
    }

    pub fn shape(&self) -> &'static PieceShape {
        self.kind.shape()
    }

    pub fn placement(&self) -> Placement {
        Placement {
            row: self.row,
            col: self.col,
            rotation: self.rotation,
        }
    }

    fn fits(&self, board: &Board, at: Placement) -> bool {
        collision(board, self.shape(), at).is_none()
    }

    fn commit(&mut self, at: Placement) {
        self.row = at.row;
        self.col = at.col;
        self.rotation = at.rotation;
    }

    /// Absolute `(row, col)` of every block
    pub fn block_positions(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.shape()
            .cells(self.rotation)
            .map(move |(i, k)| (self.row + i as i32, self.col + k as i32))
    }

    /// Absolute `(row, col)` of every block at the landing row
    pub fn landing_positions(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.shape()
            .cells(self.rotation)
            .map(move |(i, k)| (self.landing_row + i as i32, self.col + k as i32))
    }

    /// Try to move one column, returns true if successful
    pub fn shift(&mut self, step: Step, board: &Board) -> bool {
        if step == Step::None {
            return false;
        }
        let target = self.placement().shifted(0, step.delta());
        if self.fits(board, target) {
            self.commit(target);
            true
        } else {
            false
        }
    }

    /// Try to rotate one quarter turn, correcting sideways once if blocked
    ///
    /// On failure the piece keeps its original rotation and column.
    pub fn rotate(&mut self, step: Step, board: &Board) -> bool {
        let rotation = match step {
            Step::Left => self.rotation.ccw(),
            Step::Right => self.rotation.cw(),
            Step::None => return false,
        };
        let turned = self.placement().rotated(rotation);

        let target = match collision(board, self.shape(), turned) {
            None => turned,
            Some(k) => turned.shifted(0, rotation_correction(self.shape().side, k)),
        };

        if self.fits(board, target) {
            self.commit(target);
            true
        } else {
            false
        }
    }

    /// Whether the row below is free
    pub fn can_descend(&self, board: &Board) -> bool {
        self.fits(board, self.placement().shifted(1, 0))
    }

    /// Move down one row if the row below is free
    pub fn descend(&mut self, board: &Board) -> bool {
        if self.can_descend(board) {
            self.row += 1;
            true
        } else {
            false
        }
    }

    /// Recompute the cached landing row
    ///
    /// Scans down from the current row; the landing row is the one just above
    /// the first blocked placement.
    pub fn update_landing_row(&mut self, board: &Board) {
        let shape = self.shape();
        let floor = VISIBLE_ROWS as i32;
        let blocked = (self.row..=floor)
            .find(|&row| would_collide(board, shape, row, self.col, self.rotation))
            .unwrap_or(floor);
        self.landing_row = blocked - 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BOARD_WIDTH;

    fn piece(kind: PieceKind, row: i32, col: i32) -> ActivePiece {
        ActivePiece {
            kind,
            rotation: Rotation::Up,
            row,
            col,
            landing_row: row,
        }
    }

    #[test]
    fn test_spawn_position() {
        let board = Board::new();
        let (piece, blocked) = ActivePiece::spawn(PieceKind::T, &board);
        assert!(!blocked);
        assert_eq!(piece.row, SPAWN_ROW);
        assert_eq!(piece.col, SPAWN_COL);
        assert_eq!(piece.rotation, Rotation::Up);
    }

    #[test]
    fn test_spawn_blocked_one_row_down() {
        let mut board = Board::new();
        // O at row -1 reaches row 0, columns 3 and 4
        board.fill(0, 4);
        let (_, blocked) = ActivePiece::spawn(PieceKind::O, &board);
        assert!(blocked);
    }

    #[test]
    fn test_step_from_raw() {
        assert_eq!(Step::from_raw(-1), Step::Left);
        assert_eq!(Step::from_raw(0), Step::None);
        assert_eq!(Step::from_raw(1), Step::Right);
        assert_eq!(Step::from_raw(7), Step::None);
        assert_eq!(Step::from_raw(-3), Step::None);
    }

    #[test]
    fn test_move_left_stops_at_wall() {
        let board = Board::new();
        let (mut piece, _) = ActivePiece::spawn(PieceKind::O, &board);
        assert!(piece.shift(Step::Left, &board));
        assert!(piece.shift(Step::Left, &board));
        assert!(piece.shift(Step::Left, &board));
        assert_eq!(piece.col, 0);
        assert!(!piece.shift(Step::Left, &board));
        assert_eq!(piece.col, 0);
    }

    #[test]
    fn test_move_right_stops_at_wall() {
        let board = Board::new();
        let mut piece = piece(PieceKind::O, 5, 0);
        while piece.shift(Step::Right, &board) {}
        assert_eq!(piece.col, BOARD_WIDTH as i32 - 2);
    }

    #[test]
    fn test_move_blocked_by_stack() {
        let mut board = Board::new();
        board.fill(6, 2);
        let mut piece = piece(PieceKind::O, 5, 3);
        assert!(!piece.shift(Step::Left, &board));
        assert_eq!(piece.col, 3);
    }

    #[test]
    fn test_rotate_in_open_space() {
        let board = Board::new();
        let mut piece = piece(PieceKind::T, 5, 3);
        assert!(piece.rotate(Step::Right, &board));
        assert_eq!(piece.rotation, Rotation::Right);
        assert_eq!(piece.col, 3);
        assert!(piece.rotate(Step::Left, &board));
        assert_eq!(piece.rotation, Rotation::Up);
    }

    #[test]
    fn test_rotate_corrects_off_left_wall() {
        let board = Board::new();
        // Vertical I in column 1: its cells sit at local column 2
        let mut piece = piece(PieceKind::I, 5, -1);
        piece.rotation = Rotation::Right;
        assert!(piece.block_positions().all(|(_, c)| c == 1));

        // Back to horizontal: cells at -1..=2, first hit is local column 0, push right by 1
        assert!(piece.rotate(Step::Left, &board));
        assert_eq!(piece.rotation, Rotation::Up);
        assert_eq!(piece.col, 0);
        assert!(piece.block_positions().all(|(_, c)| c >= 0));
    }

    #[test]
    fn test_rotate_under_corrects_against_left_wall() {
        let board = Board::new();
        // Vertical I against the left wall needs a shift of 2 but only gets 1
        let mut piece = piece(PieceKind::I, 5, -2);
        piece.rotation = Rotation::Right;
        assert!(piece.block_positions().all(|(_, c)| c == 0));

        let before = piece.clone();
        assert!(!piece.rotate(Step::Left, &board));
        assert_eq!(piece, before);
    }

    #[test]
    fn test_rotate_corrects_off_right_wall() {
        let board = Board::new();
        // Vertical I hugging the right wall
        let mut piece = piece(PieceKind::I, 5, BOARD_WIDTH as i32 - 3);
        piece.rotation = Rotation::Right;
        assert!(piece.block_positions().all(|(_, c)| c == BOARD_WIDTH as i32 - 1));

        // Horizontal cells at 7..=10, first hit is local column 3, push left by 1
        assert!(piece.rotate(Step::Right, &board));
        assert_eq!(piece.rotation, Rotation::Down);
        assert_eq!(piece.col, BOARD_WIDTH as i32 - 4);
    }

    #[test]
    fn test_rotate_rolls_back_when_correction_fails() {
        let mut board = Board::new();
        // Box the T in so neither the turn nor the correction fits
        for row in 4..9 {
            for col in 0..BOARD_WIDTH as i32 {
                if !(row == 5 && (3..=5).contains(&col)) && !(row == 4 && col == 4) {
                    board.fill(row, col);
                }
            }
        }
        let mut piece = piece(PieceKind::T, 4, 3);
        let before = piece.clone();
        assert!(!piece.rotate(Step::Right, &board));
        assert_eq!(piece, before);
    }

    #[test]
    fn test_descend_to_floor() {
        let board = Board::new();
        let mut piece = piece(PieceKind::O, 0, 4);
        while piece.descend(&board) {}
        assert_eq!(piece.row, VISIBLE_ROWS as i32 - 2);
        assert!(!piece.can_descend(&board));
    }

    #[test]
    fn test_landing_row_on_empty_board() {
        let board = Board::new();
        let (mut piece, _) = ActivePiece::spawn(PieceKind::O, &board);
        piece.update_landing_row(&board);
        assert_eq!(piece.landing_row, VISIBLE_ROWS as i32 - 2);
        // I piece occupies local row 1 when flat
        let (mut piece, _) = ActivePiece::spawn(PieceKind::I, &board);
        piece.update_landing_row(&board);
        assert_eq!(piece.landing_row, VISIBLE_ROWS as i32 - 2);
    }

    #[test]
    fn test_landing_row_on_stack() {
        let mut board = Board::new();
        board.fill(10, 4);
        let mut piece = piece(PieceKind::O, 0, 3);
        piece.update_landing_row(&board);
        assert_eq!(piece.landing_row, 8);
        assert_eq!(piece.row, 0);
        let landing: Vec<_> = piece.landing_positions().collect();
        assert_eq!(landing, vec![(8, 3), (8, 4), (9, 3), (9, 4)]);
    }
}
