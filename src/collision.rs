//! Placement collision queries
//!
//! Every query here is pure: callers build a candidate [`Placement`], ask
//! whether it is free, and only then commit it to the active piece.

use crate::board::{BOARD_WIDTH, Board};
use crate::tetromino::{PieceShape, Rotation};

/// Where a piece would sit: top-left corner of its mask plus rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub row: i32,
    pub col: i32,
    pub rotation: Rotation,
}

impl Placement {
    pub fn shifted(self, rows: i32, cols: i32) -> Self {
        Self {
            row: self.row + rows,
            col: self.col + cols,
            ..self
        }
    }

    pub fn rotated(self, rotation: Rotation) -> Self {
        Self { rotation, ..self }
    }
}

/// Find the local column of the cell that blocks `shape` at `at`
///
/// Cells are scanned in row-major order. A cell is blocked when it lies outside
/// the horizontal bounds, or when it is at or below the ceiling and the board
/// reports it occupied (which includes everything below the floor).
///
/// The first blocked cell decides the result. A later right-half hit never gets
/// the chance to replace it, so the reported column leans toward whichever side
/// the scan reaches first; rotation correction depends on that asymmetry.
pub fn collision(board: &Board, shape: &PieceShape, at: Placement) -> Option<usize> {
    shape.cells(at.rotation).find_map(|(i, k)| {
        let row = at.row + i as i32;
        let col = at.col + k as i32;
        let blocked = col < 0 || col >= BOARD_WIDTH as i32 || board.is_occupied(row, col);
        blocked.then_some(k)
    })
}

/// Whether `shape` at the given row, column and rotation overlaps anything
pub fn would_collide(board: &Board, shape: &PieceShape, row: i32, col: i32, rotation: Rotation) -> bool {
    collision(board, shape, Placement { row, col, rotation }).is_some()
}

/// Horizontal correction for a rotation blocked at local column `k`
///
/// A block in the left half pushes the piece right by `k + 1`, anything else
/// pushes it left by `side - k`.
pub fn rotation_correction(side: usize, k: usize) -> i32 {
    if k < side / 2 {
        k as i32 + 1
    } else {
        -((side - k) as i32)
    }
}
