//! Game board representation and line clearing

/// Board dimensions
pub const BOARD_WIDTH: usize = 10;
pub const VISIBLE_ROWS: usize = 20;
/// Buffer rows above the ceiling (negative row indices) where pieces may spawn
pub const HIDDEN_ROWS: usize = 2;
pub const TOTAL_ROWS: usize = VISIBLE_ROWS + HIDDEN_ROWS;

/// The grid of locked blocks
///
/// Row 0 is the top visible row and rows grow downward. Negative rows form the
/// hidden buffer: pieces may pass through it but nothing is ever stored there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cells: [[bool; BOARD_WIDTH]; VISIBLE_ROWS],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [[false; BOARD_WIDTH]; VISIBLE_ROWS],
        }
    }

    /// Collision view of a cell
    ///
    /// Rows above the ceiling are always free. Columns outside the board and rows
    /// below the floor are always blocked.
    pub fn is_occupied(&self, row: i32, col: i32) -> bool {
        if row < 0 {
            return false;
        }
        if col < 0 || col >= BOARD_WIDTH as i32 || row >= VISIBLE_ROWS as i32 {
            return true;
        }
        self.cells[row as usize][col as usize]
    }

    /// Stored value of a visible cell, `false` for anything outside the grid
    pub fn is_filled(&self, row: usize, col: usize) -> bool {
        self.cells
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or(false)
    }

    /// Mark a cell as locked
    /// Returns false if the cell is outside the stored grid
    pub fn fill(&mut self, row: i32, col: i32) -> bool {
        if row < 0 || col < 0 || row >= VISIBLE_ROWS as i32 || col >= BOARD_WIDTH as i32 {
            return false;
        }
        self.cells[row as usize][col as usize] = true;
        true
    }

    /// Lock a set of absolute cells onto the board
    ///
    /// Cells above the ceiling are dropped.
    pub fn lock<I>(&mut self, positions: I)
    where
        I: IntoIterator<Item = (i32, i32)>,
    {
        for (row, col) in positions {
            if row >= 0 {
                self.fill(row, col);
            }
        }
    }

    /// Remove full rows and return how many were removed
    ///
    /// Rows are visited once, top to bottom. Each full row is removed on the spot
    /// by copying every row above it one step down and emptying row 0, so later
    /// indices are tested against the already shifted grid.
    pub fn clear_full_rows(&mut self) -> usize {
        let mut cleared = 0;

        for row in 0..VISIBLE_ROWS {
            if !self.is_row_full(row) {
                continue;
            }
            cleared += 1;
            for j in (1..=row).rev() {
                self.cells[j] = self.cells[j - 1];
            }
            self.cells[0] = [false; BOARD_WIDTH];
        }

        cleared
    }

    /// Check if a visible row is completely filled
    pub fn is_row_full(&self, row: usize) -> bool {
        self.cells
            .get(row)
            .is_some_and(|cells| cells.iter().all(|&cell| cell))
    }

    /// Number of locked cells
    pub fn occupied_count(&self) -> usize {
        self.cells
            .iter()
            .map(|row| row.iter().filter(|&&cell| cell).count())
            .sum()
    }

    /// Check if the board is completely empty
    pub fn is_empty(&self) -> bool {
        self.occupied_count() == 0
    }

    /// Empty every cell
    pub fn clear(&mut self) {
        self.cells = [[false; BOARD_WIDTH]; VISIBLE_ROWS];
    }

    /// Iterate over visible rows, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[bool; BOARD_WIDTH]> {
        self.cells.iter()
    }
}
