use serde::{Deserialize, Serialize};

/// Counters of a board's progress.
///
/// # Example
///
/// ```
/// use stackfall_engine::BoardStats;
///
/// let mut stats = BoardStats::new();
/// stats.complete_piece_lock(2);
/// stats.complete_piece_lock(0);
///
/// assert_eq!(stats.locked_pieces(), 2);
/// assert_eq!(stats.cleared_rows(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BoardStats {
    locked_pieces: usize,
    cleared_rows: usize,
    ticks: usize,
}

impl BoardStats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            locked_pieces: 0,
            cleared_rows: 0,
            ticks: 0,
        }
    }

    /// Returns the number of pieces locked into the grid.
    #[must_use]
    pub const fn locked_pieces(&self) -> usize {
        self.locked_pieces
    }

    /// Returns the total number of rows cleared.
    #[must_use]
    pub const fn cleared_rows(&self) -> usize {
        self.cleared_rows
    }

    /// Returns the number of ticks that advanced the board.
    #[must_use]
    pub const fn ticks(&self) -> usize {
        self.ticks
    }

    pub fn complete_tick(&mut self) {
        self.ticks += 1;
    }

    /// Records a locked piece and the rows its lock cleared.
    pub fn complete_piece_lock(&mut self, cleared_rows: usize) {
        self.locked_pieces += 1;
        self.cleared_rows += cleared_rows;
    }
}
