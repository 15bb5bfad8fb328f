use std::fmt;

use serde::{Deserialize, Serialize};

use super::shape::ShapeKind;

/// Identifier of a locked block, unique within one board.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, derive_more::Display,
)]
#[display("#{_0}")]
pub struct BlockId(u64);

impl BlockId {
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Handle of a block locked into the grid.
///
/// Opaque to the board logic; a renderer uses the id to track its drawable and the
/// kind to pick a colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LockedBlock {
    id: BlockId,
    kind: ShapeKind,
}

impl LockedBlock {
    #[must_use]
    pub const fn new(id: BlockId, kind: ShapeKind) -> Self {
        Self { id, kind }
    }

    #[must_use]
    pub const fn id(self) -> BlockId {
        self.id
    }

    #[must_use]
    pub const fn kind(self) -> ShapeKind {
        self.kind
    }
}

/// Occupancy grid of locked blocks.
///
/// `height` rows of `width` cells, row 0 at the top, stored row-major. Each cell is
/// either empty or holds one [`LockedBlock`].
///
/// # Text Form
///
/// [`Display`](fmt::Display) and [`Grid::from_ascii`] use one line per row with `.` for
/// an empty cell and the shape letter (`I`, `O`, `S`, `Z`, `J`, `L`, `T`) for a block.
///
/// ```
/// use stackfall_engine::{Grid, ShapeKind};
///
/// let grid = Grid::from_ascii(4, 3, "
///     ....
///     IIII
/// ");
/// assert!(grid.is_row_full(2));
/// assert_eq!(grid.get(2, 0).map(|b| b.kind()), Some(ShapeKind::I));
/// assert_eq!(grid.to_string(), "....\n....\nIIII");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Option<LockedBlock>>,
}

impl Grid {
    /// Creates an empty grid.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![None; width * height],
        }
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn index(&self, row: usize, col: usize) -> usize {
        assert!(
            row < self.height && col < self.width,
            "cell ({row}, {col}) outside {}x{} grid",
            self.width,
            self.height
        );
        row * self.width + col
    }

    /// Returns the block at `(row, col)`, or `None` if the cell is empty or outside.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<LockedBlock> {
        if row < self.height && col < self.width {
            self.cells[row * self.width + col]
        } else {
            None
        }
    }

    #[must_use]
    pub fn is_occupied(&self, row: usize, col: usize) -> bool {
        self.get(row, col).is_some()
    }

    /// Writes `block` into `(row, col)` and returns what was there.
    ///
    /// # Panics
    ///
    /// Panics if the cell lies outside the grid.
    pub fn set(&mut self, row: usize, col: usize, block: LockedBlock) -> Option<LockedBlock> {
        let index = self.index(row, col);
        self.cells[index].replace(block)
    }

    /// Empties `(row, col)` and returns what was there.
    ///
    /// # Panics
    ///
    /// Panics if the cell lies outside the grid.
    pub fn take(&mut self, row: usize, col: usize) -> Option<LockedBlock> {
        let index = self.index(row, col);
        self.cells[index].take()
    }

    /// Returns the cells of `row`, left to right.
    #[must_use]
    pub fn row(&self, row: usize) -> &[Option<LockedBlock>] {
        &self.cells[row * self.width..][..self.width]
    }

    /// Returns an iterator over the rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Option<LockedBlock>]> + '_ {
        self.cells.chunks_exact(self.width)
    }

    /// Checks if `row` has no empty cell.
    #[must_use]
    pub fn is_row_full(&self, row: usize) -> bool {
        self.row(row).iter().all(Option::is_some)
    }

    #[must_use]
    pub fn is_row_empty(&self, row: usize) -> bool {
        self.row(row).iter().all(Option::is_none)
    }

    /// Empties every cell of `row`, passing each removed block to `on_remove`.
    pub fn clear_row<F>(&mut self, row: usize, mut on_remove: F)
    where
        F: FnMut(LockedBlock),
    {
        for col in 0..self.width {
            if let Some(block) = self.take(row, col) {
                on_remove(block);
            }
        }
    }

    /// Moves every block above `row` down by one row.
    ///
    /// `row` is overwritten by the row above it, so it should be cleared first. Row 0 ends
    /// up empty. Each moved block is passed to `on_move` with its new `(row, col)`.
    pub fn shift_down_above<F>(&mut self, row: usize, mut on_move: F)
    where
        F: FnMut(LockedBlock, usize, usize),
    {
        for src in (0..row).rev() {
            for col in 0..self.width {
                let block = self.take(src, col);
                let dst = self.index(src + 1, col);
                self.cells[dst] = block;
                if let Some(block) = block {
                    on_move(block, src + 1, col);
                }
            }
        }
    }

    /// Returns the number of occupied cells.
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// Returns every block with its `(row, col)`, row-major.
    pub fn blocks(&self) -> impl Iterator<Item = (usize, usize, LockedBlock)> + '_ {
        self.cells.iter().enumerate().filter_map(|(index, cell)| {
            cell.map(|block| (index / self.width, index % self.width, block))
        })
    }

    /// Returns the id following the largest block id in the grid.
    #[must_use]
    pub fn next_block_id(&self) -> u64 {
        self.blocks()
            .map(|(_, _, block)| block.id().get() + 1)
            .max()
            .unwrap_or(0)
    }

    /// Creates a grid from its text form, with the given rows aligned to the bottom.
    ///
    /// Whitespace around each line is ignored, as are blank lines. Blocks are numbered
    /// row-major from 0. Intended for tests and puzzle set-ups.
    ///
    /// # Panics
    ///
    /// Panics if a row does not have exactly `width` cells, if there are more than
    /// `height` rows, or if a cell is neither `.` nor a shape letter.
    #[must_use]
    pub fn from_ascii(width: usize, height: usize, art: &str) -> Self {
        let lines: Vec<&str> = art
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        assert!(
            lines.len() <= height,
            "Grid art has {} rows, grid is {height} tall",
            lines.len()
        );

        let mut grid = Self::new(width, height);
        let mut next_id = 0;
        let first_row = height - lines.len();
        for (i, line) in lines.iter().enumerate() {
            let cells: Vec<char> = line.chars().collect();
            assert_eq!(
                cells.len(),
                width,
                "Each row must have exactly {width} cells, got {} at row {i}",
                cells.len()
            );
            for (col, &ch) in cells.iter().enumerate() {
                if ch == '.' {
                    continue;
                }
                let kind = ShapeKind::from_char(ch)
                    .unwrap_or_else(|| panic!("invalid cell {ch:?} at row {i}"));
                grid.set(first_row + i, col, LockedBlock::new(BlockId(next_id), kind));
                next_id += 1;
            }
        }
        grid
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.rows().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            for cell in row {
                let ch = cell.map_or('.', |block| block.kind().as_char());
                write!(f, "{ch}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(id: u64) -> LockedBlock {
        LockedBlock::new(BlockId::new(id), ShapeKind::T)
    }

    #[test]
    fn test_new_grid_is_empty() {
        let grid = Grid::new(10, 16);
        assert_eq!(grid.width(), 10);
        assert_eq!(grid.height(), 16);
        assert_eq!(grid.occupied_count(), 0);
        assert_eq!(grid.rows().count(), 16);
        for row in 0..16 {
            assert!(grid.is_row_empty(row));
            assert!(!grid.is_row_full(row));
        }
    }

    #[test]
    fn test_set_get_take() {
        let mut grid = Grid::new(4, 3);
        assert_eq!(grid.set(1, 2, block(7)), None);
        assert_eq!(grid.get(1, 2), Some(block(7)));
        assert!(grid.is_occupied(1, 2));

        assert_eq!(grid.set(1, 2, block(8)), Some(block(7)));
        assert_eq!(grid.take(1, 2), Some(block(8)));
        assert_eq!(grid.get(1, 2), None);
        assert_eq!(grid.take(1, 2), None);
    }

    #[test]
    fn test_get_outside_is_empty() {
        let grid = Grid::new(4, 3);
        assert_eq!(grid.get(3, 0), None);
        assert_eq!(grid.get(0, 4), None);
    }

    #[test]
    #[should_panic(expected = "outside 4x3 grid")]
    fn test_set_outside_panics() {
        let mut grid = Grid::new(4, 3);
        grid.set(3, 0, block(0));
    }

    #[test]
    fn test_row_full_and_counts() {
        let grid = Grid::from_ascii(
            4,
            3,
            "
            T...
            OOOO
            ",
        );
        assert!(grid.is_row_empty(0));
        assert!(!grid.is_row_full(1));
        assert!(grid.is_row_full(2));
        assert_eq!(grid.occupied_count(), 5);
        assert_eq!(grid.next_block_id(), 5);
    }

    #[test]
    fn test_clear_row_and_shift_down() {
        let mut grid = Grid::from_ascii(
            3,
            4,
            "
            L..
            .J.
            OOO
            T.S
            ",
        );
        let mut removed = Vec::new();
        grid.clear_row(2, |block| removed.push(block.kind()));
        assert_eq!(removed, [ShapeKind::O; 3]);

        let mut moved = Vec::new();
        grid.shift_down_above(2, |block, row, col| moved.push((block.kind(), row, col)));
        assert_eq!(moved, [(ShapeKind::J, 2, 1), (ShapeKind::L, 1, 0)]);
        assert_eq!(grid.to_string(), "...\nL..\n.J.\nT.S");
        assert_eq!(grid.occupied_count(), 4);
    }

    #[test]
    fn test_blocks_row_major() {
        let grid = Grid::from_ascii(3, 2, "L..\n..J");
        let blocks: Vec<_> = grid
            .blocks()
            .map(|(row, col, block)| (row, col, block.kind()))
            .collect();
        assert_eq!(blocks, vec![(0, 0, ShapeKind::L), (1, 2, ShapeKind::J)]);
    }

    #[test]
    fn test_display_round_trip() {
        let art = "..S.\nZ..I\nOOOO";
        let grid = Grid::from_ascii(4, 3, art);
        assert_eq!(grid.to_string(), art);
    }

    #[test]
    #[should_panic(expected = "exactly 4 cells")]
    fn test_from_ascii_rejects_ragged_rows() {
        let _ = Grid::from_ascii(4, 3, "...\n....");
    }
}
