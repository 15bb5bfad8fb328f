use serde::{Deserialize, Serialize};

/// Edge length of one grid cell in world units.
///
/// Shared by the board and every piece.
pub const CELL_SIZE: f64 = 10.0;

/// Fall distance per tick while soft-drop is requested.
pub const MAX_SPEED: f64 = CELL_SIZE / 4.0;

/// Default fall distance per tick.
pub const DEFAULT_SPEED: f64 = 1.0;

/// Tolerance for world coordinates accumulated from repeated fall steps.
pub(crate) const EPSILON: f64 = 1e-9;

/// Point in continuous world space.
///
/// The origin is the centre of the board and `y` grows upward, so the top row of the
/// grid has the largest `y`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Self = Self::new(0.0, 0.0);

    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn translated(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Rounds to the nearest integer, with halves going toward positive infinity.
///
/// [`f64::round`] sends halves away from zero, which would settle pieces below the
/// board centre one row lower than pieces above it.
///
/// ```
/// use stackfall_engine::round_half_up;
///
/// assert_eq!(round_half_up(2.5), 3.0);
/// assert_eq!(round_half_up(-2.5), -2.0);
/// assert_eq!(round_half_up(-2.6), -3.0);
/// ```
#[must_use]
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Snaps a world coordinate to the nearest cell boundary.
#[must_use]
pub fn snap_to_cell(value: f64) -> f64 {
    round_half_up(value / CELL_SIZE) * CELL_SIZE
}

pub(crate) fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

/// World length of `cells` grid cells.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn cells_to_world(cells: usize) -> f64 {
    cells as f64 * CELL_SIZE
}

#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_index(value: f64) -> usize {
    if value <= 0.0 { 0 } else { value as usize }
}

/// Mapping between world coordinates and grid indices for a board of fixed size.
///
/// Rows are numbered from the top (row 0) and columns from the left (column 0).
/// The board's world-space centre is the origin.
///
/// Two row conversions exist on purpose:
///
/// - [`probe_row`](Self::probe_row) rounds a partially entered row *down the board*,
///   so a collision probe never under-counts how far a falling piece already is
/// - [`settle_row`](Self::settle_row) rounds to the nearest row, so a resting piece
///   maps to exactly one row even if it stopped at a sub-cell offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardFrame {
    width: usize,
    height: usize,
}

impl BoardFrame {
    #[must_use]
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub const fn width(self) -> usize {
        self.width
    }

    #[must_use]
    pub const fn height(self) -> usize {
        self.height
    }

    #[must_use]
    pub fn world_width(self) -> f64 {
        cells_to_world(self.width)
    }

    #[must_use]
    pub fn world_height(self) -> f64 {
        cells_to_world(self.height)
    }

    #[must_use]
    pub fn top_y(self) -> f64 {
        self.world_height() / 2.0
    }

    #[must_use]
    pub fn bottom_y(self) -> f64 {
        -self.top_y()
    }

    #[must_use]
    pub fn left_x(self) -> f64 {
        -self.world_width() / 2.0
    }

    #[must_use]
    pub fn right_x(self) -> f64 {
        self.world_width() / 2.0
    }

    /// Row reached by a top edge at `top_edge` when probing for collisions.
    ///
    /// Equivalent to `max(0, height / 2 - floor(top_edge / CELL_SIZE))` on boards with an
    /// even height, but measured from the board top so odd heights work too.
    #[must_use]
    pub fn probe_row(self, top_edge: f64) -> usize {
        let depth = (self.top_y() - top_edge) / CELL_SIZE;
        to_index((depth - EPSILON).ceil())
    }

    /// Row a resting top edge at `top_edge` settles into.
    #[must_use]
    pub fn settle_row(self, top_edge: f64) -> usize {
        let depth = (self.top_y() - top_edge) / CELL_SIZE;
        to_index(round_half_up(depth))
    }

    /// Column of a left edge at `left_edge`. May lie outside the board.
    #[expect(clippy::cast_possible_truncation)]
    #[must_use]
    pub fn column(self, left_edge: f64) -> isize {
        round_half_up((left_edge - self.left_x()) / CELL_SIZE) as isize
    }

    /// Clamps a destination row to the bottom row.
    ///
    /// Only a piece whose mask hangs below the floor (after a rotation next to it) needs
    /// this; such a piece is lifted back onto the floor when it locks.
    #[must_use]
    pub fn clamp_row(self, row: usize) -> usize {
        row.min(self.height - 1)
    }

    /// Converts a column to an index, or `None` if it lies outside the board.
    #[must_use]
    pub fn column_index(self, column: isize) -> Option<usize> {
        usize::try_from(column).ok().filter(|&col| col < self.width)
    }

    /// Clamps a column into the board.
    #[must_use]
    pub fn clamp_column(self, column: isize) -> usize {
        usize::try_from(column).unwrap_or(0).min(self.width - 1)
    }

    /// World position of the centre of cell `(row, col)`.
    #[must_use]
    pub fn cell_center(self, row: usize, col: usize) -> Point {
        Point::new(
            self.left_x() + cells_to_world(col) + CELL_SIZE / 2.0,
            self.top_y() - cells_to_world(row) - CELL_SIZE / 2.0,
        )
    }
}
