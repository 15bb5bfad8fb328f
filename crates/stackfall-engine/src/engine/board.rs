use rand::{Rng as _, SeedableRng as _, seq::IndexedRandom as _};
use rand_pcg::Pcg32;

use crate::{
    BlockId, BoardFrame, BoardSnapshot, BoardStats, CELL_SIZE, CellMask, CommandError,
    ConfigError, Grid, LockedBlock, MAX_SPEED, Piece, PieceProvider, Point, Scene, Shape,
    TetrominoCatalog,
    core::geometry::{EPSILON, approx_eq, snap_to_cell},
};

use super::{BoardConfig, PieceSeed, config::validate_speed};

/// Result of one [`Board::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum TickOutcome {
    /// The game is over and nothing happened.
    Idle,
    /// The active piece, possibly spawned this tick, moved down.
    Fell,
    /// The active piece locked and the board is ready for the next one.
    Locked { cleared_rows: usize },
    /// The active piece locked at spawn height and the game is over.
    ToppedOut { cleared_rows: usize },
}

impl TickOutcome {
    /// Returns the number of rows the lock of this tick cleared.
    #[must_use]
    pub fn cleared_rows(self) -> usize {
        match self {
            Self::Idle | Self::Fell => 0,
            Self::Locked { cleared_rows } | Self::ToppedOut { cleared_rows } => cleared_rows,
        }
    }
}

/// Falling-block board: the occupancy grid, the active piece and the rules that move it.
///
/// The board is advanced by [`update`](Self::update), once per tick, and steered between
/// ticks with [`move_left`](Self::move_left), [`move_right`](Self::move_right),
/// [`rotate`](Self::rotate) and [`set_speed_up`](Self::set_speed_up). Every visual change
/// is reported to the [`Scene`] passed to the call that makes it.
///
/// # Coordinates
///
/// Pieces live in continuous world space with the board centre at the origin and `y`
/// growing upward. Locked blocks live in the [`Grid`], row 0 at the top. The
/// [`BoardFrame`] converts between the two.
///
/// # Game Over
///
/// When a piece locks with its top edge on the board's top edge the game is over. From
/// then on [`update`](Self::update) returns [`TickOutcome::Idle`] and every command
/// fails with [`CommandError::GameOver`].
///
/// # Example
///
/// ```
/// use stackfall_engine::{Board, BoardConfig, PieceSeed};
///
/// let mut board = Board::with_seed(BoardConfig::default(), PieceSeed::from_u128(1)).unwrap();
/// board.update(&mut ());
///
/// let piece = board.active_piece().unwrap().clone();
/// board.move_left().unwrap();
/// assert_eq!(board.active_piece().unwrap().left_edge(), piece.left_edge() - 10.0);
///
/// board.set_speed_up(true);
/// while !board.update(&mut ()).is_locked() {}
/// assert!(!board.is_speed_up());
/// assert_eq!(board.stats().locked_pieces(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Board<P = TetrominoCatalog> {
    frame: BoardFrame,
    grid: Grid,
    active: Option<Piece>,
    provider: P,
    rng: Pcg32,
    speed: f64,
    speed_up: bool,
    game_over: bool,
    next_block_id: u64,
    stats: BoardStats,
}

impl Board {
    /// Creates a board with the standard tetrominoes and a random seed.
    pub fn new(config: BoardConfig) -> Result<Self, ConfigError> {
        Self::with_seed(config, rand::rng().random())
    }

    /// Like [`Self::new`], but with a specific seed for a deterministic shape draw.
    pub fn with_seed(config: BoardConfig, seed: PieceSeed) -> Result<Self, ConfigError> {
        Self::with_provider(config, TetrominoCatalog::new(), seed)
    }
}

impl<P> Board<P>
where
    P: PieceProvider,
{
    /// Creates an empty board that spawns pieces from `provider`.
    ///
    /// Fails if the configuration is invalid, the provider offers no shapes, or one of its
    /// shapes, or the piece it creates for one, would not fit on the board in every rotation.
    pub fn with_provider(
        config: BoardConfig,
        provider: P,
        seed: PieceSeed,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let frame = BoardFrame::new(config.width, config.height);
        let shapes = provider.available_shapes();
        if shapes.is_empty() {
            return Err(ConfigError::NoShapes);
        }
        if let Some(shape) = shapes.iter().find(|shape| {
            !fits(frame, shape.mask()) || !fits(frame, provider.create_piece(shape).mask())
        }) {
            return Err(ConfigError::ShapeTooLarge {
                kind: shape.kind(),
                width: config.width,
                height: config.height,
            });
        }

        Ok(Self {
            frame,
            grid: Grid::new(config.width, config.height),
            active: None,
            provider,
            rng: Pcg32::from_seed(seed.into_bytes()),
            speed: config.speed,
            speed_up: false,
            game_over: false,
            next_block_id: 0,
            stats: BoardStats::new(),
        })
    }

    /// Advances the board by one tick.
    ///
    /// Spawns a piece if none is active, then moves the active piece down by the fall
    /// speed, or by [`MAX_SPEED`] while soft-drop is on. A piece whose step would reach the
    /// floor or a locked block is locked instead, full rows are cleared and soft-drop is
    /// turned off.
    pub fn update(&mut self, scene: &mut impl Scene) -> TickOutcome {
        if self.game_over {
            return TickOutcome::Idle;
        }
        self.stats.complete_tick();

        let piece = match self.active.take() {
            Some(piece) => piece,
            None => {
                let piece = self.draw_piece();
                scene.piece_added(&piece);
                piece
            }
        };

        let step = self.fall_step();
        let bottom_y = piece.bottom_edge() - step;
        let resting_bottom_y = if bottom_y <= self.frame.bottom_y() + EPSILON {
            self.frame.bottom_y()
        } else if self.detect_collision(&piece, step, 0.0) {
            snap_to_cell(bottom_y)
        } else {
            self.active = Some(piece.moved_by(0.0, -step));
            return TickOutcome::Fell;
        };

        let top_y = resting_bottom_y + piece.height();
        let cleared_rows = self.occupy(piece, resting_bottom_y, scene);
        self.speed_up = false;
        if approx_eq(top_y, self.frame.top_y()) {
            self.game_over = true;
            TickOutcome::ToppedOut { cleared_rows }
        } else {
            TickOutcome::Locked { cleared_rows }
        }
    }

    /// Checks if `piece`, shifted down by `dy` and left by `dx`, would overlap a locked block.
    ///
    /// Rows are taken with [`BoardFrame::probe_row`] and clamped to the bottom row; a
    /// column outside the board counts as a collision. Neither the grid nor the piece is
    /// changed.
    #[must_use]
    pub fn detect_collision(&self, piece: &Piece, dy: f64, dx: f64) -> bool {
        let start_row = self.frame.probe_row(piece.top_edge() - dy);
        let start_col = self.frame.column(piece.left_edge() - dx);
        piece.mask().filled_cells().any(|(y, x)| {
            let row = self.frame.clamp_row(start_row + y);
            match start_col
                .checked_add_unsigned(x)
                .and_then(|col| self.frame.column_index(col))
            {
                Some(col) => self.grid.is_occupied(row, col),
                None => true,
            }
        })
    }

    /// Locks `piece` into the grid with its bottom edge at `resting_bottom_y`.
    ///
    /// Every filled cell of the mask becomes a new block at the row from
    /// [`BoardFrame::settle_row`], clamped into the board. The scene gets one
    /// [`block_added`](Scene::block_added) per block, then
    /// [`piece_removed`](Scene::piece_removed), then the notifications of the row clear.
    /// A block written over an existing one reports the old block as removed.
    ///
    /// Returns the number of rows cleared.
    pub fn occupy(&mut self, piece: Piece, resting_bottom_y: f64, scene: &mut impl Scene) -> usize {
        let piece = piece.with_bottom_at(resting_bottom_y);
        let start_row = self.frame.settle_row(piece.top_edge());
        let start_col = self.frame.column(piece.left_edge());
        for (y, x) in piece.mask().filled_cells() {
            let row = self.frame.clamp_row(start_row + y);
            let col = self.frame.clamp_column(start_col.saturating_add_unsigned(x));
            let block = LockedBlock::new(self.allocate_block_id(), piece.kind());
            if let Some(replaced) = self.grid.set(row, col, block) {
                scene.block_removed(replaced);
            }
            scene.block_added(block, row, col, self.frame.cell_center(row, col));
        }
        scene.piece_removed(&piece);

        let cleared_rows = self.clear_full_rows(scene);
        self.stats.complete_piece_lock(cleared_rows);
        cleared_rows
    }

    /// Clears every full row, moving the rows above each one down.
    ///
    /// Rows are scanned from the bottom. After a clear the same row is checked again,
    /// since it now holds the row that was above it. Returns the number of rows cleared.
    pub fn clear_full_rows(&mut self, scene: &mut impl Scene) -> usize {
        let frame = self.frame;
        let mut cleared = 0;
        let mut row = frame.height();
        while row > 0 {
            if !self.grid.is_row_full(row - 1) {
                row -= 1;
                continue;
            }
            self.grid.clear_row(row - 1, |block| scene.block_removed(block));
            self.grid.shift_down_above(row - 1, |block, row, col| {
                scene.block_moved(block, row, col, frame.cell_center(row, col));
            });
            cleared += 1;
        }
        cleared
    }

    /// Spawns a piece of a randomly drawn shape, replacing the active piece if there is one.
    pub fn spawn_next(&mut self, scene: &mut impl Scene) -> Result<&Piece, CommandError> {
        self.ensure_running()?;
        let piece = self.draw_piece();
        Ok(self.place(piece, scene))
    }

    /// Spawns a piece of `shape`, replacing the active piece if there is one.
    ///
    /// Fails with [`CommandError::OutOfBounds`] if the shape, or the piece the provider
    /// creates for it, does not fit on the board.
    pub fn spawn(&mut self, shape: &Shape, scene: &mut impl Scene) -> Result<&Piece, CommandError> {
        self.ensure_running()?;
        let piece = self.provider.create_piece(shape);
        if !fits(self.frame, shape.mask()) || !fits(self.frame, piece.mask()) {
            return Err(CommandError::OutOfBounds);
        }
        let piece = self.spawn_position(piece);
        Ok(self.place(piece, scene))
    }

    /// Draws a shape and creates its piece at the spawn position.
    ///
    /// A created piece that would not fit on the board is replaced by a plain piece of the
    /// drawn shape, which was checked at construction.
    fn draw_piece(&mut self) -> Piece {
        let shape = self
            .provider
            .available_shapes()
            .choose(&mut self.rng)
            .expect("provider shapes were checked at construction");
        let mut piece = self.provider.create_piece(shape);
        if !fits(self.frame, piece.mask()) {
            piece = Piece::new(shape.kind(), shape.mask().clone());
        }
        self.spawn_position(piece)
    }

    /// Places `piece` horizontally centred with its top edge on the board's top edge.
    fn spawn_position(&self, piece: Piece) -> Piece {
        // The remainder keeps the left edge on a column boundary.
        let x = ((self.frame.world_width() - piece.width()) / 2.0) % CELL_SIZE;
        let y = self.frame.top_y() - piece.height() / 2.0;
        piece.with_position(Point::new(x, y))
    }

    fn place(&mut self, piece: Piece, scene: &mut impl Scene) -> &Piece {
        if let Some(old) = self.active.take() {
            scene.piece_removed(&old);
        }
        scene.piece_added(&piece);
        self.active.insert(piece)
    }

    /// Moves the active piece one cell to the left.
    pub fn move_left(&mut self) -> Result<(), CommandError> {
        self.shift(-CELL_SIZE)
    }

    /// Moves the active piece one cell to the right.
    pub fn move_right(&mut self) -> Result<(), CommandError> {
        self.shift(CELL_SIZE)
    }

    fn shift(&mut self, dx: f64) -> Result<(), CommandError> {
        let piece = self.active_piece_for_command()?;
        let in_bounds = if dx < 0.0 {
            piece.left_edge() + dx >= self.frame.left_x() - EPSILON
        } else {
            piece.right_edge() + dx <= self.frame.right_x() + EPSILON
        };
        if !in_bounds {
            return Err(CommandError::OutOfBounds);
        }
        let moved = piece.clone().moved_by(dx, 0.0);
        if self.is_blocked(&moved) {
            return Err(CommandError::Collision);
        }
        self.active = Some(moved);
        Ok(())
    }

    /// Turns the active piece 90° clockwise.
    ///
    /// A rotated piece that sticks out past the right wall is pushed back inside. The
    /// rotation is refused if the result would overlap a locked block, either where it
    /// stands or, for a mask hanging below the floor, where it will lock.
    pub fn rotate(&mut self) -> Result<(), CommandError> {
        let piece = self.active_piece_for_command()?;
        let mut rotated = piece.rotated();
        if rotated.right_edge() > self.frame.right_x() + EPSILON {
            let x = self.frame.right_x() - rotated.width() / 2.0;
            rotated = rotated.with_x(x);
        }
        if self.is_blocked(&rotated) {
            return Err(CommandError::Collision);
        }
        self.active = Some(rotated);
        Ok(())
    }

    /// Turns soft-drop on or off. Ignored once the game is over.
    ///
    /// Soft-drop is turned off again whenever a piece locks.
    pub fn set_speed_up(&mut self, speed_up: bool) {
        if !self.game_over {
            self.speed_up = speed_up;
        }
    }

    /// Checks if `piece` overlaps a locked block at its position.
    ///
    /// A piece whose mask hangs below the floor locks lifted onto it on the next tick, so
    /// it is also checked there.
    fn is_blocked(&self, piece: &Piece) -> bool {
        if self.detect_collision(piece, 0.0, 0.0) {
            return true;
        }
        let floor = self.frame.bottom_y();
        piece.bottom_edge() < floor - EPSILON
            && self.detect_collision(&piece.clone().with_bottom_at(floor), 0.0, 0.0)
    }

    fn ensure_running(&self) -> Result<(), CommandError> {
        if self.game_over {
            Err(CommandError::GameOver)
        } else {
            Ok(())
        }
    }

    fn active_piece_for_command(&self) -> Result<&Piece, CommandError> {
        self.ensure_running()?;
        self.active.as_ref().ok_or(CommandError::NoActivePiece)
    }
}

impl<P> Board<P> {
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[must_use]
    pub fn active_piece(&self) -> Option<&Piece> {
        self.active.as_ref()
    }

    #[must_use]
    pub fn provider(&self) -> &P {
        &self.provider
    }

    #[must_use]
    pub fn frame(&self) -> BoardFrame {
        self.frame
    }

    /// Returns the fall distance per tick without soft-drop.
    #[must_use]
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Sets the fall distance per tick without soft-drop.
    pub fn set_speed(&mut self, speed: f64) -> Result<(), ConfigError> {
        validate_speed(speed)?;
        self.speed = speed;
        Ok(())
    }

    #[must_use]
    pub fn is_speed_up(&self) -> bool {
        self.speed_up
    }

    fn fall_step(&self) -> f64 {
        if self.speed_up { MAX_SPEED } else { self.speed }
    }

    #[must_use]
    pub fn top_y(&self) -> f64 {
        self.frame.top_y()
    }

    #[must_use]
    pub fn bottom_y(&self) -> f64 {
        self.frame.bottom_y()
    }

    #[must_use]
    pub fn world_width(&self) -> f64 {
        self.frame.world_width()
    }

    #[must_use]
    pub fn world_height(&self) -> f64 {
        self.frame.world_height()
    }

    /// World position of the centre of grid cell `(row, col)`.
    #[must_use]
    pub fn cell_position(&self, row: usize, col: usize) -> Point {
        self.frame.cell_center(row, col)
    }

    #[must_use]
    pub fn stats(&self) -> &BoardStats {
        &self.stats
    }

    /// Replaces the locked blocks, for puzzles and tests.
    ///
    /// The active piece is kept. Fails if `grid` has other dimensions than the board.
    pub fn replace_grid(&mut self, grid: Grid) -> Result<(), ConfigError> {
        if grid.width() != self.frame.width() || grid.height() != self.frame.height() {
            return Err(ConfigError::GridMismatch {
                width: self.frame.width(),
                height: self.frame.height(),
                actual_width: grid.width(),
                actual_height: grid.height(),
            });
        }
        self.next_block_id = self.next_block_id.max(grid.next_block_id());
        self.grid = grid;
        Ok(())
    }

    #[must_use]
    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            width: self.frame.width(),
            height: self.frame.height(),
            rows: self.grid.to_string().lines().map(str::to_owned).collect(),
            active: self.active.clone(),
            speed: self.speed,
            speed_up: self.speed_up,
            game_over: self.game_over,
            stats: self.stats,
        }
    }

    fn allocate_block_id(&mut self) -> BlockId {
        let id = BlockId::new(self.next_block_id);
        self.next_block_id += 1;
        id
    }
}

/// Checks if `mask` fits on the board in every rotation.
fn fits(frame: BoardFrame, mask: &CellMask) -> bool {
    mask.max_side() <= frame.width() && mask.max_side() <= frame.height()
}
