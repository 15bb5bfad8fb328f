//! Falling-block board simulation.
//!
//! The crate is split the same way the game is:
//!
//! - [`core`] - geometry, cell masks, shapes, pieces, the occupancy grid and the
//!   [`Scene`] boundary used to notify a renderer
//! - [`engine`] - the [`Board`] state machine that spawns, drops, locks and clears
//!
//! # Example
//!
//! ```
//! use stackfall_engine::{Board, BoardConfig, PieceSeed, TickOutcome};
//!
//! let mut board = Board::with_seed(BoardConfig::default(), PieceSeed::from_u128(7)).unwrap();
//!
//! // Drop pieces until the first one locks.
//! let outcome = loop {
//!     match board.update(&mut ()) {
//!         TickOutcome::Fell => continue,
//!         outcome => break outcome,
//!     }
//! };
//!
//! assert!(outcome.is_locked());
//! assert!(!board.is_game_over());
//! assert_eq!(board.grid().occupied_count(), 4);
//! ```

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// Rejected board configuration.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("board must be at least one cell wide and tall, got {width}x{height}")]
    EmptyBoard { width: usize, height: usize },
    #[display("fall speed must be finite and positive, got {speed}")]
    InvalidSpeed { speed: f64 },
    #[display("fall speed {speed} exceeds the soft-drop speed {max}")]
    SpeedTooHigh { speed: f64, max: f64 },
    #[display("piece provider offers no shapes")]
    NoShapes,
    #[display("shape {kind} does not fit on a {width}x{height} board in every rotation")]
    ShapeTooLarge {
        kind: ShapeKind,
        width: usize,
        height: usize,
    },
    #[display("grid is {actual_width}x{actual_height}, board is {width}x{height}")]
    GridMismatch {
        width: usize,
        height: usize,
        actual_width: usize,
        actual_height: usize,
    },
}

/// Malformed cell mask.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum MaskError {
    #[display("mask has no cells")]
    Empty,
    #[display("mask row {row} has {len} cells, expected {expected}")]
    Ragged {
        row: usize,
        len: usize,
        expected: usize,
    },
    #[display("mask of {width}x{height} exceeds the maximum side of {}", MAX_MASK_SIDE)]
    TooLarge { width: usize, height: usize },
    #[display("invalid mask character {ch:?} in row {row}")]
    InvalidChar { row: usize, ch: char },
    #[display("mask has no filled cell")]
    NoFilledCell,
}

/// Reason a movement or rotation command left the board unchanged.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    derive_more::Display,
    derive_more::Error,
    derive_more::IsVariant,
)]
pub enum CommandError {
    #[display("game is over")]
    GameOver,
    #[display("no active piece")]
    NoActivePiece,
    #[display("piece would leave the board")]
    OutOfBounds,
    #[display("piece would overlap locked blocks")]
    Collision,
}
