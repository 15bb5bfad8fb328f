use serde::{Deserialize, Serialize};

use crate::{BoardStats, Piece};

/// Serialisable view of a board at one instant.
///
/// Rows use the [`Grid`](crate::Grid) text form, top row first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub width: usize,
    pub height: usize,
    pub rows: Vec<String>,
    pub active: Option<Piece>,
    pub speed: f64,
    pub speed_up: bool,
    pub game_over: bool,
    pub stats: BoardStats,
}
