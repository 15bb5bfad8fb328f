//! Board state machine and its configuration.
//!
//! - [`Board`] - occupancy grid, active piece, gravity, locking and row clearing
//! - [`BoardConfig`] - board dimensions and fall speed
//! - [`PieceSeed`] - seed for the deterministic shape draw
//! - [`BoardStats`] - counters of locked pieces and cleared rows
//! - [`BoardSnapshot`] - serialisable view of the board for tooling
//!
//! # Tick Flow
//!
//! 1. No active piece: draw a shape and spawn it at the top, centred
//! 2. Move the piece down by the fall speed (or the soft-drop speed)
//! 3. On reaching the floor or a locked block, lock it into the grid
//! 4. Clear full rows, then check whether the piece locked at spawn height
//!
//! Once the board is over, [`Board::update`] and every command are no-ops.

pub use self::{board::*, config::*, seed::*, snapshot::*, stats::*};

mod board;
mod config;
mod seed;
mod snapshot;
mod stats;
