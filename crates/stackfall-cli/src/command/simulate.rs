use std::path::PathBuf;

use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;
use serde::Serialize;
use stackfall_engine::{
    Board, BoardSnapshot, EventSink, PieceProvider, PieceSeed, Scene, SceneEvent,
};

use crate::{command::BoardArg, util::Output};

const DEFAULT_MAX_TICKS: usize = 10_000;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    #[clap(flatten)]
    pub(super) board: BoardArg,
    /// Maximum number of ticks to run
    #[clap(long, default_value_t = DEFAULT_MAX_TICKS)]
    max_ticks: usize,
    /// Print the final board as JSON
    #[clap(long)]
    json: bool,
    /// Print every scene event as a JSON line while the game runs
    #[clap(long)]
    trace: bool,
    /// Output file path
    #[clap(long)]
    output: Option<PathBuf>,
}

/// Final state of a simulated game.
#[derive(Debug, Serialize)]
struct SimulationReport {
    seed: PieceSeed,
    ticks: usize,
    board: BoardSnapshot,
}

/// Random player input, reproducible from the board seed.
#[derive(Debug)]
struct InputDriver {
    rng: Pcg32,
}

impl InputDriver {
    fn new(seed: PieceSeed) -> Self {
        // Little-endian bytes keep this stream apart from the shape draw.
        Self {
            rng: Pcg32::from_seed(seed.to_u128().to_le_bytes()),
        }
    }

    fn press<P: PieceProvider>(&mut self, board: &mut Board<P>) {
        match self.rng.random_range(0..40) {
            0..=2 => _ = board.move_left(),
            3..=5 => _ = board.move_right(),
            6 | 7 => _ = board.rotate(),
            8 => board.set_speed_up(true),
            _ => {}
        }
    }
}

/// Runs `board` with random input until it tops out or `max_ticks` have passed.
///
/// Returns the number of ticks run.
fn simulate<P: PieceProvider>(
    board: &mut Board<P>,
    seed: PieceSeed,
    max_ticks: usize,
    scene: &mut impl Scene,
) -> usize {
    let mut input = InputDriver::new(seed);
    for tick in 1..=max_ticks {
        if board.active_piece().is_some() {
            input.press(board);
        }
        if board.update(scene).is_topped_out() {
            return tick;
        }
    }
    max_ticks
}

pub(crate) fn run(arg: &SimulateArg) -> anyhow::Result<()> {
    let SimulateArg {
        board,
        max_ticks,
        json,
        trace,
        output,
    } = arg;

    let (mut board, seed) = board.build()?;
    let mut output = Output::from_output_path(output.as_deref())?;

    eprintln!("Simulating up to {max_ticks} ticks (seed {seed})...");
    let ticks = if *trace {
        // The first write error stops the trace; it is reported once the run ends.
        let mut traced = Ok(());
        let mut sink = EventSink(|event: SceneEvent| {
            if traced.is_ok() {
                traced = output.write_json_line(&event);
            }
        });
        let ticks = simulate(&mut board, seed, *max_ticks, &mut sink);
        traced?;
        ticks
    } else {
        simulate(&mut board, seed, *max_ticks, &mut ())
    };
    eprintln!("Simulation finished after {ticks} ticks");

    if *json {
        let report = SimulationReport {
            seed,
            ticks,
            board: board.snapshot(),
        };
        output.write_json(&report)?;
    } else {
        let stats = board.stats();
        output.write_line(&board.grid().to_string())?;
        output.write_line("")?;
        output.write_line(&format!("Seed:          {seed}"))?;
        output.write_line(&format!("Ticks:         {ticks}"))?;
        output.write_line(&format!("Locked pieces: {}", stats.locked_pieces()))?;
        output.write_line(&format!("Cleared rows:  {}", stats.cleared_rows()))?;
        output.write_line(&format!("Game over:     {}", board.is_game_over()))?;
    }
    output.finish()
}
