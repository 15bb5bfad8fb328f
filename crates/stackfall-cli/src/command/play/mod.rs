use stackfall_engine::{Board, PieceSeed};

use self::app::PlayApp;
use crate::{command::BoardArg, tui::Tui};

mod activity;
mod app;

const DEFAULT_TICK_RATE: f64 = 60.0;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    #[clap(flatten)]
    pub(super) board: BoardArg,
    /// Board updates per second
    #[clap(long, default_value_t = DEFAULT_TICK_RATE)]
    pub(super) tick_rate: f64,
}

impl Default for PlayArg {
    fn default() -> Self {
        Self {
            board: BoardArg::default(),
            tick_rate: DEFAULT_TICK_RATE,
        }
    }
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg { board, tick_rate } = arg;
    anyhow::ensure!(
        tick_rate.is_finite() && *tick_rate > 0.0,
        "Tick rate must be positive, got {tick_rate}"
    );

    let (board, seed) = board.build()?;
    let mut app = PlayApp::new(board);
    Tui::with_tick_rate(*tick_rate).run(&mut app)?;

    print_summary(app.board(), seed);
    Ok(())
}

fn print_summary(board: &Board, seed: PieceSeed) {
    let stats = board.stats();
    let state = if board.is_game_over() {
        "game over"
    } else {
        "quit"
    };
    println!(
        "{state}: {} pieces locked, {} rows cleared in {} ticks (seed {seed})",
        stats.locked_pieces(),
        stats.cleared_rows(),
        stats.ticks()
    );
}
