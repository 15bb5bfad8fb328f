use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use rand::Rng as _;
use stackfall_engine::{Board, BoardConfig, PieceSeed};

use self::{play::PlayArg, simulate::SimulateArg};
use crate::util;

mod play;
mod simulate;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play in the terminal (default)
    Play(#[clap(flatten)] PlayArg),
    /// Run a game headless with random input and print the final board
    Simulate(#[clap(flatten)] SimulateArg),
}

/// Board options shared by every mode.
#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct BoardArg {
    /// Board configuration file (JSON); the options below override its values
    #[clap(long)]
    config: Option<PathBuf>,
    /// Number of columns
    #[clap(long)]
    width: Option<usize>,
    /// Number of rows
    #[clap(long)]
    height: Option<usize>,
    /// Fall distance per tick in world units, one cell being 10
    #[clap(long)]
    speed: Option<f64>,
    /// Seed for the shape draw as 32 hex digits (random if omitted)
    #[clap(long)]
    seed: Option<PieceSeed>,
}

impl BoardArg {
    pub(crate) fn config(&self) -> anyhow::Result<BoardConfig> {
        let mut config = match &self.config {
            Some(path) => util::read_board_config(path)?,
            None => BoardConfig::default(),
        };
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(speed) = self.speed {
            config.speed = speed;
        }
        Ok(config)
    }

    /// Builds the board and returns it with the seed it was created from.
    pub(crate) fn build(&self) -> anyhow::Result<(Board, PieceSeed)> {
        let config = self.config()?;
        let seed = self.seed.unwrap_or_else(|| rand::rng().random());
        let board = Board::with_seed(config, seed).context("Invalid board configuration")?;
        Ok((board, seed))
    }
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode.unwrap_or(Mode::Play(PlayArg::default())) {
        Mode::Play(arg) => play::run(&arg)?,
        Mode::Simulate(arg) => simulate::run(&arg)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory as _;

    use super::*;

    #[test]
    fn test_command_definition() {
        CommandArgs::command().debug_assert();
    }

    #[test]
    fn test_board_options_override_defaults() {
        let args = CommandArgs::try_parse_from([
            "stackfall",
            "simulate",
            "--width",
            "6",
            "--speed",
            "2",
            "--seed",
            "000000000000000000000000000000ff",
        ])
        .unwrap();
        let Some(Mode::Simulate(arg)) = args.mode else {
            panic!("expected simulate mode");
        };
        let config = arg.board.config().unwrap();
        assert_eq!((config.width, config.height, config.speed), (6, 16, 2.0));

        let (board, seed) = arg.board.build().unwrap();
        assert_eq!(seed, PieceSeed::from_u128(0xff));
        assert_eq!(board.grid().width(), 6);
    }

    #[test]
    fn test_invalid_seed_is_rejected() {
        assert!(CommandArgs::try_parse_from(["stackfall", "play", "--seed", "xyz"]).is_err());
    }

    #[test]
    fn test_invalid_config_is_reported() {
        let arg = BoardArg {
            width: Some(0),
            ..BoardArg::default()
        };
        let err = arg.build().unwrap_err();
        assert_eq!(err.to_string(), "Invalid board configuration");
        assert!(format!("{err:#}").contains("0x16"));
    }
}
