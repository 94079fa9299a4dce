//! Command-line configuration for the replay tool.

use anyhow::{Context, Result, bail};
use zhouse_core::{Board, STARTING_FEN};

/// Settings for a replay run.
#[derive(Debug, Clone)]
pub struct ReplayConfig {
    /// Position every game starts from.
    pub start: Board,
    /// Print per-plane sums of each game's final input tensor.
    pub planes: bool,
}

impl Default for ReplayConfig {
    fn default() -> ReplayConfig {
        ReplayConfig {
            start: Board::starting_position(),
            planes: false,
        }
    }
}

impl ReplayConfig {
    /// Parse `--fen <FEN>` and `--planes` from the arguments after the program name.
    pub fn from_args<I>(args: I) -> Result<ReplayConfig>
    where
        I: IntoIterator<Item = String>,
    {
        let mut config = ReplayConfig::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--fen" => {
                    let fen = args.next().context("--fen requires a FEN string")?;
                    config.start = fen
                        .parse()
                        .with_context(|| format!("invalid start FEN \"{fen}\""))?;
                }
                "--planes" => config.planes = true,
                "-h" | "--help" => {
                    println!("usage: zhouse [--fen <FEN>] [--planes] < games.txt");
                    println!("one game per line: UCI moves, optionally ending in 1-0, 0-1, 1/2-1/2 or *");
                    println!("default start: {STARTING_FEN}");
                    std::process::exit(0);
                }
                other => bail!("unknown argument \"{other}\""),
            }
        }

        Ok(config)
    }
}
