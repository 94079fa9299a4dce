mod config;

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use zhouse_core::Move;
use zhouse_net::sample::record;
use zhouse_net::tensor::PLANES;
use zhouse_net::{GameOutcome, PositionState, build_input_tensor, decode_on};

use crate::config::ReplayConfig;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let config = ReplayConfig::from_args(std::env::args().skip(1))?;
    info!(start = %config.start, planes = config.planes, "zhouse starting");

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut games = 0usize;

    for (line_no, line) in stdin.lock().lines().enumerate() {
        let line = line.context("failed to read stdin")?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        games += 1;
        replay_game(&config, games, line, &mut out)
            .with_context(|| format!("game {games} (line {})", line_no + 1))?;
    }

    info!(games, "zhouse done");
    Ok(())
}

/// Split a game line into its moves and an optional trailing result token.
fn split_result(line: &str) -> (Vec<&str>, GameOutcome) {
    let mut tokens: Vec<&str> = line.split_whitespace().collect();
    match tokens.last().map(|t| t.parse::<GameOutcome>()) {
        Some(Ok(outcome)) => {
            tokens.pop();
            (tokens, outcome)
        }
        _ => (tokens, GameOutcome::Undecided),
    }
}

fn replay_game(config: &ReplayConfig, game: usize, line: &str, out: &mut impl Write) -> Result<()> {
    let (tokens, outcome) = split_result(line);

    let mut state = PositionState::new(config.start);
    let mut plies = 0usize;
    for text in tokens {
        let Some(mv) = Move::from_uci(text, state.board()) else {
            warn!(game, ply = plies + 1, text, "unparsable move, truncating game");
            break;
        };
        let sample = record(&state, mv, outcome).with_context(|| format!("cannot record {mv}"))?;
        if decode_on(sample.action, state.board()).ok() != Some(mv) {
            warn!(game, mv = %mv, index = sample.action, "action index does not decode back to the move");
        }
        state.push(mv);
        plies += 1;
        writeln!(out, "{game}\t{plies}\t{mv}\t{}\t{}", sample.action, sample.value)?;
    }

    let repetitions = state.current_repetitions()?;
    writeln!(
        out,
        "# game {game}: {plies} plies, result {outcome}, repetitions {repetitions}, final {}",
        state.board()
    )?;
    debug!(game, key = %state.board().position_key(), "final position");

    if config.planes {
        let tensor = build_input_tensor(&state)?;
        for (plane, values) in tensor.planes().enumerate() {
            let sum: f32 = values.iter().sum();
            writeln!(out, "#   plane {plane:2}/{PLANES}: sum {sum:.4}")?;
        }
    }

    Ok(())
}
