//! Turning a finished game into supervised training samples.

use std::fmt;
use std::str::FromStr;

use tracing::debug;
use zhouse_core::{Board, Color, Move};

use crate::codec;
use crate::error::NetError;
use crate::policy;
use crate::position::PositionState;
use crate::tensor::{self, InputTensor};

/// Final result of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameOutcome {
    WhiteWin,
    BlackWin,
    Draw,
    /// Unfinished or unknown (`*`). Scored like a draw.
    Undecided,
}

impl GameOutcome {
    /// Value target for the player `to_move`: +1 for a win, -1 for a loss,
    /// 0 otherwise.
    pub fn value_for(self, to_move: Color) -> f32 {
        let white = match self {
            GameOutcome::WhiteWin => 1.0,
            GameOutcome::BlackWin => -1.0,
            GameOutcome::Draw | GameOutcome::Undecided => 0.0,
        };
        match to_move {
            Color::White => white,
            Color::Black => -white,
        }
    }
}

impl FromStr for GameOutcome {
    type Err = NetError;

    fn from_str(s: &str) -> Result<GameOutcome, NetError> {
        match s {
            "1-0" => Ok(GameOutcome::WhiteWin),
            "0-1" => Ok(GameOutcome::BlackWin),
            "1/2-1/2" => Ok(GameOutcome::Draw),
            "*" => Ok(GameOutcome::Undecided),
            other => Err(NetError::InvalidOutcome {
                found: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = match self {
            GameOutcome::WhiteWin => "1-0",
            GameOutcome::BlackWin => "0-1",
            GameOutcome::Draw => "1/2-1/2",
            GameOutcome::Undecided => "*",
        };
        f.write_str(token)
    }
}

/// One position of a game with its policy and value targets.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSample {
    /// Input planes of the position before the move.
    pub input: InputTensor,
    /// Action index of the move that was played.
    pub action: usize,
    /// Game result from the point of view of the side to move.
    pub value: f32,
}

impl TrainingSample {
    /// Return the one-hot policy target for the played move.
    pub fn policy_target(&self) -> Result<Vec<f32>, NetError> {
        policy::one_hot(self.action)
    }
}

/// Build the sample for playing `mv` from `state`. The state is not advanced.
pub fn record(state: &PositionState, mv: Move, outcome: GameOutcome) -> Result<TrainingSample, NetError> {
    Ok(TrainingSample {
        input: tensor::build_input_tensor(state)?,
        action: codec::encode(mv)?,
        value: outcome.value_for(state.board().side_to_move()),
    })
}

/// Replay `moves` from `start`, recording a sample before every move.
///
/// Stops at the first move that cannot be encoded and returns the error.
pub fn replay(start: Board, moves: &[Move], outcome: GameOutcome) -> Result<Vec<TrainingSample>, NetError> {
    let mut state = PositionState::new(start);
    let mut samples = Vec::with_capacity(moves.len());

    for &mv in moves {
        samples.push(record(&state, mv, outcome)?);
        state.push(mv);
    }

    debug!(plies = samples.len(), %outcome, "replayed game");
    Ok(samples)
}
