//! The 34x64 input planes fed to the policy/value network.
//!
//! | Planes | Content                                           |
//! |--------|---------------------------------------------------|
//! | 0-5    | white pawn..king occupancy                        |
//! | 6-11   | black pawn..king occupancy                        |
//! | 12-13  | repetition count / 500 (two identical planes)     |
//! | 14-18  | white pocket pawn..queen / 32                     |
//! | 19-23  | black pocket pawn..queen / 32                     |
//! | 24-25  | promoted pieces, white then black                 |
//! | 26     | en passant target square                          |
//! | 27     | 1.0 when White is to move                         |
//! | 28     | fullmove number / 500                             |
//! | 29-32  | castling rights WK, WQ, BK, BQ                    |
//! | 33     | halfmove clock / 40                               |
//!
//! Scalar features are broadcast over all 64 squares. Squares are indexed
//! a1 = 0 through h8 = 63. Values are divided, not clamped.

use std::ops::Index;

use zhouse_core::{Bitboard, Board, CastleSide, Color, PieceKind};

use crate::error::NetError;
use crate::position::PositionState;

/// Number of planes in an input tensor.
pub const PLANES: usize = 34;

/// Squares per plane.
pub const PLANE_SIZE: usize = 64;

/// Divisor for repetition counts and the fullmove number.
pub const REPETITION_NORM: f32 = 500.0;

/// Divisor for pocket counts.
pub const POCKET_NORM: f32 = 32.0;

/// Divisor for the halfmove clock.
pub const HALFMOVE_NORM: f32 = 40.0;

const REPETITION_PLANE: usize = 12;
const POCKET_PLANE: usize = 14;
const PROMOTED_PLANE: usize = 24;
const EN_PASSANT_PLANE: usize = 26;
const COLOR_PLANE: usize = 27;
const FULLMOVE_PLANE: usize = 28;
const CASTLING_PLANE: usize = 29;
const HALFMOVE_PLANE: usize = 33;

/// Dense plane-major tensor of `PLANES * PLANE_SIZE` values.
#[derive(Clone, PartialEq)]
pub struct InputTensor {
    data: Vec<f32>,
}

impl InputTensor {
    fn zeros() -> InputTensor {
        InputTensor {
            data: vec![0.0; PLANES * PLANE_SIZE],
        }
    }

    /// Return one plane as 64 values.
    ///
    /// # Panics
    ///
    /// Panics if `plane >= PLANES`.
    pub fn plane(&self, plane: usize) -> &[f32] {
        &self.data[plane * PLANE_SIZE..(plane + 1) * PLANE_SIZE]
    }

    /// Iterate over the planes in order.
    pub fn planes(&self) -> impl Iterator<Item = &[f32]> {
        self.data.chunks_exact(PLANE_SIZE)
    }

    /// Return the flat plane-major values.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Consume the tensor, returning the flat plane-major values.
    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }

    fn fill(&mut self, plane: usize, value: f32) {
        self.data[plane * PLANE_SIZE..(plane + 1) * PLANE_SIZE].fill(value);
    }

    fn mark(&mut self, plane: usize, squares: Bitboard) {
        for sq in squares {
            self.data[plane * PLANE_SIZE + sq.index()] = 1.0;
        }
    }
}

impl Index<(usize, usize)> for InputTensor {
    type Output = f32;

    /// Index by `(plane, square)`.
    fn index(&self, (plane, square): (usize, usize)) -> &f32 {
        &self.data[plane * PLANE_SIZE + square]
    }
}

impl std::fmt::Debug for InputTensor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let nonzero = self.data.iter().filter(|&&v| v != 0.0).count();
        write!(f, "InputTensor({PLANES}x{PLANE_SIZE}, {nonzero} nonzero)")
    }
}

/// Build the input tensor for `state`.
///
/// Fails with [`NetError::MissingRepetitionKey`] when neither the position
/// nor its mirror has a repetition entry.
pub fn build_input_tensor(state: &PositionState) -> Result<InputTensor, NetError> {
    let board = state.board();
    let mut tensor = InputTensor::zeros();

    for color in Color::ALL {
        for kind in PieceKind::ALL {
            let plane = color.index() * PieceKind::COUNT + kind.index();
            tensor.mark(plane, board.pieces_of(color, kind));
        }
    }

    let repetitions = state.current_repetitions()? as f32 / REPETITION_NORM;
    tensor.fill(REPETITION_PLANE, repetitions);
    tensor.fill(REPETITION_PLANE + 1, repetitions);

    for color in Color::ALL {
        for kind in PieceKind::POCKET {
            let plane = POCKET_PLANE + color.index() * PieceKind::POCKET_COUNT + kind.index();
            tensor.fill(plane, f32::from(board.pocket_count(color, kind)) / POCKET_NORM);
        }
        tensor.mark(PROMOTED_PLANE + color.index(), board.promoted() & board.side(color));
    }

    if let Some(sq) = board.en_passant() {
        tensor.mark(EN_PASSANT_PLANE, sq.bitboard());
    }

    if board.side_to_move() == Color::White {
        tensor.fill(COLOR_PLANE, 1.0);
    }

    tensor.fill(FULLMOVE_PLANE, f32::from(board.fullmove_number()) / REPETITION_NORM);

    fill_castling(&mut tensor, board);

    tensor.fill(HALFMOVE_PLANE, f32::from(board.halfmove_clock()) / HALFMOVE_NORM);

    Ok(tensor)
}

fn fill_castling(tensor: &mut InputTensor, board: &Board) {
    let rights = [
        (Color::White, CastleSide::KingSide),
        (Color::White, CastleSide::QueenSide),
        (Color::Black, CastleSide::KingSide),
        (Color::Black, CastleSide::QueenSide),
    ];
    for (offset, (color, side)) in rights.into_iter().enumerate() {
        if board.castling().has(color, side) {
            tensor.fill(CASTLING_PLANE + offset, 1.0);
        }
    }
}
