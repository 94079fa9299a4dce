//! Crazyhouse rules core: board representation, pockets, FEN, and move execution.

mod bitboard;
mod board;
mod castle_rights;
mod chess_move;
mod color;
mod error;
mod fen;
mod make_move;
mod piece;
mod piece_kind;
mod square;

pub use bitboard::Bitboard;
pub use board::{Board, Pocket, PrettyBoard};
pub use castle_rights::{CastleRights, CastleSide};
pub use chess_move::{Move, MoveKind, PromotionPiece};
pub use color::Color;
pub use error::{BoardError, FenError};
pub use fen::STARTING_FEN;
pub use piece::Piece;
pub use piece_kind::PieceKind;
pub use square::Square;
