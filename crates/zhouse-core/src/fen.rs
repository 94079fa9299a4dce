//! Crazyhouse FEN parsing and serialization for [`Board`], and the canonical
//! position key derived from it.
//!
//! The placement field may carry a bracketed pocket (`.../RNBQKBNR[Qnp]`) and
//! a `~` after any piece that was promoted from a pawn.

use std::fmt::{self, Write as _};
use std::str::FromStr;

use crate::bitboard::Bitboard;
use crate::board::{Board, Pocket};
use crate::castle_rights::CastleRights;
use crate::color::Color;
use crate::error::FenError;
use crate::piece::Piece;
use crate::piece_kind::PieceKind;
use crate::square::Square;

/// The FEN string for the standard starting position with empty pockets.
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR[] w KQkq - 0 1";

/// Pocket serialization order, strongest piece first.
const POCKET_ORDER: [PieceKind; 5] = [
    PieceKind::Queen,
    PieceKind::Rook,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Pawn,
];

impl FromStr for Board {
    type Err = FenError;

    fn from_str(fen: &str) -> Result<Board, FenError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() != 6 {
            return Err(FenError::WrongFieldCount {
                found: fields.len(),
            });
        }

        let mut board = Board::empty();

        let (placement, pocket_text) = match fields[0].split_once('[') {
            Some((placement, rest)) => {
                let pocket = rest.strip_suffix(']').ok_or_else(|| FenError::InvalidPocket {
                    found: rest.to_string(),
                })?;
                (placement, pocket)
            }
            None => (fields[0], ""),
        };

        parse_placement(placement, &mut board)?;
        let (white, black) = parse_pocket(pocket_text)?;
        board.set_pocket(Color::White, white);
        board.set_pocket(Color::Black, black);

        let side_to_move = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => {
                return Err(FenError::InvalidColor {
                    found: other.to_string(),
                })
            }
        };
        board.set_side_to_move(side_to_move);
        board.set_castling(CastleRights::from_fen(fields[2])?);

        let en_passant = if fields[3] == "-" {
            None
        } else {
            Some(
                Square::from_algebraic(fields[3]).ok_or_else(|| FenError::InvalidEnPassant {
                    found: fields[3].to_string(),
                })?,
            )
        };
        board.set_en_passant(en_passant);

        board.set_halfmove_clock(parse_counter(fields[4], "halfmove clock")?);
        board.set_fullmove_number(parse_counter(fields[5], "fullmove number")?);

        board.validate()?;
        Ok(board)
    }
}

fn parse_placement(placement: &str, board: &mut Board) -> Result<(), FenError> {
    let ranks: Vec<&str> = placement.split('/').collect();
    if ranks.len() != 8 {
        return Err(FenError::WrongRankCount { found: ranks.len() });
    }

    let mut promoted = Bitboard::EMPTY;

    for (rank_index, rank_str) in ranks.iter().enumerate() {
        // FEN ranks go from 8 to 1 (top to bottom)
        let rank = 7 - rank_index as i32;
        let mut file: i32 = 0;
        let mut last: Option<Square> = None;

        for c in rank_str.chars() {
            if c == '~' {
                let sq = last.take().ok_or(FenError::InvalidPieceChar { character: c })?;
                promoted = promoted.with(sq);
                continue;
            }
            if let Some(digit) = c.to_digit(10) {
                if !(1..=8).contains(&digit) {
                    return Err(FenError::InvalidPieceChar { character: c });
                }
                file += digit as i32;
                last = None;
                continue;
            }

            let piece = Piece::from_fen_char(c).ok_or(FenError::InvalidPieceChar { character: c })?;
            let sq = Square::from_coords(file, rank).ok_or(FenError::BadRankLength {
                rank_index,
                length: file as usize + 1,
            })?;
            board.toggle_piece(sq, piece.kind(), piece.color());
            last = Some(sq);
            file += 1;
        }

        if file != 8 {
            return Err(FenError::BadRankLength {
                rank_index,
                length: file as usize,
            });
        }
    }

    board.set_promoted(promoted);
    Ok(())
}

fn parse_pocket(text: &str) -> Result<(Pocket, Pocket), FenError> {
    let mut pockets = [[0u8; PieceKind::POCKET_COUNT]; Color::COUNT];
    for c in text.chars() {
        let piece = Piece::from_fen_char(c)
            .filter(|p| p.kind().is_droppable())
            .ok_or_else(|| FenError::InvalidPocket {
                found: text.to_string(),
            })?;
        let slot = &mut pockets[piece.color().index()][piece.kind().index()];
        *slot = slot.checked_add(1).ok_or_else(|| FenError::InvalidPocket {
            found: text.to_string(),
        })?;
    }
    Ok((pockets[Color::White.index()], pockets[Color::Black.index()]))
}

fn parse_counter(text: &str, field: &'static str) -> Result<u16, FenError> {
    text.parse::<u16>().map_err(|_| FenError::InvalidMoveCounter {
        field,
        found: text.to_string(),
    })
}

impl Board {
    /// Return the canonical key used for repetition detection.
    ///
    /// Placement (with promoted markers), bracketed pockets and the side to
    /// move. Castling, en passant and the move counters are left out, so two
    /// positions that differ only in those share a key.
    pub fn position_key(&self) -> String {
        let mut key = String::with_capacity(96);
        // Writing into a String cannot fail.
        let _ = self.write_placement(&mut key);
        let _ = write!(key, " {}", self.side_to_move());
        key
    }

    /// Write the placement field, including the bracketed pocket.
    fn write_placement(&self, out: &mut impl fmt::Write) -> fmt::Result {
        for rank in (0..8).rev() {
            let mut empty_count = 0u8;

            for file in 0..8 {
                let piece = Square::from_coords(file, rank)
                    .and_then(|sq| self.colored_piece_on(sq).map(|p| (sq, p)));
                match piece {
                    Some((sq, piece)) => {
                        if empty_count > 0 {
                            write!(out, "{empty_count}")?;
                            empty_count = 0;
                        }
                        write!(out, "{piece}")?;
                        if self.promoted().contains(sq) {
                            out.write_char('~')?;
                        }
                    }
                    None => empty_count += 1,
                }
            }

            if empty_count > 0 {
                write!(out, "{empty_count}")?;
            }
            if rank > 0 {
                out.write_char('/')?;
            }
        }

        out.write_char('[')?;
        for color in Color::ALL {
            for kind in POCKET_ORDER {
                for _ in 0..self.pocket_count(color, kind) {
                    write!(out, "{}", Piece::new(kind, color))?;
                }
            }
        }
        out.write_char(']')
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_placement(f)?;
        write!(f, " {} {}", self.side_to_move(), self.castling())?;
        match self.en_passant() {
            Some(sq) => write!(f, " {sq}")?,
            None => write!(f, " -")?,
        }
        write!(f, " {} {}", self.halfmove_clock(), self.fullmove_number())
    }
}

#[cfg(test)]
mod tests {
    use super::STARTING_FEN;
    use crate::board::Board;
    use crate::color::Color;
    use crate::error::FenError;
    use crate::piece_kind::PieceKind;
    use crate::square::Square;

    fn roundtrip(fen: &str) {
        let board: Board = fen.parse().unwrap();
        let output = format!("{board}");
        assert_eq!(output, fen, "FEN roundtrip failed");
        let board2: Board = output.parse().unwrap();
        assert_eq!(board, board2);
    }

    #[test]
    fn roundtrip_starting() {
        roundtrip(STARTING_FEN);
    }

    #[test]
    fn roundtrip_with_pockets_and_promoted() {
        roundtrip("r1b1k2r/ppp2ppp/2n5/3q4/3P4/8/PPP2PPP/R2QKB~1R[QNPbp] b KQkq - 0 9");
    }

    #[test]
    fn roundtrip_black_to_move_with_ep() {
        roundtrip("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR[] b KQkq e3 0 1");
    }

    #[test]
    fn plain_fen_parses_with_empty_pockets() {
        let board: Board = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
            .parse()
            .unwrap();
        assert_eq!(board, Board::starting_position());
        assert_eq!(format!("{board}"), STARTING_FEN);
    }

    #[test]
    fn pocket_counts_parsed() {
        let board: Board = "4k3/8/8/8/8/8/8/4K3[NNqp] w - - 0 1".parse().unwrap();
        assert_eq!(board.pocket_count(Color::White, PieceKind::Knight), 2);
        assert_eq!(board.pocket_count(Color::Black, PieceKind::Queen), 1);
        assert_eq!(board.pocket_count(Color::Black, PieceKind::Pawn), 1);
        assert_eq!(board.pocket_count(Color::White, PieceKind::Pawn), 0);
    }

    #[test]
    fn promoted_marker_parsed() {
        let board: Board = "4k2Q~/8/8/8/8/8/8/4K3[] w - - 0 1".parse().unwrap();
        assert!(board.promoted().contains(Square::H8));
        assert_eq!(board.promoted().count(), 1);
    }

    #[test]
    fn position_key_excludes_counters_and_rights() {
        let a: Board = "4k3/8/8/8/8/8/8/R3K3[n] w Q - 0 1".parse().unwrap();
        let b: Board = "4k3/8/8/8/8/8/8/R3K3[n] w - - 7 30".parse().unwrap();
        assert_eq!(a.position_key(), b.position_key());
        assert_eq!(a.position_key(), "4k3/8/8/8/8/8/8/R3K3[n] w");
    }

    #[test]
    fn position_key_distinguishes_side_to_move() {
        let white = Board::starting_position();
        let black = white.mirror();
        assert_ne!(white.position_key(), black.position_key());
        assert_eq!(
            white.position_key(),
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR[] w"
        );
    }

    #[test]
    fn error_wrong_field_count() {
        assert!(matches!(
            "e4 e5".parse::<Board>(),
            Err(FenError::WrongFieldCount { found: 2 })
        ));
    }

    #[test]
    fn error_invalid_piece_char() {
        let result = "rnbqkbnr/pppppppp/8/8/8/8/PPPPXPPP/RNBQKBNR[] w KQkq - 0 1".parse::<Board>();
        assert!(matches!(result, Err(FenError::InvalidPieceChar { character: 'X' })));
    }

    #[test]
    fn error_king_in_pocket() {
        let result = "4k3/8/8/8/8/8/8/4K3[K] w - - 0 1".parse::<Board>();
        assert!(matches!(result, Err(FenError::InvalidPocket { .. })));
    }

    #[test]
    fn error_unterminated_pocket() {
        let result = "4k3/8/8/8/8/8/8/4K3[Q w - - 0 1".parse::<Board>();
        assert!(matches!(result, Err(FenError::InvalidPocket { .. })));
    }

    #[test]
    fn error_dangling_promoted_marker() {
        let result = "4k3/8/8/8/8/8/8/~4K3[] w - - 0 1".parse::<Board>();
        assert!(result.is_err());
    }

    #[test]
    fn error_bad_rank_length() {
        let result = "rnbqkbnr/ppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR[] w KQkq - 0 1".parse::<Board>();
        assert!(result.is_err());
    }

    #[test]
    fn error_invalid_move_counter() {
        let result = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR[] w KQkq - abc 1".parse::<Board>();
        assert!(matches!(result, Err(FenError::InvalidMoveCounter { .. })));
    }
}
