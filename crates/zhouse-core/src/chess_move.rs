//! Move representation, bit-packed into a u32, with UCI parsing.

use std::fmt;

use crate::board::Board;
use crate::piece_kind::PieceKind;
use crate::square::Square;

const SRC_MASK: u32 = 0x0000_003F;
const DST_MASK: u32 = 0x0000_0FC0;
const PIECE_MASK: u32 = 0x0000_7000;
const KIND_MASK: u32 = 0x0003_8000;
const DST_SHIFT: u32 = 6;
const PIECE_SHIFT: u32 = 12;
const KIND_SHIFT: u32 = 15;

/// The category of a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MoveKind {
    Normal = 0,
    Promotion = 1,
    EnPassant = 2,
    Castling = 3,
    /// A piece taken from the mover's pocket and placed on an empty square.
    Drop = 4,
}

impl MoveKind {
    const fn bits(self) -> u32 {
        (self as u32) << KIND_SHIFT
    }
}

/// The piece a pawn promotes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PromotionPiece {
    Knight = 0,
    Bishop = 1,
    Rook = 2,
    Queen = 3,
}

impl PromotionPiece {
    /// All promotion pieces in index order.
    pub const ALL: [PromotionPiece; 4] = [
        PromotionPiece::Knight,
        PromotionPiece::Bishop,
        PromotionPiece::Rook,
        PromotionPiece::Queen,
    ];

    /// Convert to the corresponding [`PieceKind`].
    pub const fn to_piece_kind(self) -> PieceKind {
        match self {
            PromotionPiece::Knight => PieceKind::Knight,
            PromotionPiece::Bishop => PieceKind::Bishop,
            PromotionPiece::Rook => PieceKind::Rook,
            PromotionPiece::Queen => PieceKind::Queen,
        }
    }

    /// Inverse of [`PromotionPiece::to_piece_kind`]; `None` for pawn and king.
    pub const fn from_piece_kind(kind: PieceKind) -> Option<PromotionPiece> {
        match kind {
            PieceKind::Knight => Some(PromotionPiece::Knight),
            PieceKind::Bishop => Some(PromotionPiece::Bishop),
            PieceKind::Rook => Some(PromotionPiece::Rook),
            PieceKind::Queen => Some(PromotionPiece::Queen),
            PieceKind::Pawn | PieceKind::King => None,
        }
    }

    /// Return the UCI character for this promotion.
    pub const fn uci_char(self) -> char {
        self.to_piece_kind().fen_char()
    }
}

/// A move encoded in 32 bits.
///
/// ```text
/// bits  0-5:  source square      (0-63; equals destination for drops)
/// bits  6-11: destination square (0-63)
/// bits 12-14: piece              (promotion piece, or dropped PieceKind index)
/// bits 15-17: move kind          (Normal, Promotion, EnPassant, Castling, Drop)
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move(u32);

impl Move {
    /// Null move sentinel (A1→A1, Normal). Never a legal move.
    pub const NULL: Move = Move(0);

    const fn pack(source: Square, dest: Square, piece: u32, kind: MoveKind) -> Move {
        Move(
            (source.index() as u32)
                | ((dest.index() as u32) << DST_SHIFT)
                | (piece << PIECE_SHIFT)
                | kind.bits(),
        )
    }

    /// Create a normal (quiet or capture) move.
    pub const fn new(source: Square, dest: Square) -> Move {
        Move::pack(source, dest, 0, MoveKind::Normal)
    }

    /// Create a promotion move.
    pub const fn new_promotion(source: Square, dest: Square, promo: PromotionPiece) -> Move {
        Move::pack(source, dest, promo as u32, MoveKind::Promotion)
    }

    /// Create an en passant capture.
    pub const fn new_en_passant(source: Square, dest: Square) -> Move {
        Move::pack(source, dest, 0, MoveKind::EnPassant)
    }

    /// Create a castling move using the king's source and destination squares.
    pub const fn new_castle(king_src: Square, king_dst: Square) -> Move {
        Move::pack(king_src, king_dst, 0, MoveKind::Castling)
    }

    /// Create a drop of `kind` onto `square`.
    ///
    /// A king drop is still packed, but [`Move::drop_piece`] reports `None`
    /// for it and the board ignores it.
    pub const fn new_drop(kind: PieceKind, square: Square) -> Move {
        Move::pack(square, square, kind as u32, MoveKind::Drop)
    }

    /// Extract the source square. For drops this is the drop square.
    pub const fn source(self) -> Square {
        Square::from_index_unchecked((self.0 & SRC_MASK) as u8)
    }

    /// Extract the destination square.
    pub const fn dest(self) -> Square {
        Square::from_index_unchecked(((self.0 & DST_MASK) >> DST_SHIFT) as u8)
    }

    /// Extract the move kind.
    pub const fn kind(self) -> MoveKind {
        match (self.0 & KIND_MASK) >> KIND_SHIFT {
            0 => MoveKind::Normal,
            1 => MoveKind::Promotion,
            2 => MoveKind::EnPassant,
            3 => MoveKind::Castling,
            _ => MoveKind::Drop,
        }
    }

    const fn piece_bits(self) -> u32 {
        (self.0 & PIECE_MASK) >> PIECE_SHIFT
    }

    /// Return the promotion piece, if this is a promotion.
    pub const fn promotion(self) -> Option<PromotionPiece> {
        if !self.is_promotion() {
            return None;
        }
        Some(match self.piece_bits() {
            0 => PromotionPiece::Knight,
            1 => PromotionPiece::Bishop,
            2 => PromotionPiece::Rook,
            _ => PromotionPiece::Queen,
        })
    }

    /// Return the dropped piece kind, if this is a drop of a droppable piece.
    pub const fn drop_piece(self) -> Option<PieceKind> {
        if !self.is_drop() {
            return None;
        }
        match self.piece_bits() {
            0 => Some(PieceKind::Pawn),
            1 => Some(PieceKind::Knight),
            2 => Some(PieceKind::Bishop),
            3 => Some(PieceKind::Rook),
            4 => Some(PieceKind::Queen),
            _ => None,
        }
    }

    /// Return `true` if this is the null move.
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    /// Return `true` if this is a promotion.
    pub const fn is_promotion(self) -> bool {
        (self.0 & KIND_MASK) >> KIND_SHIFT == MoveKind::Promotion as u32
    }

    /// Return `true` if this is an en passant capture.
    pub const fn is_en_passant(self) -> bool {
        (self.0 & KIND_MASK) >> KIND_SHIFT == MoveKind::EnPassant as u32
    }

    /// Return `true` if this is a castling move.
    pub const fn is_castle(self) -> bool {
        (self.0 & KIND_MASK) >> KIND_SHIFT == MoveKind::Castling as u32
    }

    /// Return `true` if this is a pocket drop, including a king drop.
    pub const fn is_drop(self) -> bool {
        (self.0 & KIND_MASK) >> KIND_SHIFT == MoveKind::Drop as u32
    }

    /// Parse a UCI move string against `board`.
    ///
    /// The board decides the move kind: a king stepping two files is castling,
    /// a pawn moving diagonally onto the en passant square captures en passant.
    /// Drops are written `N@e4` (piece letter in either case). Returns `None`
    /// for malformed text; legality is not checked.
    pub fn from_uci(text: &str, board: &Board) -> Option<Move> {
        if let Some((piece, square)) = text.split_once('@') {
            let mut chars = piece.chars();
            let kind = PieceKind::from_fen_char(chars.next()?)?;
            if chars.next().is_some() || !kind.is_droppable() {
                return None;
            }
            return Some(Move::new_drop(kind, Square::from_algebraic(square)?));
        }

        let source = Square::from_algebraic(text.get(0..2)?)?;
        let dest = Square::from_algebraic(text.get(2..4)?)?;
        match text.get(4..) {
            Some("") => {}
            Some(promo) => {
                let mut chars = promo.chars();
                let kind = PieceKind::from_fen_char(chars.next()?)?;
                if chars.next().is_some() {
                    return None;
                }
                return Some(Move::new_promotion(
                    source,
                    dest,
                    PromotionPiece::from_piece_kind(kind)?,
                ));
            }
            None => return None,
        }

        Some(Move::infer(source, dest, board))
    }

    /// Build a non-promotion, non-drop move from its squares, letting `board`
    /// decide whether it is castling or en passant.
    pub fn infer(source: Square, dest: Square, board: &Board) -> Move {
        let file_step = source.file().abs_diff(dest.file());
        match board.piece_on(source) {
            Some(PieceKind::King) if file_step == 2 && source.rank() == dest.rank() => {
                Move::new_castle(source, dest)
            }
            Some(PieceKind::Pawn)
                if file_step == 1 && board.en_passant() == Some(dest) && !board.is_occupied(dest) =>
            {
                Move::new_en_passant(source, dest)
            }
            _ => Move::new(source, dest),
        }
    }

    /// Return the UCI string representation.
    pub fn to_uci(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "0000")
        } else if let Some(kind) = self.drop_piece() {
            let letter = kind.fen_char().to_ascii_uppercase();
            write!(f, "{letter}@{}", self.dest())
        } else if let Some(promo) = self.promotion() {
            write!(f, "{}{}{}", self.source(), self.dest(), promo.uci_char())
        } else {
            write!(f, "{}{}", self.source(), self.dest())
        }
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({} kind={:?})", self, self.kind())
    }
}
