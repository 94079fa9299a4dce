//! The Crazyhouse board: placement, pockets, promoted mask, side to move,
//! castling, en passant, and move counters.

use std::fmt;

use crate::bitboard::Bitboard;
use crate::castle_rights::CastleRights;
use crate::color::Color;
use crate::error::BoardError;
use crate::piece::Piece;
use crate::piece_kind::PieceKind;
use crate::square::Square;

/// Back-rank layout from the a-file to the h-file.
const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// Pocket contents per side, indexed by [`PieceKind::index()`] for pawn..queen.
pub type Pocket = [u8; PieceKind::POCKET_COUNT];

/// Complete Crazyhouse position state.
///
/// The board is a plain value: copying it is the "compute-copy" operation and
/// [`Board::make_move`] returns a new board rather than mutating this one.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Board {
    /// Bitboard for each piece kind, indexed by [`PieceKind::index()`].
    pieces: [Bitboard; PieceKind::COUNT],
    /// Bitboard for each side, indexed by [`Color::index()`].
    sides: [Bitboard; Color::COUNT],
    /// Union of both sides.
    occupied: Bitboard,
    /// Captured pieces available for dropping, indexed by [`Color::index()`].
    pockets: [Pocket; Color::COUNT],
    /// Squares holding a piece that started life as a pawn.
    promoted: Bitboard,
    side_to_move: Color,
    castling: CastleRights,
    en_passant: Option<Square>,
    /// Halfmove clock for the fifty-move rule.
    halfmove_clock: u16,
    /// Fullmove number (starts at 1, incremented after Black moves).
    fullmove_number: u16,
}

impl Board {
    /// Return a board with no pieces, empty pockets and White to move.
    pub(crate) fn empty() -> Board {
        Board {
            pieces: [Bitboard::EMPTY; PieceKind::COUNT],
            sides: [Bitboard::EMPTY; Color::COUNT],
            occupied: Bitboard::EMPTY,
            pockets: [[0; PieceKind::POCKET_COUNT]; Color::COUNT],
            promoted: Bitboard::EMPTY,
            side_to_move: Color::White,
            castling: CastleRights::NONE,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    /// Return the standard starting position with empty pockets.
    pub fn starting_position() -> Board {
        let mut board = Board::empty();
        for (file, &kind) in BACK_RANK.iter().enumerate() {
            let file = file as i32;
            for (color, back, pawns) in [(Color::White, 0, 1), (Color::Black, 7, 6)] {
                if let Some(sq) = Square::from_coords(file, back) {
                    board.toggle_piece(sq, kind, color);
                }
                if let Some(sq) = Square::from_coords(file, pawns) {
                    board.toggle_piece(sq, PieceKind::Pawn, color);
                }
            }
        }
        board.castling = CastleRights::ALL;
        board
    }

    /// Return the piece kind on the given square, if any.
    pub fn piece_on(&self, sq: Square) -> Option<PieceKind> {
        PieceKind::ALL
            .into_iter()
            .find(|&kind| self.pieces[kind.index()].contains(sq))
    }

    /// Return the color of the piece on the given square, if any.
    pub fn color_on(&self, sq: Square) -> Option<Color> {
        Color::ALL
            .into_iter()
            .find(|&color| self.sides[color.index()].contains(sq))
    }

    /// Return the colored piece on the given square, if any.
    pub fn colored_piece_on(&self, sq: Square) -> Option<Piece> {
        Some(Piece::new(self.piece_on(sq)?, self.color_on(sq)?))
    }

    /// Return the bitboard for the given piece kind (both colors).
    #[inline]
    pub fn pieces(&self, kind: PieceKind) -> Bitboard {
        self.pieces[kind.index()]
    }

    /// Return the bitboard for the given side.
    #[inline]
    pub fn side(&self, color: Color) -> Bitboard {
        self.sides[color.index()]
    }

    /// Return the squares holding `color`'s pieces of `kind`.
    #[inline]
    pub fn pieces_of(&self, color: Color, kind: PieceKind) -> Bitboard {
        self.pieces[kind.index()] & self.sides[color.index()]
    }

    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.occupied
    }

    #[inline]
    pub fn is_occupied(&self, sq: Square) -> bool {
        self.occupied.contains(sq)
    }

    /// Return how many pieces of `kind` sit in `color`'s pocket.
    ///
    /// Kings are never pocketed, so the king count is always zero.
    #[inline]
    pub fn pocket_count(&self, color: Color, kind: PieceKind) -> u8 {
        if kind.is_droppable() {
            self.pockets[color.index()][kind.index()]
        } else {
            0
        }
    }

    /// Return the full pocket of `color`.
    #[inline]
    pub fn pocket(&self, color: Color) -> Pocket {
        self.pockets[color.index()]
    }

    /// Return the squares holding promoted pieces, either color.
    #[inline]
    pub fn promoted(&self) -> Bitboard {
        self.promoted
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn castling(&self) -> CastleRights {
        self.castling
    }

    #[inline]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    #[inline]
    pub fn halfmove_clock(&self) -> u16 {
        self.halfmove_clock
    }

    #[inline]
    pub fn fullmove_number(&self) -> u16 {
        self.fullmove_number
    }

    /// Return the same position seen from the other side.
    ///
    /// Ranks are reflected, piece colors and pockets are swapped, castling
    /// rights change owner, and the side to move flips. Move counters are kept.
    pub fn mirror(&self) -> Board {
        let mut mirrored = Board::empty();
        for color in Color::ALL {
            for kind in PieceKind::ALL {
                for sq in self.pieces_of(color, kind) {
                    mirrored.toggle_piece(sq.flip_vertical(), kind, color.flip());
                }
            }
        }
        mirrored.pockets = [
            self.pockets[Color::Black.index()],
            self.pockets[Color::White.index()],
        ];
        mirrored.promoted = self.promoted.flip_vertical();
        mirrored.side_to_move = self.side_to_move.flip();
        mirrored.castling = self.castling.swap_colors();
        mirrored.en_passant = self.en_passant.map(Square::flip_vertical);
        mirrored.halfmove_clock = self.halfmove_clock;
        mirrored.fullmove_number = self.fullmove_number;
        mirrored
    }

    /// Toggle a piece into/out of the board arrays via XOR.
    #[inline]
    pub(crate) fn toggle_piece(&mut self, sq: Square, kind: PieceKind, color: Color) {
        let mask = sq.bitboard();
        self.pieces[kind.index()] = self.pieces[kind.index()] ^ mask;
        self.sides[color.index()] = self.sides[color.index()] ^ mask;
        self.occupied = self.sides[Color::White.index()] | self.sides[Color::Black.index()];
    }

    /// Add one piece of `kind` to `color`'s pocket.
    #[inline]
    pub(crate) fn pocket_add(&mut self, color: Color, kind: PieceKind) {
        if kind.is_droppable() {
            let slot = &mut self.pockets[color.index()][kind.index()];
            *slot = slot.saturating_add(1);
        }
    }

    /// Remove one piece of `kind` from `color`'s pocket.
    ///
    /// Returns `false` (and changes nothing) if the pocket holds none.
    #[inline]
    pub(crate) fn pocket_take(&mut self, color: Color, kind: PieceKind) -> bool {
        if !kind.is_droppable() {
            return false;
        }
        let slot = &mut self.pockets[color.index()][kind.index()];
        match slot.checked_sub(1) {
            Some(rest) => {
                *slot = rest;
                true
            }
            None => false,
        }
    }

    #[inline]
    pub(crate) fn set_pocket(&mut self, color: Color, pocket: Pocket) {
        self.pockets[color.index()] = pocket;
    }

    #[inline]
    pub(crate) fn set_promoted(&mut self, promoted: Bitboard) {
        self.promoted = promoted;
    }

    #[inline]
    pub(crate) fn set_en_passant(&mut self, sq: Option<Square>) {
        self.en_passant = sq;
    }

    #[inline]
    pub(crate) fn set_castling(&mut self, rights: CastleRights) {
        self.castling = rights;
    }

    #[inline]
    pub(crate) fn set_halfmove_clock(&mut self, clock: u16) {
        self.halfmove_clock = clock;
    }

    #[inline]
    pub(crate) fn set_side_to_move(&mut self, color: Color) {
        self.side_to_move = color;
    }

    #[inline]
    pub(crate) fn set_fullmove_number(&mut self, number: u16) {
        self.fullmove_number = number;
    }

    /// Validate the structural integrity of the board.
    pub fn validate(&self) -> Result<(), BoardError> {
        for color in Color::ALL {
            let king_count = self.pieces_of(color, PieceKind::King).count();
            if king_count != 1 {
                let color_name = match color {
                    Color::White => "white",
                    Color::Black => "black",
                };
                return Err(BoardError::InvalidKingCount {
                    color: color_name,
                    count: king_count,
                });
            }
        }

        let back_ranks = Bitboard::RANK_1 | Bitboard::RANK_8;
        if (self.pieces(PieceKind::Pawn) & back_ranks).is_nonempty() {
            return Err(BoardError::PawnsOnBackRank);
        }

        let pocketed: u32 = self
            .pockets
            .iter()
            .flat_map(|pocket| pocket.iter())
            .map(|&n| u32::from(n))
            .sum();
        let count = self.occupied.count() + pocketed;
        if count > 32 {
            return Err(BoardError::TooMuchMaterial { count });
        }

        let promotable = self.occupied & !self.pieces(PieceKind::King);
        if (self.promoted & !promotable).is_nonempty() {
            return Err(BoardError::StrayPromotedMark);
        }

        Ok(())
    }

    /// Return a pretty-printable wrapper for this board.
    pub fn pretty(&self) -> PrettyBoard<'_> {
        PrettyBoard(self)
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board(\"{}\")", self)
    }
}

/// Wrapper for pretty-printing a board as an 8x8 grid followed by both pockets.
pub struct PrettyBoard<'a>(&'a Board);

impl fmt::Display for PrettyBoard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let board = self.0;
        for rank in (0..8).rev() {
            write!(f, "{}  ", rank + 1)?;
            for file in 0..8 {
                let c = Square::from_coords(file, rank)
                    .and_then(|sq| board.colored_piece_on(sq))
                    .map_or('.', Piece::fen_char);
                if file < 7 {
                    write!(f, "{c} ")?;
                } else {
                    write!(f, "{c}")?;
                }
            }
            writeln!(f)?;
        }
        writeln!(f, "   a b c d e f g h")?;
        for color in Color::ALL {
            write!(f, "{color}: ")?;
            for kind in PieceKind::POCKET {
                for _ in 0..board.pocket_count(color, kind) {
                    write!(f, "{}", Piece::new(kind, color))?;
                }
            }
            if color == Color::White {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
