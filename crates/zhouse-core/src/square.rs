//! Board squares in little-endian rank-file order.

use std::fmt;

use crate::bitboard::Bitboard;

/// A square on the board, stored as `rank * 8 + file`.
///
/// A1 = 0, B1 = 1, ..., H8 = 63. Subtracting two square indices therefore
/// yields a delta whose value encodes the file and rank step between them,
/// which is what the action codec relies on.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Square(u8);

macro_rules! rank_squares {
    ($rank:expr; $a:ident, $b:ident, $c:ident, $d:ident, $e:ident, $f:ident, $g:ident, $h:ident) => {
        pub const $a: Square = Square($rank * 8);
        pub const $b: Square = Square($rank * 8 + 1);
        pub const $c: Square = Square($rank * 8 + 2);
        pub const $d: Square = Square($rank * 8 + 3);
        pub const $e: Square = Square($rank * 8 + 4);
        pub const $f: Square = Square($rank * 8 + 5);
        pub const $g: Square = Square($rank * 8 + 6);
        pub const $h: Square = Square($rank * 8 + 7);
    };
}

impl Square {
    /// Total number of squares.
    pub const COUNT: usize = 64;

    /// Create a square from zero-based file and rank coordinates.
    ///
    /// Returns `None` when either coordinate falls outside `0..8`, so callers
    /// stepping across the board get an explicit off-board signal instead of
    /// a wrapped index.
    #[inline]
    pub const fn from_coords(file: i32, rank: i32) -> Option<Square> {
        if file >= 0 && file < 8 && rank >= 0 && rank < 8 {
            Some(Square((rank * 8 + file) as u8))
        } else {
            None
        }
    }

    /// Create a square from a zero-based index, returning `None` if out of range.
    #[inline]
    pub const fn from_index(index: u8) -> Option<Square> {
        if index < 64 {
            Some(Square(index))
        } else {
            None
        }
    }

    /// Create a square from a signed index, returning `None` outside `0..64`.
    #[inline]
    pub const fn from_signed(index: i32) -> Option<Square> {
        if index >= 0 && index < 64 {
            Some(Square(index as u8))
        } else {
            None
        }
    }

    /// Create a square from a zero-based index without bounds checking.
    ///
    /// # Panics
    ///
    /// Debug-asserts that `index < 64`.
    #[inline]
    pub(crate) const fn from_index_unchecked(index: u8) -> Square {
        debug_assert!(index < 64);
        Square(index)
    }

    /// Parse an algebraic notation string (e.g. "e4") into a square.
    pub fn from_algebraic(s: &str) -> Option<Square> {
        match s.as_bytes() {
            [file @ b'a'..=b'h', rank @ b'1'..=b'8'] => {
                Square::from_coords(i32::from(file - b'a'), i32::from(rank - b'1'))
            }
            _ => None,
        }
    }

    /// Return the zero-based index (0..63).
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Return the file, 0 (a) through 7 (h).
    #[inline]
    pub const fn file(self) -> u8 {
        self.0 % 8
    }

    /// Return the rank, 0 (first rank) through 7 (eighth rank).
    #[inline]
    pub const fn rank(self) -> u8 {
        self.0 / 8
    }

    /// Return the square reflected across the horizontal midline (a1 ↔ a8).
    #[inline]
    pub const fn flip_vertical(self) -> Square {
        Square(self.0 ^ 56)
    }

    /// Return the king-move (Chebyshev) distance to `other`.
    #[inline]
    pub const fn distance(self, other: Square) -> u8 {
        let df = self.file().abs_diff(other.file());
        let dr = self.rank().abs_diff(other.rank());
        if df > dr { df } else { dr }
    }

    /// Return a bitboard with only this square set.
    #[inline]
    pub const fn bitboard(self) -> Bitboard {
        Bitboard::new(1u64 << self.0)
    }

    /// Iterate over all 64 squares in index order (A1, B1, ..., H8).
    pub fn all() -> impl Iterator<Item = Square> {
        (0u8..64).map(Square)
    }

    rank_squares!(0; A1, B1, C1, D1, E1, F1, G1, H1);
    rank_squares!(1; A2, B2, C2, D2, E2, F2, G2, H2);
    rank_squares!(2; A3, B3, C3, D3, E3, F3, G3, H3);
    rank_squares!(3; A4, B4, C4, D4, E4, F4, G4, H4);
    rank_squares!(4; A5, B5, C5, D5, E5, F5, G5, H5);
    rank_squares!(5; A6, B6, C6, D6, E6, F6, G6, H6);
    rank_squares!(6; A7, B7, C7, D7, E7, F7, G7, H7);
    rank_squares!(7; A8, B8, C8, D8, E8, F8, G8, H8);
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = (b'a' + self.file()) as char;
        let rank = (b'1' + self.rank()) as char;
        write!(f, "{file}{rank}")
    }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Square({})", self)
    }
}
