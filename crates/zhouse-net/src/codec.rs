//! Bidirectional mapping between moves and flat action indices.
//!
//! Every source square owns 81 local codes:
//!
//! ```text
//!  0..56   slides    direction * 7 + (steps - 1)
//! 56..64   knights   56 + offset index
//! 64..76   promotion 64 + (|diff| - 7) + (piece number - 2) * 3
//! 76..81   drops     76 + (piece number - 1)
//! ```
//!
//! and `index = source * 81 + local_code`. Drops use the drop square as the
//! source.

use tracing::trace;
use zhouse_core::{Board, Color, Move, PieceKind, PromotionPiece, Square};

use crate::error::NetError;

/// Local codes available to each source square.
pub const MOVES_PER_SQUARE: usize = 81;

/// Total number of action indices.
pub const ACTION_SPACE: usize = Square::COUNT * MOVES_PER_SQUARE;

const SLIDE_STEPS: usize = 7;
const KNIGHT_BASE: usize = 56;
const PROMOTION_BASE: usize = 64;
const DROP_BASE: usize = 76;

/// Raw square differences of the eight knight jumps, in code order.
pub const KNIGHT_OFFSETS: [i32; 8] = [15, 17, -17, -15, 6, -10, 10, -6];

/// Compass direction of a slide, in code order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Direction {
    Up = 0,
    Down = 1,
    Left = 2,
    Right = 3,
    UpLeft = 4,
    UpRight = 5,
    DownLeft = 6,
    DownRight = 7,
}

impl Direction {
    /// All directions in code order.
    pub const ALL: [Direction; 8] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
        Direction::UpLeft,
        Direction::UpRight,
        Direction::DownLeft,
        Direction::DownRight,
    ];

    /// Return the code-order index of this direction.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Unit step as `(file_delta, rank_delta)`.
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, 1),
            Direction::Down => (0, -1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::UpLeft => (-1, 1),
            Direction::UpRight => (1, 1),
            Direction::DownLeft => (-1, -1),
            Direction::DownRight => (1, -1),
        }
    }

    /// Classify the direction from `from` to `to` by comparing files and ranks.
    ///
    /// Returns `None` when the squares are equal. Squares that are not on a
    /// common line still get the quadrant's diagonal.
    pub fn between(from: Square, to: Square) -> Option<Direction> {
        use std::cmp::Ordering::{Equal, Greater, Less};

        match (to.file().cmp(&from.file()), to.rank().cmp(&from.rank())) {
            (Equal, Greater) => Some(Direction::Up),
            (Equal, Less) => Some(Direction::Down),
            (Less, Equal) => Some(Direction::Left),
            (Greater, Equal) => Some(Direction::Right),
            (Less, Greater) => Some(Direction::UpLeft),
            (Greater, Greater) => Some(Direction::UpRight),
            (Less, Less) => Some(Direction::DownLeft),
            (Greater, Less) => Some(Direction::DownRight),
            (Equal, Equal) => None,
        }
    }
}

/// A move described by its geometry alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveShape {
    /// Queen-like move of 1..=7 steps.
    Slide {
        source: Square,
        direction: Direction,
        steps: u8,
    },
    /// Knight jump; `offset` indexes [`KNIGHT_OFFSETS`].
    KnightJump { source: Square, offset: u8 },
    /// Pawn promotion; `diff` is the absolute square difference (7, 8 or 9).
    Promotion {
        source: Square,
        diff: u8,
        piece: PromotionPiece,
    },
    /// Pocket drop onto `square`.
    Drop { square: Square, piece: PieceKind },
}

impl MoveShape {
    /// Classify `mv`. Drops are checked first, then promotions, knight jumps
    /// and finally slides.
    pub fn classify(mv: Move) -> Result<MoveShape, NetError> {
        let source = mv.source();
        let dest = mv.dest();
        let invalid = NetError::InvalidMoveShape {
            from: source,
            to: dest,
        };

        if mv.is_drop() {
            let piece = mv.drop_piece().ok_or(invalid)?;
            return Ok(MoveShape::Drop {
                square: dest,
                piece,
            });
        }

        let diff = dest.index() as i32 - source.index() as i32;

        if let Some(piece) = mv.promotion() {
            let abs = diff.unsigned_abs();
            if !(7..=9).contains(&abs) {
                return Err(invalid);
            }
            return Ok(MoveShape::Promotion {
                source,
                diff: abs as u8,
                piece,
            });
        }

        if let Some(offset) = KNIGHT_OFFSETS.iter().position(|&o| o == diff) {
            return Ok(MoveShape::KnightJump {
                source,
                offset: offset as u8,
            });
        }

        let direction = Direction::between(source, dest).ok_or_else(|| invalid.clone())?;
        let (df, dr) = direction.delta();
        let steps = source.distance(dest);
        let aligned = Square::from_coords(
            i32::from(source.file()) + df * i32::from(steps),
            i32::from(source.rank()) + dr * i32::from(steps),
        ) == Some(dest);
        if !aligned {
            return Err(invalid);
        }

        Ok(MoveShape::Slide {
            source,
            direction,
            steps,
        })
    }

    /// Return the square the action index is rooted at.
    pub const fn source(&self) -> Square {
        match *self {
            MoveShape::Slide { source, .. }
            | MoveShape::KnightJump { source, .. }
            | MoveShape::Promotion { source, .. } => source,
            MoveShape::Drop { square, .. } => square,
        }
    }

    /// Return the code in `0..81` within the source square's block.
    pub const fn local_code(&self) -> usize {
        match *self {
            MoveShape::Slide {
                direction, steps, ..
            } => direction.index() * SLIDE_STEPS + (steps as usize - 1),
            MoveShape::KnightJump { offset, .. } => KNIGHT_BASE + offset as usize,
            MoveShape::Promotion { diff, piece, .. } => {
                PROMOTION_BASE
                    + (diff as usize - 7)
                    + (piece.to_piece_kind().number() as usize - 2) * 3
            }
            MoveShape::Drop { piece, .. } => DROP_BASE + piece.number() as usize - 1,
        }
    }

    /// Return the flat action index.
    pub const fn action_index(&self) -> usize {
        self.source().index() * MOVES_PER_SQUARE + self.local_code()
    }
}

/// Encode a move as its action index.
pub fn encode(mv: Move) -> Result<usize, NetError> {
    let shape = MoveShape::classify(mv)?;
    let index = shape.action_index();
    trace!(mv = %mv, ?shape, index, "encoded move");
    Ok(index)
}

/// Decode an action index into a move for `side_to_move`.
///
/// The side to move only orients promotion offsets: +1 for White, -1 for
/// Black. Slides and knight jumps come back as [`Move::new`]; use
/// [`decode_on`] to recover castling and en passant from a board.
pub fn decode(index: usize, side_to_move: Color) -> Result<Move, NetError> {
    if index >= ACTION_SPACE {
        return Err(NetError::IndexOutOfRange { index });
    }

    let source_index = (index / MOVES_PER_SQUARE) as i32;
    let code = index % MOVES_PER_SQUARE;
    let source = square_at(source_index, index)?;

    let mv = if code < KNIGHT_BASE {
        let direction = Direction::ALL[code / SLIDE_STEPS];
        let steps = (code % SLIDE_STEPS + 1) as i32;
        let (df, dr) = direction.delta();
        let file = i32::from(source.file()) + df * steps;
        let rank = i32::from(source.rank()) + dr * steps;
        let dest = Square::from_coords(file, rank)
            .ok_or(NetError::InvalidGeometry { index, file, rank })?;
        Move::new(source, dest)
    } else if code < PROMOTION_BASE {
        let dest = source_index + KNIGHT_OFFSETS[code - KNIGHT_BASE];
        Move::new(source, square_at(dest, index)?)
    } else if code < DROP_BASE {
        let p = code - PROMOTION_BASE;
        let offset = (7 + (p % 3) as i32) * side_to_move.forward_sign();
        let dest = square_at(source_index + offset, index)?;
        let piece = PieceKind::from_number((p / 3) as u8 + 2)
            .and_then(PromotionPiece::from_piece_kind)
            .ok_or(NetError::IndexOutOfRange { index })?;
        Move::new_promotion(source, dest, piece)
    } else {
        let piece = PieceKind::from_number((code - DROP_BASE) as u8 + 1)
            .ok_or(NetError::IndexOutOfRange { index })?;
        Move::new_drop(piece, source)
    };

    trace!(index, mv = %mv, "decoded action");
    Ok(mv)
}

/// Decode an action index against `board`, oriented by its side to move.
///
/// Slides and knight jumps are re-typed by the board, so a two-file king
/// step comes back as castling and a diagonal pawn step onto the en passant
/// square comes back as an en passant capture.
pub fn decode_on(index: usize, board: &Board) -> Result<Move, NetError> {
    let mv = decode(index, board.side_to_move())?;
    if mv.is_promotion() || mv.is_drop() {
        Ok(mv)
    } else {
        Ok(Move::infer(mv.source(), mv.dest(), board))
    }
}

fn square_at(raw: i32, index: usize) -> Result<Square, NetError> {
    Square::from_signed(raw).ok_or(NetError::InvalidGeometry {
        index,
        file: raw.rem_euclid(8),
        rank: raw.div_euclid(8),
    })
}
