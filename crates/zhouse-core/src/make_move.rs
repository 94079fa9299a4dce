//! Move execution via copy-make, with Crazyhouse pocket bookkeeping.

use crate::board::Board;
use crate::castle_rights::CastleRights;
use crate::chess_move::{Move, MoveKind};
use crate::color::Color;
use crate::piece_kind::PieceKind;
use crate::square::Square;
use tracing::trace;

/// Maps each square index to the castling rights that must be removed when
/// that square is the source or destination of any move.
const CASTLE_RIGHTS_REVOKE: [CastleRights; 64] = {
    let mut table = [CastleRights::NONE; 64];
    table[Square::E1.index()] = CastleRights::WHITE_BOTH;
    table[Square::A1.index()] = CastleRights::WHITE_QUEEN;
    table[Square::H1.index()] = CastleRights::WHITE_KING;
    table[Square::E8.index()] = CastleRights::BLACK_BOTH;
    table[Square::A8.index()] = CastleRights::BLACK_QUEEN;
    table[Square::H8.index()] = CastleRights::BLACK_KING;
    table
};

impl Board {
    /// Apply a move and return the resulting board. Copy-make: `self` is not modified.
    ///
    /// Legality is not checked. A move whose source square is empty, or a drop
    /// of a piece the mover does not hold (or of a king), returns the board unchanged.
    pub fn make_move(&self, mv: Move) -> Board {
        let mut b = *self;
        let us = b.side_to_move();
        let them = us.flip();
        let src = mv.source();
        let dst = mv.dest();

        let moving_piece = if mv.is_drop() {
            match mv.drop_piece() {
                Some(kind) if !b.is_occupied(dst) && b.pocket_take(us, kind) => kind,
                _ => {
                    trace!(mv = %mv, "drop not playable, board unchanged");
                    return *self;
                }
            }
        } else {
            match b.piece_on(src) {
                Some(kind) => kind,
                None => {
                    trace!(mv = %mv, "no piece on source square, board unchanged");
                    return b;
                }
            }
        };

        b.set_en_passant(None);

        // Castling moves the king onto an empty square, so a piece on `dst`
        // is always an enemy capture.
        let is_capture = b.occupied().contains(dst) && !mv.is_castle();
        if is_capture {
            b.capture_on(dst, them);
        }

        match mv.kind() {
            MoveKind::Normal => {
                b.relocate(src, dst, moving_piece, us);

                if moving_piece == PieceKind::Pawn && dst.index().abs_diff(src.index()) == 16 {
                    let ep_idx = (src.index() + dst.index()) / 2;
                    b.set_en_passant(Square::from_index(ep_idx as u8));
                }
            }

            MoveKind::Promotion => {
                b.toggle_piece(src, PieceKind::Pawn, us);
                let promo_kind = mv
                    .promotion()
                    .map_or(PieceKind::Queen, |p| p.to_piece_kind());
                b.toggle_piece(dst, promo_kind, us);
                b.set_promoted(b.promoted().with(dst));
            }

            MoveKind::EnPassant => {
                b.relocate(src, dst, PieceKind::Pawn, us);

                // The captured pawn stands beside `src`, on `dst`'s file.
                if let Some(captured_sq) = Square::from_coords(i32::from(dst.file()), i32::from(src.rank())) {
                    b.capture_on(captured_sq, them);
                }
            }

            MoveKind::Castling => {
                b.relocate(src, dst, PieceKind::King, us);

                let (rook_src, rook_dst) = match dst {
                    Square::G1 => (Square::H1, Square::F1),
                    Square::C1 => (Square::A1, Square::D1),
                    Square::G8 => (Square::H8, Square::F8),
                    Square::C8 => (Square::A8, Square::D8),
                    _ => return b,
                };
                b.relocate(rook_src, rook_dst, PieceKind::Rook, us);
            }

            MoveKind::Drop => {
                b.toggle_piece(dst, moving_piece, us);
            }
        }

        let new_castling = b
            .castling()
            .remove(CASTLE_RIGHTS_REVOKE[src.index()])
            .remove(CASTLE_RIGHTS_REVOKE[dst.index()]);
        b.set_castling(new_castling);

        // Pawn moves and captures reset the fifty-move clock. Drops never do.
        let pawn_push = moving_piece == PieceKind::Pawn && !mv.is_drop();
        if pawn_push || is_capture || mv.is_en_passant() {
            b.set_halfmove_clock(0);
        } else {
            b.set_halfmove_clock(b.halfmove_clock().saturating_add(1));
        }

        b.set_side_to_move(them);

        if us == Color::Black {
            b.set_fullmove_number(b.fullmove_number().saturating_add(1));
        }

        b
    }

    /// Remove `victim`'s piece on `sq` and hand it to the other side's pocket.
    ///
    /// Promoted pieces revert to pawns when pocketed.
    fn capture_on(&mut self, sq: Square, victim: Color) {
        let Some(kind) = self.piece_on(sq) else {
            return;
        };
        self.toggle_piece(sq, kind, victim);
        let pocketed = if self.promoted().contains(sq) {
            self.set_promoted(self.promoted().without(sq));
            PieceKind::Pawn
        } else {
            kind
        };
        self.pocket_add(victim.flip(), pocketed);
    }

    /// Move a piece between squares, carrying its promoted mark along.
    fn relocate(&mut self, src: Square, dst: Square, kind: PieceKind, color: Color) {
        self.toggle_piece(src, kind, color);
        self.toggle_piece(dst, kind, color);
        if self.promoted().contains(src) {
            self.set_promoted(self.promoted().without(src).with(dst));
        }
    }
}
