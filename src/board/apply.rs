//! `apply_move` (§4.3): the single mutation path for a `Board`.

use crate::board::castling;
use crate::board::state::Board;
use crate::board::zobrist::{piece_key, ZOBRIST};
use crate::types::{Color, File, Move, PieceKind, Position, Rank};

/// Castling bit gated by a rook standing on (or being captured on) one of the
/// four corner squares, independent of which color's rook it is — a capture
/// on a1 always clears White's queenside right, even if a black piece was
/// sitting there (per §4.3 rule 5).
fn corner_right(square: Position) -> Option<u8> {
    match (square.file().index(), square.rank().index()) {
        (0, 0) => Some(castling::WHITE_QUEENSIDE),
        (7, 0) => Some(castling::WHITE_KINGSIDE),
        (0, 7) => Some(castling::BLACK_QUEENSIDE),
        (7, 7) => Some(castling::BLACK_KINGSIDE),
        _ => None,
    }
}

impl Board {
    /// Apply `mv` in place. A `from` square holding no piece is a no-op
    /// (observed source behavior, preserved per §9) rather than a panic or
    /// error — `apply_move` is infallible by contract (§7).
    pub fn apply_move(&mut self, mv: &Move) {
        let Some((color, kind)) = self.piece_at(mv.from) else {
            #[cfg(feature = "logging")]
            log::warn!(
                "apply_move: no piece on {}, move {} treated as a no-op",
                mv.from,
                mv
            );
            return;
        };

        // Un-apply the castling/en-passant hash contributions so they can be
        // re-applied once their post-move values are known.
        self.hash ^= ZOBRIST.castling[self.castling_rights as usize];
        if let Some(ep) = self.en_passant_target {
            self.hash ^= ZOBRIST.en_passant_file[ep.file().index() as usize];
        }

        let is_pawn_move = kind == PieceKind::Pawn;
        let mut is_capture = false;

        // Normal capture: remove whatever sits on the destination.
        if let Some((cap_color, cap_kind)) = self.piece_at(mv.to) {
            self.hash ^= piece_key(cap_color, cap_kind, mv.to.index());
            self.erase(mv.to);
            is_capture = true;
            if let Some(bit) = corner_right(mv.to) {
                self.castling_rights &= !bit;
            }
        }

        // En-passant capture: the captured pawn sits beside `to`, not on it.
        if mv.is_en_passant {
            let captured_square = Position::new(mv.to.file(), mv.from.rank());
            if let Some((cap_color, cap_kind)) = self.piece_at(captured_square) {
                self.hash ^= piece_key(cap_color, cap_kind, captured_square.index());
                self.erase(captured_square);
                is_capture = true;
            }
        }

        // Move the piece itself.
        self.hash ^= piece_key(color, kind, mv.from.index());
        self.relocate(mv.from, mv.to);
        self.hash ^= piece_key(color, kind, mv.to.index());

        // Promotion: swap the pawn for the chosen piece at the destination.
        if let Some(promotion) = mv.promotion {
            self.hash ^= piece_key(color, kind, mv.to.index());
            self.set_kind(mv.to, promotion);
            self.hash ^= piece_key(color, promotion, mv.to.index());
        }

        // Castling: the rook jumps to the far side of the king in one move.
        if mv.is_castling {
            let rank = mv.from.rank();
            let kingside = mv.to.file().index() > mv.from.file().index();
            let (rook_from_file, rook_to_file) = if kingside { (7, 5) } else { (0, 3) };
            let rook_from = Position::new(File::new(rook_from_file), rank);
            let rook_to = Position::new(File::new(rook_to_file), rank);
            let (rook_color, rook_kind) = self
                .piece_at(rook_from)
                .expect("apply_move: castling rook missing; generator precondition violated");
            self.hash ^= piece_key(rook_color, rook_kind, rook_from.index());
            self.relocate(rook_from, rook_to);
            self.hash ^= piece_key(rook_color, rook_kind, rook_to.index());
        }

        // Castling-rights updates for king/rook moves.
        if kind == PieceKind::King {
            self.castling_rights &= !(castling::kingside(color) | castling::queenside(color));
        }
        if kind == PieceKind::Rook {
            if let Some(bit) = corner_right(mv.from) {
                self.castling_rights &= !bit;
            }
        }

        // En-passant target emission: only a two-rank pawn push sets it.
        let rank_delta = mv.to.rank().index() as i8 - mv.from.rank().index() as i8;
        self.en_passant_target = if is_pawn_move && rank_delta.abs() == 2 {
            let mid_rank = (mv.from.rank().index() + mv.to.rank().index()) / 2;
            Some(Position::new(mv.from.file(), Rank::new(mid_rank)))
        } else {
            None
        };

        // Half-move clock: resets on captures or pawn moves.
        if is_capture || is_pawn_move {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }

        // Full-move counter increments after Black plays.
        if color == Color::Black {
            self.fullmove_number += 1;
        }

        // Side to move toggles.
        self.side_to_move = !color;
        self.hash ^= ZOBRIST.side_to_move;

        // Re-apply the castling/en-passant hash contributions under their new values.
        self.hash ^= ZOBRIST.castling[self.castling_rights as usize];
        if let Some(ep) = self.en_passant_target {
            self.hash ^= ZOBRIST.en_passant_file[ep.file().index() as usize];
        }

        self.push_history(*mv);

        #[cfg(debug_assertions)]
        self.debug_check_consistent();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Color, PieceKind};

    fn sq(file: u8, rank: u8) -> Position {
        Position::new(File::new(file), Rank::new(rank))
    }

    #[test]
    fn no_op_when_source_is_empty() {
        let mut board = Board::new();
        let before = board.clone();
        board.apply_move(&Move::new(sq(4, 3), sq(4, 4)));
        assert_eq!(board, before);
    }

    #[test]
    fn double_push_sets_en_passant_target() {
        let mut board = Board::new();
        board.apply_move(&Move::new(sq(4, 1), sq(4, 3)));
        assert_eq!(board.en_passant_target(), Some(sq(4, 2)));
        assert_eq!(board.side_to_move(), Color::Black);
    }

    #[test]
    fn single_push_clears_en_passant_target() {
        let mut board = Board::new();
        board.apply_move(&Move::new(sq(4, 1), sq(4, 3)));
        board.apply_move(&Move::new(sq(1, 6), sq(1, 5)));
        assert_eq!(board.en_passant_target(), None);
    }

    #[test]
    fn en_passant_capture_removes_passed_pawn() {
        let mut board = Board::new();
        board.apply_move(&Move::new(sq(4, 1), sq(4, 3))); // e2e4
        board.apply_move(&Move::new(sq(0, 6), sq(0, 5))); // a7a6 (waiting move)
        board.apply_move(&Move::new(sq(4, 3), sq(4, 4))); // e4e5
        board.apply_move(&Move::new(sq(3, 6), sq(3, 4))); // d7d5 (double push beside e5)
        assert_eq!(board.en_passant_target(), Some(sq(3, 5)));

        let mut ep_capture = Move::new(sq(4, 4), sq(3, 5));
        ep_capture.is_en_passant = true;
        board.apply_move(&ep_capture);

        assert!(board.piece_at(sq(3, 4)).is_none(), "captured pawn removed");
        assert_eq!(
            board.piece_at(sq(3, 5)),
            Some((Color::White, PieceKind::Pawn))
        );
    }

    #[test]
    fn kingside_castle_moves_rook() {
        let mut board = Board::empty();
        board.place(sq(4, 0), Color::White, PieceKind::King);
        board.place(sq(7, 0), Color::White, PieceKind::Rook);
        board.place(sq(4, 7), Color::Black, PieceKind::King);
        board.castling_rights = castling::ALL_RIGHTS;

        let mut castle = Move::new(sq(4, 0), sq(6, 0));
        castle.is_castling = true;
        board.apply_move(&castle);

        assert_eq!(
            board.piece_at(sq(6, 0)),
            Some((Color::White, PieceKind::King))
        );
        assert_eq!(
            board.piece_at(sq(5, 0)),
            Some((Color::White, PieceKind::Rook))
        );
        assert!(board.piece_at(sq(7, 0)).is_none());
        assert_eq!(board.castling_rights() & castling::WHITE_KINGSIDE, 0);
        assert_eq!(board.castling_rights() & castling::WHITE_QUEENSIDE, 0);
    }

    #[test]
    fn rook_capture_on_corner_clears_right() {
        let mut board = Board::empty();
        board.place(sq(4, 0), Color::White, PieceKind::King);
        board.place(sq(7, 0), Color::White, PieceKind::Rook);
        board.place(sq(4, 7), Color::Black, PieceKind::King);
        board.place(sq(6, 1), Color::Black, PieceKind::Knight);
        board.castling_rights = castling::ALL_RIGHTS;
        board.side_to_move = Color::Black;

        let mut capture = Move::new(sq(6, 1), sq(7, 0));
        capture.captured = Some(PieceKind::Rook);
        board.apply_move(&capture);

        assert_eq!(board.castling_rights() & castling::WHITE_KINGSIDE, 0);
    }

    #[test]
    fn pawn_move_resets_halfmove_clock() {
        let mut board = Board::new();
        board.apply_move(&Move::new(sq(1, 0), sq(2, 2))); // Nb1c3-ish non-pawn
        assert_eq!(board.halfmove_clock(), 1);
        board.apply_move(&Move::new(sq(4, 6), sq(4, 4))); // pawn push resets
        assert_eq!(board.halfmove_clock(), 0);
    }

    #[test]
    fn fullmove_number_increments_after_black() {
        let mut board = Board::new();
        assert_eq!(board.fullmove_number(), 1);
        board.apply_move(&Move::new(sq(4, 1), sq(4, 3)));
        assert_eq!(board.fullmove_number(), 1);
        board.apply_move(&Move::new(sq(4, 6), sq(4, 4)));
        assert_eq!(board.fullmove_number(), 2);
    }
}
