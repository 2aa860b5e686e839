//! The packed board representation (C3, §3).
//!
//! Three mirrored views are kept in lockstep by every mutation path: a
//! by-square array for O(1) point queries, a piece list that exclusively owns
//! piece identity (used to iterate "all of this color's pieces" without
//! scanning all 64 squares), and one bitboard per color.

use std::collections::VecDeque;

use crate::bitboard::Bitboard;
use crate::board::castling;
use crate::board::zobrist::{piece_key, ZOBRIST};
use crate::types::{Color, Move, PieceKind, Position};

/// Maximum live pieces on a board (2 kings + 15 per side is already generous;
/// promotions cannot increase piece count, so 32 always suffices).
pub const MAX_PIECES: usize = 32;

/// Length of the recent-move ring buffer (§3, §9: partially instruments
/// repetition but does not enforce the threefold-repetition draw rule).
pub const MOVE_HISTORY_LEN: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct PieceSlot {
    pub square: Position,
    pub color: Color,
    pub kind: PieceKind,
}

/// A chess position: side to move, piece placement, castling/en-passant
/// state, and move clocks.
#[derive(Clone, Debug)]
pub struct Board {
    pub(crate) by_square: [Option<(Color, PieceKind)>; 64],
    pub(crate) piece_list: [Option<PieceSlot>; MAX_PIECES],
    pub(crate) piece_count: usize,
    pub(crate) color_bb: [Bitboard; 2],
    pub(crate) side_to_move: Color,
    pub(crate) castling_rights: u8,
    pub(crate) en_passant_target: Option<Position>,
    pub(crate) halfmove_clock: u32,
    pub(crate) fullmove_number: u32,
    pub(crate) history: VecDeque<Move>,
    pub(crate) hash: u64,
}

impl Board {
    /// An empty board: no pieces, white to move, no castling rights.
    #[must_use]
    pub fn empty() -> Self {
        Board {
            by_square: [None; 64],
            piece_list: [None; MAX_PIECES],
            piece_count: 0,
            color_bb: [Bitboard::EMPTY; 2],
            side_to_move: Color::White,
            castling_rights: 0,
            en_passant_target: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            history: VecDeque::with_capacity(MOVE_HISTORY_LEN),
            hash: 0,
        }
    }

    /// The standard starting position.
    #[must_use]
    pub fn new() -> Self {
        let mut board = Board::empty();
        let back_rank = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        for (file, kind) in back_rank.into_iter().enumerate() {
            board.place(sq(file as u8, 0), Color::White, kind);
            board.place(sq(file as u8, 7), Color::Black, kind);
            board.place(sq(file as u8, 1), Color::White, PieceKind::Pawn);
            board.place(sq(file as u8, 6), Color::Black, PieceKind::Pawn);
        }
        board.castling_rights = castling::ALL_RIGHTS;
        board.side_to_move = Color::White;
        board.hash = board.compute_hash_from_scratch();
        board
    }

    /// Recompute the Zobrist hash from the current board state. Used by FEN
    /// parsing and `Board::new`; `apply_move` instead updates the hash
    /// incrementally (§4.3).
    pub(crate) fn compute_hash_from_scratch(&self) -> u64 {
        let mut hash = 0u64;
        for slot in self.piece_list.iter().take(self.piece_count).flatten() {
            hash ^= piece_key(slot.color, slot.kind, slot.square.index());
        }
        if self.side_to_move == Color::Black {
            hash ^= ZOBRIST.side_to_move;
        }
        hash ^= ZOBRIST.castling[self.castling_rights as usize];
        if let Some(ep) = self.en_passant_target {
            hash ^= ZOBRIST.en_passant_file[ep.file().index() as usize];
        }
        hash
    }

    #[must_use]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    #[must_use]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[must_use]
    pub fn castling_rights(&self) -> u8 {
        self.castling_rights
    }

    #[must_use]
    pub fn en_passant_target(&self) -> Option<Position> {
        self.en_passant_target
    }

    #[must_use]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    #[must_use]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    #[must_use]
    pub fn piece_at(&self, square: Position) -> Option<(Color, PieceKind)> {
        self.by_square[square.index()]
    }

    #[must_use]
    pub fn occupied_by(&self, color: Color) -> Bitboard {
        self.color_bb[color.index()]
    }

    #[must_use]
    pub fn all_occupied(&self) -> Bitboard {
        self.color_bb[Color::White.index()].or(self.color_bb[Color::Black.index()])
    }

    /// The square of `color`'s king. Panics if absent — the invariant in §3
    /// guarantees exactly one king of each color on any board this crate constructs.
    #[must_use]
    pub fn king_square(&self, color: Color) -> Position {
        let slot_index = match color {
            Color::White => 0,
            Color::Black => 1,
        };
        self.piece_list[slot_index]
            .expect("king slot invariant violated: slot 0/1 must hold the kings")
            .square
    }

    /// Iterate over all live pieces as `(square, color, kind)`.
    pub fn pieces(&self) -> impl Iterator<Item = (Position, Color, PieceKind)> + '_ {
        self.piece_list
            .iter()
            .take(self.piece_count)
            .filter_map(|slot| slot.map(|s| (s.square, s.color, s.kind)))
    }

    /// Place a piece on an empty square. Kings MUST be placed into slot 0
    /// (white) / slot 1 (black) to satisfy the piece-list invariant (§3); this
    /// is enforced by reserving those slots up front in `empty()`-derived boards.
    pub fn place(&mut self, square: Position, color: Color, kind: PieceKind) {
        debug_assert!(
            self.by_square[square.index()].is_none(),
            "place() onto an occupied square"
        );
        self.by_square[square.index()] = Some((color, kind));
        self.color_bb[color.index()].set(square);

        let slot = PieceSlot {
            square,
            color,
            kind,
        };
        if kind == PieceKind::King {
            let king_slot = match color {
                Color::White => 0,
                Color::Black => 1,
            };
            self.piece_list[king_slot] = Some(slot);
            self.piece_count = self.piece_count.max(king_slot + 1);
        } else {
            // Reserve slots 0/1 for kings; append elsewhere in the compacted range.
            let insert_at = self.piece_count.max(2);
            self.piece_list[insert_at] = Some(slot);
            self.piece_count = insert_at + 1;
        }
    }

    /// Remove whatever piece sits on `square`, if any, keeping all three
    /// mirrors consistent. Returns the removed `(color, kind)`.
    pub fn erase(&mut self, square: Position) -> Option<(Color, PieceKind)> {
        let removed = self.by_square[square.index()].take()?;
        self.color_bb[removed.0.index()].clear(square);

        let slot_index = self
            .piece_list
            .iter()
            .take(self.piece_count)
            .position(|slot| matches!(slot, Some(s) if s.square == square))
            .expect("piece-list/by-square mirrors disagree");

        if slot_index < 2 {
            // Kings are never erased in legal play; clearing the slot keeps
            // the mirrors consistent for admin use (e.g. test scaffolding).
            self.piece_list[slot_index] = None;
        } else {
            let last = self.piece_count - 1;
            self.piece_list[slot_index] = self.piece_list[last];
            self.piece_list[last] = None;
            self.piece_count = last;
        }
        Some(removed)
    }

    /// Move a piece from one empty-destination square to another without
    /// touching castling rights, clocks, or history — the narrow admin
    /// operation used internally by `apply_move` (§4.3) for the piece itself;
    /// captures must be `erase`d first.
    pub(crate) fn relocate(&mut self, from: Position, to: Position) {
        let (color, kind) = self.by_square[from.index()]
            .take()
            .expect("relocate() source square is empty");
        self.by_square[to.index()] = Some((color, kind));
        self.color_bb[color.index()].clear(from);
        self.color_bb[color.index()].set(to);

        let slot_index = self
            .piece_list
            .iter()
            .take(self.piece_count)
            .position(|slot| matches!(slot, Some(s) if s.square == from))
            .expect("piece-list/by-square mirrors disagree");
        if let Some(slot) = self.piece_list[slot_index].as_mut() {
            slot.square = to;
        }
    }

    /// Change the kind of the piece on `square` in place (promotion, §4.3).
    pub(crate) fn set_kind(&mut self, square: Position, kind: PieceKind) {
        let (color, _) = self.by_square[square.index()]
            .expect("set_kind() on an empty square");
        self.by_square[square.index()] = Some((color, kind));
        let slot_index = self
            .piece_list
            .iter()
            .take(self.piece_count)
            .position(|slot| matches!(slot, Some(s) if s.square == square))
            .expect("piece-list/by-square mirrors disagree");
        if let Some(slot) = self.piece_list[slot_index].as_mut() {
            slot.kind = kind;
        }
    }

    pub(crate) fn push_history(&mut self, mv: Move) {
        if self.history.len() == MOVE_HISTORY_LEN {
            self.history.pop_back();
        }
        self.history.push_front(mv);
    }

    /// The most recent moves, newest first (at most `MOVE_HISTORY_LEN`).
    #[must_use]
    pub fn recent_moves(&self) -> &VecDeque<Move> {
        &self.history
    }

    /// True if the half-move clock has reached the fifty-move threshold.
    /// Tracked, but — per §9 — not enforced as a game-ending condition by
    /// `Engine::get_move`; a caller may consult this directly.
    #[must_use]
    pub fn fifty_move_rule_reached(&self) -> bool {
        self.halfmove_clock >= 100
    }

    /// Walk the by-square array, piece list, and color bitboards and panic if
    /// any two of them disagree (§4.3, §7: invariant violation is fatal).
    /// Compiled out in release builds; called from `apply_move` after every
    /// mutation.
    #[cfg(debug_assertions)]
    pub(crate) fn debug_check_consistent(&self) {
        let mut seen_in_piece_list = [false; 64];
        for slot in self.piece_list.iter().take(self.piece_count).flatten() {
            let idx = slot.square.index();
            assert!(
                !seen_in_piece_list[idx],
                "two piece-list entries claim square {}",
                slot.square
            );
            seen_in_piece_list[idx] = true;
            assert_eq!(
                self.by_square[idx],
                Some((slot.color, slot.kind)),
                "piece-list entry at {} disagrees with by_square",
                slot.square
            );
            assert!(
                self.color_bb[slot.color.index()].test(slot.square),
                "piece-list entry at {} missing from its color bitboard",
                slot.square
            );
        }

        for (idx, occupant) in self.by_square.iter().enumerate() {
            match occupant {
                Some(_) => assert!(
                    seen_in_piece_list[idx],
                    "by_square has a piece at index {idx} absent from the piece list"
                ),
                None => {
                    let square = Position::from_index(idx as u8);
                    assert!(
                        !self.color_bb[Color::White.index()].test(square)
                            && !self.color_bb[Color::Black.index()].test(square),
                        "color bitboards have a piece at {square} that by_square does not"
                    );
                }
            }
        }

        assert!(
            self.piece_list[0].is_some_and(|s| s.color == Color::White && s.kind == PieceKind::King),
            "slot 0 must hold the white king"
        );
        assert!(
            self.piece_list[1].is_some_and(|s| s.color == Color::Black && s.kind == PieceKind::King),
            "slot 1 must hold the black king"
        );
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}

impl PartialEq for Board {
    /// Equality over all observable state except the move history ring
    /// buffer, which FEN does not carry (§8, property 3: FEN round-trip).
    fn eq(&self, other: &Self) -> bool {
        self.by_square == other.by_square
            && self.side_to_move == other.side_to_move
            && self.castling_rights == other.castling_rights
            && self.en_passant_target == other.en_passant_target
            && self.halfmove_clock == other.halfmove_clock
            && self.fullmove_number == other.fullmove_number
    }
}

fn sq(file: u8, rank: u8) -> Position {
    Position::new(crate::types::File::new(file), crate::types::Rank::new(rank))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starting_position_has_32_pieces() {
        let board = Board::new();
        assert_eq!(board.piece_count, 32);
        assert_eq!(board.pieces().count(), 32);
    }

    #[test]
    fn kings_occupy_reserved_slots() {
        let board = Board::new();
        assert_eq!(board.piece_list[0].unwrap().kind, PieceKind::King);
        assert_eq!(board.piece_list[0].unwrap().color, Color::White);
        assert_eq!(board.piece_list[1].unwrap().kind, PieceKind::King);
        assert_eq!(board.piece_list[1].unwrap().color, Color::Black);
    }

    #[test]
    fn color_bitboards_match_piece_list() {
        let board = Board::new();
        for (square, color, _) in board.pieces() {
            assert!(board.occupied_by(color).test(square));
        }
        assert_eq!(board.occupied_by(Color::White).popcount(), 16);
        assert_eq!(board.occupied_by(Color::Black).popcount(), 16);
    }

    #[test]
    fn erase_then_place_keeps_mirrors_consistent() {
        let mut board = Board::new();
        let e2 = sq(4, 1);
        let removed = board.erase(e2);
        assert_eq!(removed, Some((Color::White, PieceKind::Pawn)));
        assert!(board.piece_at(e2).is_none());
        assert!(!board.occupied_by(Color::White).test(e2));
        assert_eq!(board.piece_count, 31);
    }

    #[test]
    fn relocate_moves_piece_and_updates_piece_list() {
        let mut board = Board::new();
        let e2 = sq(4, 1);
        let e4 = sq(4, 3);
        board.relocate(e2, e4);
        assert!(board.piece_at(e2).is_none());
        assert_eq!(board.piece_at(e4), Some((Color::White, PieceKind::Pawn)));
        assert!(board
            .pieces()
            .any(|(square, _, _)| square == e4));
    }
}
