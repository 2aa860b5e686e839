//! Precomputed attack tables (§4.2).
//!
//! Computed once, lazily, on first access. Lookup is O(1); recomputing these
//! per move would be wasted work.

use once_cell::sync::Lazy;

use crate::bitboard::Bitboard;
use crate::types::{Color, Position};

const KNIGHT_DELTAS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

const KING_DELTAS: [(i8, i8); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

const ROOK_DELTAS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const BISHOP_DELTAS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

fn leaper_table(deltas: &[(i8, i8)]) -> [Bitboard; 64] {
    let mut table = [Bitboard::EMPTY; 64];
    for idx in 0..64u8 {
        let sq = Position::from_index(idx);
        let mut bb = Bitboard::EMPTY;
        for &(df, dr) in deltas {
            if let Some(dst) = sq.offset(df, dr) {
                bb.set(dst);
            }
        }
        table[idx as usize] = bb;
    }
    table
}

fn neighbour_list(deltas: &'static [(i8, i8)]) -> [Vec<Position>; 64] {
    std::array::from_fn(|idx| {
        let sq = Position::from_index(idx as u8);
        deltas
            .iter()
            .filter_map(|&(df, dr)| sq.offset(df, dr))
            .collect()
    })
}

/// `knight_attacks[sq]`.
pub static KNIGHT_ATTACKS: Lazy<[Bitboard; 64]> = Lazy::new(|| leaper_table(&KNIGHT_DELTAS));

/// `king_attacks[sq]`.
pub static KING_ATTACKS: Lazy<[Bitboard; 64]> = Lazy::new(|| leaper_table(&KING_DELTAS));

/// `pawn_attacks[color][sq]` — the two diagonally-forward squares a pawn attacks.
pub static PAWN_ATTACKS: Lazy<[[Bitboard; 64]; 2]> = Lazy::new(|| {
    let mut table = [[Bitboard::EMPTY; 64]; 2];
    for idx in 0..64u8 {
        let sq = Position::from_index(idx);
        let mut white = Bitboard::EMPTY;
        for df in [-1, 1] {
            if let Some(dst) = sq.offset(df, 1) {
                white.set(dst);
            }
        }
        let mut black = Bitboard::EMPTY;
        for df in [-1, 1] {
            if let Some(dst) = sq.offset(df, -1) {
                black.set(dst);
            }
        }
        table[Color::White.index()][idx as usize] = white;
        table[Color::Black.index()][idx as usize] = black;
    }
    table
});

/// Immediate orthogonal neighbours per square, used to seed rook/queen ray-casts
/// and the evaluator's "blocked rook" term (§4.5).
pub static ROOK_RAY_NEIGHBOURS: Lazy<[Vec<Position>; 64]> =
    Lazy::new(|| neighbour_list(&ROOK_DELTAS));

/// Immediate 8-neighbours per square, used to seed bishop/queen ray-casts and
/// the evaluator's "blocked queen" term (§4.5).
pub static ALL_NEIGHBOURS: Lazy<[Vec<Position>; 64]> = Lazy::new(|| neighbour_list(&KING_DELTAS));

/// Ray directions for sliding pieces, indexed by piece kind via the helper functions below.
pub static ROOK_DIRECTIONS: [(i8, i8); 4] = ROOK_DELTAS;
pub static BISHOP_DIRECTIONS: [(i8, i8); 4] = BISHOP_DELTAS;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{File, Rank};

    fn sq(file: u8, rank: u8) -> Position {
        Position::new(File::new(file), Rank::new(rank))
    }

    #[test]
    fn knight_from_corner_has_two_targets() {
        let a1 = sq(0, 0);
        assert_eq!(KNIGHT_ATTACKS[a1.index()].popcount(), 2);
    }

    #[test]
    fn king_from_center_has_eight_targets() {
        let e4 = sq(4, 3);
        assert_eq!(KING_ATTACKS[e4.index()].popcount(), 8);
    }

    #[test]
    fn pawn_attacks_empty_on_back_rank() {
        let a1 = sq(0, 0);
        assert!(PAWN_ATTACKS[Color::White.index()][a1.index()].any());
        let a8 = sq(0, 7);
        assert!(PAWN_ATTACKS[Color::White.index()][a8.index()].none());
    }

    #[test]
    fn rook_ray_neighbours_count() {
        let e4 = sq(4, 3);
        assert_eq!(ROOK_RAY_NEIGHBOURS[e4.index()].len(), 4);
        let a1 = sq(0, 0);
        assert_eq!(ROOK_RAY_NEIGHBOURS[a1.index()].len(), 2);
    }
}
