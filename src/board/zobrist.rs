//! Zobrist-style position hashing, incrementally maintained by `apply_move` (§3, §4.3).

use once_cell::sync::Lazy;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::types::{Color, PieceKind};

/// Fixed seed so the key tables (and therefore any hash computed from them)
/// are reproducible across runs — required for the perft/invariant tests in §8,
/// which compare hashes across independently constructed boards.
const ZOBRIST_SEED: u64 = 0x5EED_C0DE_C4E5_5000;

pub(crate) struct ZobristKeys {
    pub piece: [[[u64; 64]; 6]; 2],
    pub side_to_move: u64,
    pub castling: [u64; 16],
    pub en_passant_file: [u64; 8],
}

pub(crate) static ZOBRIST: Lazy<ZobristKeys> = Lazy::new(|| {
    let mut rng = StdRng::seed_from_u64(ZOBRIST_SEED);
    let mut piece = [[[0u64; 64]; 6]; 2];
    for color_table in &mut piece {
        for kind_table in color_table.iter_mut() {
            for key in kind_table.iter_mut() {
                *key = rng.gen();
            }
        }
    }
    let mut castling = [0u64; 16];
    for key in &mut castling {
        *key = rng.gen();
    }
    let mut en_passant_file = [0u64; 8];
    for key in &mut en_passant_file {
        *key = rng.gen();
    }
    ZobristKeys {
        piece,
        side_to_move: rng.gen(),
        castling,
        en_passant_file,
    }
});

pub(crate) fn piece_kind_index(kind: PieceKind) -> usize {
    match kind {
        PieceKind::Pawn => 0,
        PieceKind::Knight => 1,
        PieceKind::Bishop => 2,
        PieceKind::Rook => 3,
        PieceKind::Queen => 4,
        PieceKind::King => 5,
    }
}

pub(crate) fn piece_key(color: Color, kind: PieceKind, square_index: usize) -> u64 {
    ZOBRIST.piece[color.index()][piece_kind_index(kind)][square_index]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_reproducible() {
        assert_eq!(
            piece_key(Color::White, PieceKind::Pawn, 0),
            piece_key(Color::White, PieceKind::Pawn, 0)
        );
    }

    #[test]
    fn distinct_squares_have_distinct_keys() {
        assert_ne!(
            piece_key(Color::White, PieceKind::Pawn, 0),
            piece_key(Color::White, PieceKind::Pawn, 1)
        );
    }
}
