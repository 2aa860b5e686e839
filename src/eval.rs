//! Static position evaluation (C7, §4.5).

use crate::board::tables::{ALL_NEIGHBOURS, ROOK_RAY_NEIGHBOURS};
use crate::board::Board;
use crate::types::{Color, PieceKind};

/// Returned when the side not to move has been checkmated — the only
/// terminal value the evaluator special-cases (§4.5 rule 1).
pub const MATE_SCORE: f32 = 100_000.0;

const PAWN_ADVANCEMENT_WEIGHT: f32 = 1e-4;
const BLOCKED_MAJOR_PENALTY: f32 = 0.05;
const CASTLING_RIGHT_BONUS: f32 = 0.01;

fn piece_value(kind: PieceKind) -> f32 {
    match kind {
        PieceKind::Pawn => 1.0,
        PieceKind::Knight => 2.0,
        PieceKind::Bishop => 2.0,
        PieceKind::Rook => 5.0,
        PieceKind::Queen => 10.0,
        PieceKind::King => 1000.0,
    }
}

/// Plies from `square`'s rank to the promotion rank for a pawn of `color`.
fn distance_to_promotion(color: Color, rank_index: u8) -> u8 {
    match color {
        Color::White => 7 - rank_index,
        Color::Black => rank_index,
    }
}

/// True if every neighbour of `square` is occupied by a piece of `square`'s
/// own color — the "blocked major piece" condition of §4.5 rule 4.
fn fully_blocked(board: &Board, neighbours: &[crate::types::Position], color: Color) -> bool {
    neighbours.iter().all(|&n| {
        matches!(board.piece_at(n), Some((occupant_color, _)) if occupant_color == color)
    })
}

/// Rate `board` from `side`'s point of view: positive is better for `side`
/// (§4.5). Only the sign and relative ordering of the mate and material terms
/// are a testable contract; the remaining weights are design-tunable.
#[must_use]
pub fn rate(board: &Board, side: Color) -> f32 {
    if board.is_checkmate(!side) {
        return MATE_SCORE;
    }

    let mut score = 0.0f32;

    for (square, color, kind) in board.pieces() {
        let sign = if color == side { 1.0 } else { -1.0 };
        score += sign * piece_value(kind);

        if kind == PieceKind::Pawn {
            let distance = distance_to_promotion(color, square.rank().index());
            let advancement = f32::from(7 - distance) / 7.0;
            score += sign * advancement * PAWN_ADVANCEMENT_WEIGHT;
        }

        let blocked_neighbours: Option<&[crate::types::Position]> = match kind {
            PieceKind::Queen => Some(&ALL_NEIGHBOURS[square.index()]),
            PieceKind::Rook => Some(&ROOK_RAY_NEIGHBOURS[square.index()]),
            _ => None,
        };
        if let Some(neighbours) = blocked_neighbours {
            if fully_blocked(board, neighbours, color) {
                score -= sign * BLOCKED_MAJOR_PENALTY;
            }
        }
    }

    let rights = board.castling_rights();
    let (own_kingside, own_queenside) = match side {
        Color::White => (crate::board::castling::WHITE_KINGSIDE, crate::board::castling::WHITE_QUEENSIDE),
        Color::Black => (crate::board::castling::BLACK_KINGSIDE, crate::board::castling::BLACK_QUEENSIDE),
    };
    let retained = u32::from(rights & own_kingside != 0) + u32::from(rights & own_queenside != 0);
    score += retained as f32 * CASTLING_RIGHT_BONUS;

    score
}
