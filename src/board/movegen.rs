//! Pseudo-legal move generation, attack detection, and the legality filter (§4.4).

use crate::board::state::Board;
use crate::board::tables::{
    BISHOP_DIRECTIONS, KING_ATTACKS, KNIGHT_ATTACKS, PAWN_ATTACKS, ROOK_DIRECTIONS,
};
use crate::types::{Color, Move, PieceKind, Position};

const SLIDER_DIRECTIONS: [(i8, i8); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

fn directions_for(kind: PieceKind) -> &'static [(i8, i8)] {
    match kind {
        PieceKind::Rook => &ROOK_DIRECTIONS,
        PieceKind::Bishop => &BISHOP_DIRECTIONS,
        PieceKind::Queen => &SLIDER_DIRECTIONS,
        _ => &[],
    }
}

impl Board {
    /// Pseudo-legal moves for `side`: obeys piece movement rules and does not
    /// walk through or capture friendly pieces, but does not check whether the
    /// moving side's own king ends up in check (§4.4a).
    fn pseudo_legal_moves(&self, side: Color) -> Vec<Move> {
        let mut moves = Vec::new();
        let own = self.occupied_by(side);
        let occupied = self.all_occupied();

        for (square, color, kind) in self.pieces() {
            if color != side {
                continue;
            }
            match kind {
                PieceKind::Pawn => self.generate_pawn_moves(square, side, &mut moves),
                PieceKind::Knight => {
                    for to in KNIGHT_ATTACKS[square.index()].and(own.not()).iter() {
                        moves.push(self.leaper_move(square, to));
                    }
                }
                PieceKind::King => {
                    for to in KING_ATTACKS[square.index()].and(own.not()).iter() {
                        moves.push(self.leaper_move(square, to));
                    }
                    self.generate_castling_moves(square, side, &mut moves);
                }
                PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen => {
                    self.generate_slider_moves(square, kind, occupied, own, &mut moves);
                }
            }
        }
        moves
    }

    /// A leaper (knight/king) move onto `to`, tagged with whatever it captures.
    fn leaper_move(&self, from: Position, to: Position) -> Move {
        let mut mv = Move::new(from, to);
        mv.captured = self.piece_at(to).map(|(_, kind)| kind);
        mv
    }

    fn generate_pawn_moves(&self, from: Position, side: Color, moves: &mut Vec<Move>) {
        let forward: i8 = if side == Color::White { 1 } else { -1 };
        let start_rank = if side == Color::White { 1 } else { 6 };
        let last_rank = if side == Color::White { 7 } else { 0 };

        let push_one = from.offset(0, forward);
        if let Some(to) = push_one {
            if self.piece_at(to).is_none() {
                self.emit_pawn_move(from, to, last_rank, None, moves);

                if from.rank().index() == start_rank {
                    if let Some(to2) = from.offset(0, 2 * forward) {
                        if self.piece_at(to2).is_none() {
                            moves.push(Move::new(from, to2));
                        }
                    }
                }
            }
        }

        for df in [-1, 1] {
            let Some(to) = from.offset(df, forward) else {
                continue;
            };
            let is_en_passant = self.en_passant_target() == Some(to);
            match self.piece_at(to) {
                Some((color, captured_kind)) if color != side => {
                    self.emit_pawn_move(from, to, last_rank, Some(captured_kind), moves);
                }
                None if is_en_passant => {
                    let mut mv = Move::new(from, to);
                    mv.is_en_passant = true;
                    moves.push(mv);
                }
                _ => {}
            }
        }
    }

    /// Push one plain move, or all four promotion variants if `to` lands on
    /// the back rank (REDESIGN FLAG §9: uniform across pushes and captures).
    fn emit_pawn_move(
        &self,
        from: Position,
        to: Position,
        last_rank: u8,
        captured: Option<PieceKind>,
        moves: &mut Vec<Move>,
    ) {
        if to.rank().index() == last_rank {
            for &promotion in &PieceKind::PROMOTION_CHOICES {
                let mut mv = Move::new(from, to).with_promotion(promotion);
                mv.captured = captured;
                moves.push(mv);
            }
        } else {
            let mut mv = Move::new(from, to);
            mv.captured = captured;
            moves.push(mv);
        }
    }

    fn generate_slider_moves(
        &self,
        from: Position,
        kind: PieceKind,
        occupied: crate::bitboard::Bitboard,
        own: crate::bitboard::Bitboard,
        moves: &mut Vec<Move>,
    ) {
        for &(df, dr) in directions_for(kind) {
            let mut current = from;
            loop {
                let Some(next) = current.offset(df, dr) else {
                    break;
                };
                if own.test(next) {
                    break;
                }
                moves.push(self.leaper_move(from, next));
                if occupied.test(next) {
                    break;
                }
                current = next;
            }
        }
    }

    fn generate_castling_moves(&self, king_square: Position, side: Color, moves: &mut Vec<Move>) {
        use crate::board::castling;

        let rank = king_square.rank().index();
        let rights = self.castling_rights();
        let opponent = !side;

        let kingside_right = castling::kingside(side);
        if rights & kingside_right != 0 {
            let f = Position::new(crate::types::File::new(5), crate::types::Rank::new(rank));
            let g = Position::new(crate::types::File::new(6), crate::types::Rank::new(rank));
            if self.piece_at(f).is_none()
                && self.piece_at(g).is_none()
                && !self.is_attacked(king_square, opponent)
                && !self.is_attacked(f, opponent)
                && !self.is_attacked(g, opponent)
            {
                let mut mv = Move::new(king_square, g);
                mv.is_castling = true;
                moves.push(mv);
            }
        }

        let queenside_right = castling::queenside(side);
        if rights & queenside_right != 0 {
            let d = Position::new(crate::types::File::new(3), crate::types::Rank::new(rank));
            let c = Position::new(crate::types::File::new(2), crate::types::Rank::new(rank));
            let b = Position::new(crate::types::File::new(1), crate::types::Rank::new(rank));
            if self.piece_at(d).is_none()
                && self.piece_at(c).is_none()
                && self.piece_at(b).is_none()
                && !self.is_attacked(king_square, opponent)
                && !self.is_attacked(d, opponent)
                && !self.is_attacked(c, opponent)
            {
                let mut mv = Move::new(king_square, c);
                mv.is_castling = true;
                moves.push(mv);
            }
        }
    }

    /// True if `square` is attacked by any piece of `by_color` (§4.4).
    #[must_use]
    pub fn is_attacked(&self, square: Position, by_color: Color) -> bool {
        for (their_square, color, kind) in self.pieces() {
            if color != by_color {
                continue;
            }
            let hits = match kind {
                PieceKind::Pawn => PAWN_ATTACKS[color.index()][their_square.index()].test(square),
                PieceKind::Knight => KNIGHT_ATTACKS[their_square.index()].test(square),
                PieceKind::King => {
                    let df = (their_square.file().index() as i8 - square.file().index() as i8).abs();
                    let dr = (their_square.rank().index() as i8 - square.rank().index() as i8).abs();
                    df <= 1 && dr <= 1 && (df != 0 || dr != 0)
                }
                PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen => {
                    self.slider_attacks(their_square, kind, square)
                }
            };
            if hits {
                return true;
            }
        }
        false
    }

    fn slider_attacks(&self, from: Position, kind: PieceKind, target: Position) -> bool {
        for &(df, dr) in directions_for(kind) {
            let mut current = from;
            loop {
                let Some(next) = current.offset(df, dr) else {
                    break;
                };
                if next == target {
                    return true;
                }
                if self.piece_at(next).is_some() {
                    break;
                }
                current = next;
            }
        }
        false
    }

    /// `side` is in check (§4.4).
    #[must_use]
    pub fn is_check(&self, side: Color) -> bool {
        self.is_attacked(self.king_square(side), !side)
    }

    /// Legal moves for `side`: pseudo-legal generation followed by the
    /// copy-apply-discard-if-king-attacked filter (§4.4b).
    #[must_use]
    pub fn legal_moves(&self, side: Color) -> Vec<Move> {
        self.pseudo_legal_moves(side)
            .into_iter()
            .filter(|mv| {
                let mut after = self.clone();
                after.apply_move(mv);
                !after.is_check(side)
            })
            .collect()
    }

    /// `side` is checkmated: in check with no legal response (§4.4).
    #[must_use]
    pub fn is_checkmate(&self, side: Color) -> bool {
        self.is_check(side) && self.legal_moves(side).is_empty()
    }

    /// `side` has no legal move but is not in check (§4.4, supplemental query).
    #[must_use]
    pub fn is_stalemate(&self, side: Color) -> bool {
        !self.is_check(side) && self.legal_moves(side).is_empty()
    }
}
