use chess_core::board::Board;
use chess_core::types::Color;

fn castling_moves_for(fen: &str, side: Color) -> (bool, bool) {
    let board: Board = fen.parse().unwrap();
    let moves = board.legal_moves(side);
    let kingside = moves.iter().any(|mv| mv.is_castling && mv.to.file().index() == 6);
    let queenside = moves.iter().any(|mv| mv.is_castling && mv.to.file().index() == 2);
    (kingside, queenside)
}

#[test]
fn open_corridors_allow_castling_both_sides() {
    let fen = "r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1";
    assert_eq!(castling_moves_for(fen, Color::White), (true, true));
}

#[test]
fn blocked_back_rank_prevents_castling_despite_retained_rights() {
    let fen = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
    assert_eq!(castling_moves_for(fen, Color::White), (false, false));
}

#[test]
fn cannot_castle_kingside_through_an_attacked_square() {
    let fen = "rnb1kbnr/pppppppp/8/8/8/4q3/PPP1P1PP/R3K2R w KQkq - 0 1";
    let (kingside, _) = castling_moves_for(fen, Color::White);
    assert!(!kingside, "queen on e3 attacks g1 along the long diagonal, blocking the destination square");
}
