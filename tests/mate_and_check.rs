use chess_core::board::Board;
use chess_core::search::{MoveTree, SearchProfile};
use chess_core::types::Color;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn finds_a_mate_in_one() {
    let board: Board = "6rn/8/8/8/K7/2k5/1q6/8 b - - 92 118".parse().unwrap();
    let mut tree = MoveTree::new(board.clone());
    let profile = SearchProfile {
        deterministic: true,
        ..SearchProfile::default()
    };
    tree.build_tree(3, profile);

    let mut rng = StdRng::seed_from_u64(0);
    let mv = tree
        .best_root_move(profile, &mut rng)
        .expect("black has at least one legal move");

    let mut after = board;
    after.apply_move(&mv);
    assert!(after.is_checkmate(Color::White));
}

#[test]
fn detects_check_against_black() {
    let board: Board = "1rb1kbnr/ppNppppp/2n5/6NQ/4P3/3P4/PPP2PPq/R3KB1R b KQk - 1 11"
        .parse()
        .unwrap();
    assert!(board.is_check(Color::Black));
}
