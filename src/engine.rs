//! The engine façade (C9, §4.7, §6): a small stateful wrapper around
//! [`Board`] and [`MoveTree`] exposing the `start`/`set_board`/`get_move`/
//! `set_search_depth`/`stop` lifecycle a caller drives a game through.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::board::Board;
use crate::search::{MoveTree, SearchProfile};
use crate::types::{Color, Move};

/// Search depth used when a caller never calls `set_search_depth` (§6).
pub const DEFAULT_SEARCH_DEPTH: u32 = 5;

/// The lifecycle a caller (a streaming client, a terminal renderer, a test
/// harness) drives a game through (§6). Every method here is infallible by
/// contract (§7): parse failures happen one layer down, at
/// `Board::try_from_fen`/`Board::parse_move`, before a well-formed `Board` or
/// `Move` ever reaches this trait.
pub trait ChessEngine {
    /// Set the initial position and the color this engine plays as.
    fn start(&mut self, board: Board, my_color: Color);

    /// Replace the current position.
    fn set_board(&mut self, board: Board);

    /// Search the current position to the configured depth and return the
    /// best move found, without applying it. `None` if no legal move exists.
    fn get_move(&mut self) -> Option<Move>;

    /// Change the nominal search depth used by subsequent `get_move` calls.
    fn set_search_depth(&mut self, depth: u32);

    /// Release resources (drops any retained tree state). Safe to call
    /// multiple times.
    fn stop(&mut self);
}

/// The reference [`ChessEngine`] implementation: one board, one search
/// profile, and a seeded or entropy-sourced RNG for root tie-breaking (§9).
pub struct Engine {
    board: Board,
    my_color: Color,
    depth: u32,
    profile: SearchProfile,
    rng: StdRng,
}

impl Engine {
    /// An engine whose tie-breaking is reproducible across runs (§9) — the
    /// same `seed` always produces the same move from a tied root.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Engine {
            board: Board::new(),
            my_color: Color::White,
            depth: DEFAULT_SEARCH_DEPTH,
            profile: SearchProfile::default(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// The board the engine is currently positioned at.
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The color this engine was told to play as via `start`.
    #[must_use]
    pub fn my_color(&self) -> Color {
        self.my_color
    }

    /// Override the tuning flags consulted during `get_move` (§4.6).
    pub fn set_profile(&mut self, profile: SearchProfile) {
        self.profile = profile;
    }
}

impl Default for Engine {
    /// An engine whose tie-breaking draws from OS entropy rather than a
    /// fixed seed, for ordinary (non-test) use.
    fn default() -> Self {
        Engine {
            board: Board::new(),
            my_color: Color::White,
            depth: DEFAULT_SEARCH_DEPTH,
            profile: SearchProfile::default(),
            rng: StdRng::from_entropy(),
        }
    }
}

impl ChessEngine for Engine {
    fn start(&mut self, board: Board, my_color: Color) {
        self.board = board;
        self.my_color = my_color;
    }

    fn set_board(&mut self, board: Board) {
        self.board = board;
    }

    fn get_move(&mut self) -> Option<Move> {
        let mut tree = MoveTree::new(self.board.clone());
        tree.build_tree(self.depth, self.profile);
        tree.best_root_move(self.profile, &mut self.rng)
    }

    fn set_search_depth(&mut self, depth: u32) {
        self.depth = depth;
    }

    fn stop(&mut self) {
        // No retained tree/transposition state between calls (§4.6, §9: a
        // fresh arena is rebuilt per `get_move`), so there is nothing to
        // release beyond the no-op this already is; idempotent by
        // construction.
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_then_get_move_returns_a_legal_opening_move() {
        let mut engine = Engine::with_seed(1);
        engine.start(Board::new(), Color::White);
        engine.set_search_depth(2);
        let mv = engine.get_move().expect("startpos has legal moves");
        assert!(engine.board().legal_moves(engine.board().side_to_move()).contains(&mv));
    }

    #[test]
    fn set_board_replaces_the_current_position() {
        let mut engine = Engine::with_seed(1);
        let mate_in_one: Board = "6rn/8/8/8/K7/2k5/1q6/8 b - - 92 118".parse().unwrap();
        engine.set_board(mate_in_one.clone());
        assert_eq!(engine.board(), &mate_in_one);
    }

    #[test]
    fn stop_is_idempotent() {
        let mut engine = Engine::with_seed(1);
        engine.start(Board::new(), Color::White);
        engine.stop();
        engine.stop();
    }

    #[test]
    fn no_legal_move_from_checkmate_returns_none() {
        let mut engine = Engine::with_seed(1);
        let mut board = Board::new();
        for mv in ["f2f3", "e7e5", "g2g4", "d8h4"] {
            board.apply_move(&mv.parse().unwrap());
        }
        engine.start(board, Color::White);
        engine.set_search_depth(2);
        assert_eq!(engine.get_move(), None);
    }

    #[test]
    fn same_seed_gives_a_reproducible_move() {
        let mut a = Engine::with_seed(42);
        let mut b = Engine::with_seed(42);
        a.start(Board::new(), Color::White);
        b.start(Board::new(), Color::White);
        a.set_search_depth(2);
        b.set_search_depth(2);
        assert_eq!(a.get_move(), b.get_move());
    }
}
