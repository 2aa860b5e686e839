//! The move tree / search (C8, §4.6, §9): a recursive, alpha-beta-pruned
//! negamax builder with quiescence extension and transposition deduplication,
//! stored as an arena (`Vec<Node>` indexed by `NodeId`) rather than a tree of
//! heap-allocated nodes.

use std::cmp::Ordering;
use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::board::Board;
use crate::eval;
use crate::search::profile::SearchProfile;
use crate::types::Move;

/// An index into a [`MoveTree`]'s arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

/// One node of the tree: the move that produced it (`None` for the root),
/// its negamax rating, and the contiguous range of its children in the arena.
#[derive(Clone, Debug)]
pub struct Node {
    pub mv: Option<Move>,
    pub rating: f32,
    pub parent: Option<usize>,
    pub first_child: usize,
    pub child_count: usize,
}

impl Node {
    fn new(mv: Option<Move>, parent: Option<usize>) -> Self {
        Node {
            mv,
            rating: 0.0,
            parent,
            first_child: 0,
            child_count: 0,
        }
    }

    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.child_count == 0
    }
}

/// A move generated beyond the requested depth along a capture/check line is
/// extended at most this many extra plies (§4.6: "until the leaf is quiet or
/// a bound is reached" — this is that bound, guarding against runaway
/// recursion down a perpetual-check or exchange sequence).
const MAX_QUIESCENCE_EXTENSION: u32 = 6;

/// Depth at which transposition deduplication kicks in (§4.6).
const DEDUP_MIN_DEPTH: u32 = 3;

/// Rough static ordering key used to pre-sort siblings before recursing, so
/// that alpha-beta pruning (which relies on a faithful best-first ordering)
/// has something to work with before any of them have been rated (§4.6).
fn static_order_key(mv: &Move) -> i32 {
    let mut key = 0;
    if let Some(captured) = mv.captured {
        key += 10 + value_rank(captured);
    }
    if mv.is_en_passant {
        key += 10;
    }
    if let Some(promotion) = mv.promotion {
        key += 5 + value_rank(promotion);
    }
    key
}

fn value_rank(kind: crate::types::PieceKind) -> i32 {
    use crate::types::PieceKind::{Bishop, King, Knight, Pawn, Queen, Rook};
    match kind {
        Pawn => 1,
        Knight | Bishop => 2,
        Rook => 5,
        Queen => 9,
        King => 20,
    }
}

/// An arena-backed game tree rooted at a single board position.
pub struct MoveTree {
    root_board: Board,
    nodes: Vec<Node>,
}

impl MoveTree {
    /// A fresh, unexpanded tree rooted at `root_board` (a single leaf node).
    #[must_use]
    pub fn new(root_board: Board) -> Self {
        MoveTree {
            root_board,
            nodes: vec![Node::new(None, None)],
        }
    }

    #[must_use]
    pub fn root_board(&self) -> &Board {
        &self.root_board
    }

    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    #[must_use]
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let node = &self.nodes[id.0];
        (node.first_child..node.first_child + node.child_count).map(NodeId)
    }

    /// Reconstruct the board at `id` by replaying the moves from the root.
    /// Nodes never persist a board themselves (§3, §9): only the root board
    /// and the per-node move are kept, so traversal cost is paid on demand.
    #[must_use]
    pub fn board_at(&self, id: NodeId) -> Board {
        let mut path = Vec::new();
        let mut cursor = id.0;
        while let Some(parent) = self.nodes[cursor].parent {
            path.push(self.nodes[cursor].mv.expect("non-root node always has a move"));
            cursor = parent;
        }
        let mut board = self.root_board.clone();
        for mv in path.into_iter().rev() {
            board.apply_move(&mv);
        }
        board
    }

    /// Expand every leaf to `depth` plies, rating and best-first-sorting
    /// siblings as they are produced (§4.6). Rebuilds the tree from scratch;
    /// `depth` is the nominal ply count quiescence extension and
    /// transposition dedup are measured against.
    pub fn build_tree(&mut self, depth: u32, profile: SearchProfile) {
        self.nodes.clear();
        self.nodes.push(Node::new(None, None));
        let root_board = self.root_board.clone();
        let root_side = root_board.side_to_move();
        let mut dedup = HashSet::new();
        self.expand(
            0,
            root_board,
            None,
            depth,
            0,
            depth,
            profile,
            root_side,
            &mut dedup,
            f32::INFINITY,
        );
    }

    /// Expand one node. `root_side` is fixed for the whole call tree: every
    /// leaf is rated from the root's own mover's perspective (§4.5's "side"),
    /// not from whichever side happens to be on move at that leaf — the mate
    /// bonus and material sign only mean anything relative to a single,
    /// consistent perspective as the `-max(children)` recurrence (§4.6, §8
    /// property 7) carries it back up to the root.
    ///
    /// `beta` is the real fail-soft bound passed down from the caller: the
    /// caller's own `alpha` at the point of recursing, negated (since this
    /// recurrence's `rating` lives in the same value space as its own
    /// children's ratings, one `-` away from its parent's). The root call has
    /// no such bound, so it passes `f32::INFINITY`.
    #[allow(clippy::too_many_arguments)]
    fn expand(
        &mut self,
        node_idx: usize,
        board: Board,
        incoming_mv: Option<Move>,
        depth: u32,
        extra_extension: u32,
        requested_depth: u32,
        profile: SearchProfile,
        root_side: crate::types::Color,
        dedup: &mut HashSet<u64>,
        beta: f32,
    ) -> f32 {
        let side = board.side_to_move();

        let quiescence_eligible = incoming_mv.is_some_and(|mv| {
            (profile.follow_captures && mv.is_capture())
                || (profile.follow_checks && board.is_check(side))
        });
        let extend = depth == 0 && quiescence_eligible && extra_extension < MAX_QUIESCENCE_EXTENSION;

        if depth == 0 && !extend {
            let rating = eval::rate(&board, root_side);
            self.nodes[node_idx].rating = rating;
            return rating;
        }

        let moves = board.legal_moves(side);
        if moves.is_empty() {
            // Checkmate or stalemate: no children, rate the terminal position
            // from the root's perspective like any other leaf — this is what
            // lets a mate found deep in the tree register as a large bonus
            // (or penalty) all the way back to the root's move choice.
            let rating = eval::rate(&board, root_side);
            self.nodes[node_idx].rating = rating;
            return rating;
        }

        let (next_depth, next_extra) = if depth == 0 {
            (0, extra_extension + 1)
        } else {
            (depth - 1, extra_extension)
        };

        let mut ordered = moves;
        ordered.sort_by_key(|mv| std::cmp::Reverse(static_order_key(mv)));

        let first_child = self.nodes.len();
        for &mv in &ordered {
            self.nodes.push(Node::new(Some(mv), Some(node_idx)));
        }
        let child_count = ordered.len();
        self.nodes[node_idx].first_child = first_child;
        self.nodes[node_idx].child_count = child_count;

        let dedup_active = requested_depth >= DEDUP_MIN_DEPTH && next_depth == 0;
        let mut alpha = f32::NEG_INFINITY;
        let mut best = f32::NEG_INFINITY;

        for (i, &mv) in ordered.iter().enumerate() {
            let child_idx = first_child + i;
            let mut child_board = board.clone();
            child_board.apply_move(&mv);

            // Heuristic pruning (§4.6): once a few strong siblings have been
            // searched, quiet non-capturing moves late in the static order
            // are rated shallowly rather than expanded further.
            let heuristically_pruned =
                profile.enable_pruning && i >= 4 && mv.captured.is_none() && mv.promotion.is_none();

            // `beta` is the bound handed down from the parent: once this
            // node's local `alpha` (the best child rating seen so far) meets
            // or exceeds it, `-alpha` can no longer beat whatever alternative
            // the parent already has lined up, so remaining siblings here are
            // rated shallowly rather than expanded (§4.6, fail-soft cutoff).
            let alphabeta_pruned = profile.alphabeta && alpha >= beta;

            let rating = if alphabeta_pruned || heuristically_pruned {
                let shallow = eval::rate(&child_board, root_side);
                self.nodes[child_idx].rating = shallow;
                shallow
            } else if dedup_active && !quiescence_would_extend(&mv, &child_board, profile) {
                let hash = child_board.hash();
                if dedup.insert(hash) {
                    self.expand(
                        child_idx,
                        child_board,
                        Some(mv),
                        next_depth,
                        next_extra,
                        requested_depth,
                        profile,
                        root_side,
                        dedup,
                        -alpha,
                    )
                } else {
                    // Transposition already seen at this depth: do not
                    // insert a fresh subtree for it (§4.6).
                    let shallow = eval::rate(&child_board, root_side);
                    self.nodes[child_idx].rating = shallow;
                    shallow
                }
            } else {
                self.expand(
                    child_idx,
                    child_board,
                    Some(mv),
                    next_depth,
                    next_extra,
                    requested_depth,
                    profile,
                    root_side,
                    dedup,
                    -alpha,
                )
            };

            best = best.max(rating);
            alpha = alpha.max(rating);
        }

        self.nodes[first_child..first_child + child_count]
            .sort_by(|a, b| b.rating.partial_cmp(&a.rating).unwrap_or(Ordering::Equal));

        let rating = -best;
        self.nodes[node_idx].rating = rating;
        rating
    }

    /// The best move at the root (§4.6, §4.7): among root children tied for
    /// the top rating, tie-break per `profile.deterministic`. `None` if the
    /// root has no legal moves (checkmate or stalemate).
    #[must_use]
    pub fn best_root_move(&self, profile: SearchProfile, rng: &mut StdRng) -> Option<Move> {
        let root = &self.nodes[0];
        if root.child_count == 0 {
            return None;
        }
        let children = &self.nodes[root.first_child..root.first_child + root.child_count];
        let top_rating = children[0].rating;
        let top: Vec<&Node> = children
            .iter()
            .take_while(|n| (n.rating - top_rating).abs() < 1e-6)
            .collect();

        if profile.deterministic {
            top.first().and_then(|n| n.mv)
        } else {
            top.choose(rng).and_then(|n| n.mv)
        }
    }

    /// Leaves of the current tree (§4.6 diagnostic counters).
    fn leaves(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len())
            .filter(|&i| self.nodes[i].is_leaf())
            .map(NodeId)
    }

    #[must_use]
    pub fn count_final_positions(&self) -> u64 {
        self.leaves().count() as u64
    }

    #[must_use]
    pub fn count_final_captures(&self) -> u64 {
        self.leaves()
            .filter(|&id| self.nodes[id.0].mv.is_some_and(|mv| mv.is_capture()))
            .count() as u64
    }

    #[must_use]
    pub fn count_final_castles(&self) -> u64 {
        self.leaves()
            .filter(|&id| self.nodes[id.0].mv.is_some_and(|mv| mv.is_castling))
            .count() as u64
    }

    #[must_use]
    pub fn count_final_enpassants(&self) -> u64 {
        self.leaves()
            .filter(|&id| self.nodes[id.0].mv.is_some_and(|mv| mv.is_en_passant))
            .count() as u64
    }

    #[must_use]
    pub fn count_final_checks(&self) -> u64 {
        self.leaves()
            .filter(|&id| {
                let board = self.board_at(id);
                board.is_check(board.side_to_move())
            })
            .count() as u64
    }

    #[must_use]
    pub fn count_final_checkmates(&self) -> u64 {
        self.leaves()
            .filter(|&id| {
                let board = self.board_at(id);
                board.is_checkmate(board.side_to_move())
            })
            .count() as u64
    }
}

fn quiescence_would_extend(mv: &Move, board_after: &Board, profile: SearchProfile) -> bool {
    (profile.follow_captures && mv.is_capture())
        || (profile.follow_checks && board_after.is_check(board_after.side_to_move()))
}
