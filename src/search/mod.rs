//! Move-tree search (C8, §4.6): a configurable, alpha-beta-pruned negamax
//! builder over an arena-backed game tree.

mod profile;
mod tree;

pub use profile::SearchProfile;
pub use tree::{MoveTree, Node, NodeId};
