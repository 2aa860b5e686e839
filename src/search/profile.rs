//! The search profile: a plain configuration record, not the environment-
//! loading collaborator of §6 (§4.6).

/// Tuning flags consulted by [`super::tree::MoveTree::build_tree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchProfile {
    /// Quiescence-extend lines ending in a capture.
    pub follow_captures: bool,
    /// Quiescence-extend lines ending in a check.
    pub follow_checks: bool,
    /// Enable alpha-beta pruning during expansion.
    pub alphabeta: bool,
    /// Enable additional heuristic pruning of clearly-losing siblings.
    pub enable_pruning: bool,
    /// Use a stable (first-encountered) tie-break at the root instead of a
    /// seeded RNG. Required for reproducible tests (§9).
    pub deterministic: bool,
}

impl Default for SearchProfile {
    fn default() -> Self {
        SearchProfile {
            follow_captures: true,
            follow_checks: true,
            alphabeta: true,
            enable_pruning: false,
            deterministic: false,
        }
    }
}
