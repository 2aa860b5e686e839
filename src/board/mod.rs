//! The packed board representation and its operations (C3–C6, §3, §4.3, §4.4, §6).
//!
//! Three mirrored views (by-square array, piece list, color bitboards) live in
//! [`state::Board`]; [`apply`] is the single mutation path; [`movegen`] derives
//! pseudo-legal and legal moves plus attack detection from them; [`fen`] parses
//! and renders Forsyth-Edwards Notation against that same `Board`.

mod apply;
pub mod castling;
pub mod error;
mod fen;
mod movegen;
mod state;
pub(crate) mod tables;
mod zobrist;

pub use state::{Board, MAX_PIECES, MOVE_HISTORY_LEN};
