//! Error types for board and move parsing (§7).

use std::fmt;

/// Error type for FEN parsing failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FenError {
    /// FEN string has too few parts (needs at least 4).
    TooFewParts { found: usize },
    /// Invalid piece character in the position string.
    InvalidPiece { char: char },
    /// Invalid castling character.
    InvalidCastling { char: char },
    /// Invalid side to move (must be 'w' or 'b').
    InvalidSideToMove { found: String },
    /// Invalid en passant square.
    InvalidEnPassant { found: String },
    /// A rank group has too many files (must sum to 8).
    TooManyFiles { rank: usize, files: usize },
    /// Piece placement has the wrong number of rank groups.
    WrongRankCount { found: usize },
    /// More than 16 pieces of one color (cannot fit the piece-list capacity).
    TooManyPieces { color: &'static str, count: usize },
    /// A color has other than exactly one king.
    WrongKingCount { color: &'static str, count: usize },
}

impl fmt::Display for FenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FenError::TooFewParts { found } => {
                write!(f, "FEN must have at least 4 parts, found {found}")
            }
            FenError::InvalidPiece { char } => {
                write!(f, "Invalid piece character '{char}' in FEN")
            }
            FenError::InvalidCastling { char } => {
                write!(f, "Invalid castling character '{char}' in FEN")
            }
            FenError::InvalidSideToMove { found } => {
                write!(f, "Invalid side to move '{found}', expected 'w' or 'b'")
            }
            FenError::InvalidEnPassant { found } => {
                write!(f, "Invalid en passant square '{found}'")
            }
            FenError::TooManyFiles { rank, files } => {
                write!(f, "Too many files ({files}) in rank {rank}")
            }
            FenError::WrongRankCount { found } => {
                write!(f, "Expected 8 rank groups, found {found}")
            }
            FenError::TooManyPieces { color, count } => {
                write!(f, "Too many {color} pieces ({count}), maximum is 16")
            }
            FenError::WrongKingCount { color, count } => {
                write!(f, "{color} must have exactly one king, found {count}")
            }
        }
    }
}

impl std::error::Error for FenError {}

/// Error type for move parsing failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveParseError {
    /// Move string has invalid length (must be 4-5 characters).
    InvalidLength { len: usize },
    /// Invalid square notation in the move.
    InvalidSquare { notation: String },
    /// Invalid promotion piece.
    InvalidPromotion { char: char },
    /// Move is not legal in the current position.
    IllegalMove { notation: String },
}

impl fmt::Display for MoveParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveParseError::InvalidLength { len } => {
                write!(f, "Move must be 4-5 characters, found {len}")
            }
            MoveParseError::InvalidSquare { notation } => {
                write!(f, "Invalid square notation in '{notation}'")
            }
            MoveParseError::InvalidPromotion { char } => {
                write!(f, "Invalid promotion piece '{char}'")
            }
            MoveParseError::IllegalMove { notation } => {
                write!(f, "Illegal move '{notation}'")
            }
        }
    }
}

impl std::error::Error for MoveParseError {}

/// Error type for square parsing failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SquareError {
    InvalidNotation { notation: String },
}

impl fmt::Display for SquareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SquareError::InvalidNotation { notation } => {
                write!(f, "Invalid square notation '{notation}'")
            }
        }
    }
}

impl std::error::Error for SquareError {}
