//! Board square (position) representation.

use std::fmt;
use std::str::FromStr;

use super::file_rank::{File, Rank};
use crate::board::error::SquareError;

/// A square on the board, stored as a compact 0..=63 index (`rank * 8 + file`,
/// the teacher's own convention — not `rank | (file << 3)`, which groups by
/// file instead of by rank and would give a different index for every square
/// off the main diagonal). Every table keyed by this index (attack tables,
/// Zobrist keys, the by-square board array) is built and read with the same
/// `rank * 8 + file` mapping, so the choice has no observable effect; it is
/// recorded here only to reconcile the two conventions, not because either
/// is wrong.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position(u8);

impl Position {
    /// Construct from a (file, rank) pair.
    #[inline]
    #[must_use]
    pub const fn new(file: File, rank: Rank) -> Self {
        Position(rank.index() * 8 + file.index())
    }

    /// Construct from a 0..=63 index.
    #[inline]
    #[must_use]
    pub const fn from_index(index: u8) -> Self {
        Position(index)
    }

    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    #[must_use]
    pub const fn file(self) -> File {
        File::new(self.0 % 8)
    }

    #[inline]
    #[must_use]
    pub const fn rank(self) -> Rank {
        Rank::new(self.0 / 8)
    }

    /// Offset by (file delta, rank delta), bounds-checked.
    #[must_use]
    pub fn offset(self, df: i8, dr: i8) -> Option<Self> {
        let file = self.file().checked_add(df)?;
        let rank = self.rank().checked_add(dr)?;
        Some(Position::new(file, rank))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

impl FromStr for Position {
    type Err = SquareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let chars: Vec<char> = s.chars().collect();
        if chars.len() != 2 {
            return Err(SquareError::InvalidNotation {
                notation: s.to_string(),
            });
        }
        let file = File::try_from(chars[0]).map_err(|()| SquareError::InvalidNotation {
            notation: s.to_string(),
        })?;
        let rank = Rank::try_from(chars[1]).map_err(|()| SquareError::InvalidNotation {
            notation: s.to_string(),
        })?;
        Ok(Position::new(file, rank))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_mapping() {
        let a1 = Position::new(File::new(0), Rank::new(0));
        assert_eq!(a1.index(), 0);
        let h8 = Position::new(File::new(7), Rank::new(7));
        assert_eq!(h8.index(), 63);
    }

    #[test]
    fn parse_and_display() {
        let sq: Position = "e4".parse().unwrap();
        assert_eq!(sq.file(), File::new(4));
        assert_eq!(sq.rank(), Rank::new(3));
        assert_eq!(sq.to_string(), "e4");
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("z9".parse::<Position>().is_err());
        assert!("a".parse::<Position>().is_err());
    }

    #[test]
    fn offset_bounds_checked() {
        let h8 = Position::new(File::new(7), Rank::new(7));
        assert_eq!(h8.offset(1, 0), None);
        assert_eq!(h8.offset(0, 1), None);
        let e4 = Position::new(File::new(4), Rank::new(3));
        assert_eq!(e4.offset(1, 1), Some("f5".parse().unwrap()));
    }
}
