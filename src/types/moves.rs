//! Move representation and the `fromto[promo]` wire format.

use std::fmt;
use std::str::FromStr;

use super::piece::PieceKind;
use super::square::Position;
use crate::board::error::MoveParseError;

/// A single chess move, in long algebraic "from-to[promotion]" form.
///
/// `is_castling`/`is_en_passant`/`captured` are bookkeeping set by the move
/// generator (§4.4) and consumed by `apply_move` (§4.3) and the perft-style
/// diagnostic counters (§4.6); they are not part of the wire format.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Move {
    pub from: Position,
    pub to: Position,
    pub promotion: Option<PieceKind>,
    pub is_castling: bool,
    pub is_en_passant: bool,
    pub captured: Option<PieceKind>,
}

impl Move {
    #[must_use]
    pub fn new(from: Position, to: Position) -> Self {
        Move {
            from,
            to,
            promotion: None,
            is_castling: false,
            is_en_passant: false,
            captured: None,
        }
    }

    #[must_use]
    pub fn with_promotion(mut self, promotion: PieceKind) -> Self {
        self.promotion = Some(promotion);
        self
    }

    /// A move is "noisy" (capture or en passant) for quiescence-extension purposes (§4.6).
    #[must_use]
    pub fn is_capture(&self) -> bool {
        self.captured.is_some() || self.is_en_passant
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(promo) = self.promotion.and_then(PieceKind::promotion_char) {
            write!(f, "{promo}")?;
        }
        Ok(())
    }
}

impl FromStr for Move {
    type Err = MoveParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() < 4 || s.len() > 5 {
            return Err(MoveParseError::InvalidLength { len: s.len() });
        }
        let from = s[0..2]
            .parse::<Position>()
            .map_err(|_| MoveParseError::InvalidSquare {
                notation: s.to_string(),
            })?;
        let to = s[2..4]
            .parse::<Position>()
            .map_err(|_| MoveParseError::InvalidSquare {
                notation: s.to_string(),
            })?;
        let mut mv = Move::new(from, to);
        if s.len() == 5 {
            let c = s.chars().nth(4).expect("length checked above");
            let promo = PieceKind::from_promotion_char(c)
                .ok_or(MoveParseError::InvalidPromotion { char: c })?;
            mv = mv.with_promotion(promo);
        }
        Ok(mv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_plain_move() {
        let mv: Move = "e2e4".parse().unwrap();
        assert_eq!(mv.to_string(), "e2e4");
        assert_eq!(mv.promotion, None);
    }

    #[test]
    fn parse_promotion_move() {
        let mv: Move = "e7e8q".parse().unwrap();
        assert_eq!(mv.to_string(), "e7e8q");
        assert_eq!(mv.promotion, Some(PieceKind::Queen));
    }

    #[test]
    fn rejects_bad_length() {
        assert!("e2e".parse::<Move>().is_err());
        assert!("e2e4qq".parse::<Move>().is_err());
    }

    #[test]
    fn rejects_bad_promotion_letter() {
        assert!("e7e8x".parse::<Move>().is_err());
    }
}
