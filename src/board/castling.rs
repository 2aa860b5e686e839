//! Castling-rights bitmask (§3: four castling-rights bits).

pub const WHITE_KINGSIDE: u8 = 0b0001;
pub const WHITE_QUEENSIDE: u8 = 0b0010;
pub const BLACK_KINGSIDE: u8 = 0b0100;
pub const BLACK_QUEENSIDE: u8 = 0b1000;
pub const ALL_RIGHTS: u8 = WHITE_KINGSIDE | WHITE_QUEENSIDE | BLACK_KINGSIDE | BLACK_QUEENSIDE;

use crate::types::Color;

#[must_use]
pub(crate) const fn kingside(color: Color) -> u8 {
    match color {
        Color::White => WHITE_KINGSIDE,
        Color::Black => BLACK_KINGSIDE,
    }
}

#[must_use]
pub(crate) const fn queenside(color: Color) -> u8 {
    match color {
        Color::White => WHITE_QUEENSIDE,
        Color::Black => BLACK_QUEENSIDE,
    }
}
